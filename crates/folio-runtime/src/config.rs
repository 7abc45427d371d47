#![forbid(unsafe_code)]

//! Site configuration.
//!
//! Captures every tunable constant of the components as a single
//! [`SiteConfig`] that can be loaded from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # folio.toml
//! mode = "development"
//!
//! [nav]
//! header_offset_px = 64.0
//!
//! [form]
//! submit_latency_ms = 500
//! ```
//!
//! ```rust,ignore
//! let config = SiteConfig::from_toml_file("folio.toml")?;
//! let config = SiteConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! `SiteConfig::default()` matches the constants the site ships with,
//! with the one addition of a 150 ms trailing settle pass on scroll.

use core::time::Duration;

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use folio_core::ObserverOptions;

/// Build mode; gates development-only diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SiteMode {
    Development,
    #[default]
    Production,
}

impl SiteMode {
    #[must_use]
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Top-level configuration for all components.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SiteConfig {
    /// Development or production build.
    pub mode: SiteMode,

    /// Navigation scroll tracking and smooth scrolling.
    pub nav: NavConfig,

    /// Observer used for `[data-animate]` reveals and skill bars.
    pub reveal: ObserverConfig,

    /// Observer used for deferred images.
    pub lazy: ObserverConfig,

    /// Contact form submission timing.
    pub form: FormConfig,
}

/// Navigation tuning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavConfig {
    /// Minimum spacing between scroll handler runs.
    pub scroll_throttle_ms: u64,
    /// Scroll offset beyond which the navbar is marked `scrolled`.
    pub scrolled_threshold_px: f64,
    /// How far ahead of a section's top it becomes active.
    pub section_lookahead_px: f64,
    /// Fixed header height subtracted from smooth-scroll targets.
    pub header_offset_px: f64,
    /// Quiet period before a trailing recompute; `0` disables it.
    pub settle_ms: u64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            scroll_throttle_ms: 100,
            scrolled_threshold_px: 50.0,
            section_lookahead_px: 200.0,
            header_offset_px: 80.0,
            settle_ms: 150,
        }
    }
}

impl NavConfig {
    #[must_use]
    pub const fn scroll_throttle(&self) -> Duration {
        Duration::from_millis(self.scroll_throttle_ms)
    }

    /// Settle delay, `None` when disabled.
    #[must_use]
    pub const fn settle(&self) -> Option<Duration> {
        if self.settle_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.settle_ms))
        }
    }
}

/// Intersection observer tuning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ObserverConfig {
    /// Visible fraction required to count as intersecting.
    pub threshold: f64,
    /// CSS root margin.
    pub root_margin: String,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "0px 0px -100px 0px".to_owned(),
        }
    }
}

impl ObserverConfig {
    /// Defaults for the deferred-image observer.
    #[must_use]
    pub fn lazy_default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: "0px".to_owned(),
        }
    }

    #[must_use]
    pub fn to_options(&self) -> ObserverOptions {
        ObserverOptions {
            threshold: self.threshold,
            root_margin: self.root_margin.clone(),
        }
    }
}

/// Contact form timing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FormConfig {
    /// Latency of the simulated backend.
    pub submit_latency_ms: u64,
    /// How long the success indicator stays visible.
    pub success_display_ms: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            submit_latency_ms: 2_000,
            success_display_ms: 5_000,
        }
    }
}

impl FormConfig {
    #[must_use]
    pub const fn submit_latency(&self) -> Duration {
        Duration::from_millis(self.submit_latency_ms)
    }

    #[must_use]
    pub const fn success_display(&self) -> Duration {
        Duration::from_millis(self.success_display_ms)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            mode: SiteMode::default(),
            nav: NavConfig::default(),
            reveal: ObserverConfig::default(),
            lazy: ObserverConfig::lazy_default(),
            form: FormConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Production defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.checked()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.checked()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Load from a file, choosing the format by extension (`.json` or TOML).
    #[cfg(feature = "config")]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    #[cfg(feature = "config")]
    fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, value) in [
            ("nav.scrolled_threshold_px", self.nav.scrolled_threshold_px),
            ("nav.section_lookahead_px", self.nav.section_lookahead_px),
            ("nav.header_offset_px", self.nav.header_offset_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{name} must be a finite value >= 0, got {value}"));
            }
        }

        for (name, observer) in [("reveal", &self.reveal), ("lazy", &self.lazy)] {
            if !(0.0..=1.0).contains(&observer.threshold) {
                errors.push(format!(
                    "{name}.threshold must be in [0, 1], got {}",
                    observer.threshold
                ));
            }
            if observer.root_margin.trim().is_empty() {
                errors.push(format!("{name}.root_margin must not be empty"));
            }
        }

        if self.form.success_display_ms == 0 {
            errors.push("form.success_display_ms must be > 0".into());
        }

        errors
    }
}

/// Errors that can occur when loading a site configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Validation errors.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#![forbid(unsafe_code)]

//! Runtime: the portfolio site's view-state components.
//!
//! # Role in folio
//! `folio-runtime` holds every behavior of the site that is not markup or
//! styling. Components never touch the browser directly; they read layout
//! through [`folio_core::Dom`] and write by emitting patches, so the whole
//! site runs deterministically under test with host-supplied timestamps.
//!
//! # Components
//! - [`navigation::Navigation`]: active link, scrolled header, mobile menu,
//!   smooth anchor scrolling.
//! - [`scroll_animations::ScrollAnimations`]: one-shot reveals and skill bars.
//! - [`contact_form::ContactForm`]: field validation and the submission
//!   state machine.
//! - [`performance::PerformanceOptimizer`]: deferred images and prefetch
//!   hints.
//! - [`accessibility::AccessibilityEnhancements`]: Escape to close and the
//!   menu focus trap.
//! - [`portfolio::Portfolio`]: bootstrap, event routing, and timers.
//!
//! # Example
//!
//! ```ignore
//! use folio_runtime::{Portfolio, SiteConfig};
//!
//! let mut site = Portfolio::new(markup, &SiteConfig::default(), &mut dom);
//! let outcome = site.dispatch(&event, now, &mut dom);
//! site.advance(now, &mut dom);
//! ```

pub mod accessibility;
pub mod config;
pub mod contact_form;
pub mod markup;
pub mod navigation;
pub mod performance;
pub mod portfolio;
pub mod scroll_animations;
pub mod timer;

#[cfg(test)]
mod testing;

pub use accessibility::AccessibilityEnhancements;
pub use config::{ConfigError, FormConfig, NavConfig, ObserverConfig, SiteConfig, SiteMode};
pub use contact_form::{
    ContactBackend, ContactForm, ContactSubmission, FieldKind, FieldState, SimulatedBackend,
    SubmissionError, SubmissionState, ValidationError,
};
pub use markup::{MarkupError, SiteMarkup};
pub use navigation::{NavState, Navigation};
pub use performance::{LazyImageState, PerformanceOptimizer};
pub use portfolio::Portfolio;
pub use scroll_animations::{RevealState, ScrollAnimations, SkillBarState};

#![forbid(unsafe_code)]

//! Element handles for the page markup.
//!
//! The host resolves its selectors once (`#navbar`, `.nav-link`,
//! `section[id]`, `[data-animate]`, `.skill-progress[data-progress]`,
//! `#contactForm`, `img[data-src]`, `a[href^="http"]`, ...) and hands the
//! resulting handles to the runtime as a [`SiteMarkup`]. Components receive
//! only the part they work on.

use folio_core::ElementId;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Errors describing markup the runtime cannot use.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    /// A `data-progress` value that is not a number.
    #[error("skill bar {element:?}: invalid progress {raw:?}")]
    InvalidProgress { element: ElementId, raw: String },
    /// A link listed as external without an absolute URL.
    #[error("link {element:?}: {href:?} is not an absolute http(s) URL")]
    NotExternal { element: ElementId, href: String },
}

/// Everything the components need, resolved up front.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SiteMarkup {
    pub nav: NavMarkup,
    /// `section[id]`, in document order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sections: Vec<Section>,
    /// Same-page anchors (`a[href^="#"]`), nav links included.
    #[cfg_attr(feature = "serde", serde(default))]
    pub anchors: Vec<Anchor>,
    /// `[data-animate]` elements.
    #[cfg_attr(feature = "serde", serde(default))]
    pub animated: Vec<ElementId>,
    /// Bars whose `data-progress` is not a number are left out.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "skip_invalid_skill_bars")
    )]
    pub skill_bars: Vec<SkillBar>,
    pub contact: ContactFormMarkup,
    /// `img[data-src]` elements.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lazy_images: Vec<LazyImage>,
    /// `a[href^="http"]` elements.
    #[cfg_attr(feature = "serde", serde(default))]
    pub external_links: Vec<ExternalLink>,
}

/// Navbar, mobile toggle, menu and its links.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct NavMarkup {
    pub navbar: ElementId,
    pub toggle: ElementId,
    pub menu: ElementId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub links: Vec<NavLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct NavLink {
    pub element: ElementId,
    pub href: String,
}

impl NavLink {
    pub fn new(element: ElementId, href: impl Into<String>) -> Self {
        Self {
            element,
            href: href.into(),
        }
    }

    /// Whether this link points at the section with `id`.
    #[must_use]
    pub fn targets(&self, id: &str) -> bool {
        self.href.strip_prefix('#') == Some(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Section {
    pub element: ElementId,
    pub id: String,
}

impl Section {
    pub fn new(element: ElementId, id: impl Into<String>) -> Self {
        Self {
            element,
            id: id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Anchor {
    pub element: ElementId,
    pub href: String,
}

impl Anchor {
    pub fn new(element: ElementId, href: impl Into<String>) -> Self {
        Self {
            element,
            href: href.into(),
        }
    }

    /// Fragment id this anchor scrolls to; `None` for a bare `#`.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.href.strip_prefix('#').filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillBar {
    pub element: ElementId,
    /// Target fill percentage, finite and clamped to `0.0..=100.0`.
    pub progress: f64,
}

impl SkillBar {
    /// Build from a raw `data-progress` attribute value. Out-of-range
    /// values are clamped; only non-numeric input is rejected.
    pub fn parse(element: ElementId, raw: &str) -> Result<Self, MarkupError> {
        let trimmed = raw.trim().trim_end_matches('%').trim_end();
        match trimmed.parse::<f64>() {
            Ok(progress) if progress.is_finite() => Ok(Self {
                element,
                progress: progress.clamp(0.0, 100.0),
            }),
            _ => Err(MarkupError::InvalidProgress {
                element,
                raw: raw.to_owned(),
            }),
        }
    }

    /// Value for the `--progress` custom property, e.g. `85%` or `92.5%`.
    #[must_use]
    pub fn css_value(&self) -> String {
        format!("{}%", self.progress)
    }
}

/// One form control and the element showing its error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct FieldMarkup {
    pub input: ElementId,
    pub error: ElementId,
}

/// `#contactForm` and the controls it drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ContactFormMarkup {
    pub form: ElementId,
    pub name: FieldMarkup,
    pub email: FieldMarkup,
    pub message: FieldMarkup,
    pub submit_button: ElementId,
    /// `.btn-text` inside the submit button.
    pub button_label: ElementId,
    /// `.btn-loading` inside the submit button.
    pub button_loading: ElementId,
    /// `#formSuccess`.
    pub success: ElementId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct LazyImage {
    pub element: ElementId,
    /// Value of `data-src`.
    pub src: String,
}

impl LazyImage {
    pub fn new(element: ElementId, src: impl Into<String>) -> Self {
        Self {
            element,
            src: src.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawLink"))]
pub struct ExternalLink {
    pub element: ElementId,
    pub href: String,
}

impl ExternalLink {
    /// Accepts only absolute `http`/`https` URLs.
    pub fn new(element: ElementId, href: impl Into<String>) -> Result<Self, MarkupError> {
        let href = href.into();
        if href.starts_with("http://") || href.starts_with("https://") {
            Ok(Self { element, href })
        } else {
            Err(MarkupError::NotExternal { element, href })
        }
    }
}

/// Skill bar as the host reads it: the raw `data-progress` attribute.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawSkillBar {
    element: ElementId,
    progress: String,
}

#[cfg(feature = "serde")]
fn skip_invalid_skill_bars<'de, D>(deserializer: D) -> Result<Vec<SkillBar>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<RawSkillBar>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|bar| match SkillBar::parse(bar.element, &bar.progress) {
            Ok(bar) => Some(bar),
            Err(err) => {
                tracing::warn!(%err, "skill bar skipped");
                None
            }
        })
        .collect())
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawLink {
    element: ElementId,
    href: String,
}

#[cfg(feature = "serde")]
impl TryFrom<RawLink> for ExternalLink {
    type Error = MarkupError;

    fn try_from(raw: RawLink) -> Result<Self, Self::Error> {
        Self::new(raw.element, raw.href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nav_link_targets_matching_fragment() {
        let link = NavLink::new(ElementId(1), "#about");
        assert!(link.targets("about"));
        assert!(!link.targets("projects"));
        assert!(!NavLink::new(ElementId(2), "about").targets("about"));
    }

    #[test]
    fn bare_hash_anchor_has_no_fragment() {
        assert_eq!(Anchor::new(ElementId(1), "#").fragment(), None);
        assert_eq!(Anchor::new(ElementId(1), "#contact").fragment(), Some("contact"));
        assert_eq!(Anchor::new(ElementId(1), "/blog").fragment(), None);
    }

    #[test]
    fn skill_progress_parsing() {
        let el = ElementId(9);
        assert_eq!(SkillBar::parse(el, "85").unwrap().progress, 85.0);
        assert_eq!(SkillBar::parse(el, " 90% ").unwrap().progress, 90.0);
        assert_eq!(SkillBar::parse(el, "92.5").unwrap().progress, 92.5);
        assert_eq!(SkillBar::parse(el, "140%").unwrap().progress, 100.0);
        assert_eq!(SkillBar::parse(el, "-5").unwrap().progress, 0.0);
        assert!(matches!(
            SkillBar::parse(el, "lots"),
            Err(MarkupError::InvalidProgress { .. })
        ));
        assert!(SkillBar::parse(el, "NaN").is_err());
        assert!(SkillBar::parse(el, "inf").is_err());
        assert!(SkillBar::parse(el, "").is_err());
    }

    #[test]
    fn fractional_progress_keeps_its_css_value() {
        let el = ElementId(9);
        assert_eq!(SkillBar::parse(el, "92.5").unwrap().css_value(), "92.5%");
        assert_eq!(SkillBar::parse(el, "85%").unwrap().css_value(), "85%");
    }

    #[test]
    fn external_links_must_be_absolute() {
        assert!(ExternalLink::new(ElementId(1), "https://github.com").is_ok());
        assert!(ExternalLink::new(ElementId(1), "http://example.com/x").is_ok());
        let err = ExternalLink::new(ElementId(1), "#top").unwrap_err();
        assert_eq!(
            err,
            MarkupError::NotExternal {
                element: ElementId(1),
                href: "#top".into()
            }
        );
    }
}

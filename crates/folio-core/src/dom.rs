#![forbid(unsafe_code)]

//! The host document seam.
//!
//! Components never reach for a global document. They read the few layout
//! facts they need through [`Dom`] and describe every mutation as a
//! [`Patch`]. A browser host applies patches to the live document; tests use
//! an in-memory document and assert on the resulting state.
//!
//! # Invariants
//!
//! 1. Patches are applied in emission order.
//! 2. Reads never mutate; `contains(a, a)` is `true`.
//! 3. Unknown elements read as absent (`None`, empty value, no descendants).

use crate::event::{ElementId, ObserverKind};

/// How a scroll request should move the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ScrollBehavior {
    /// Animate to the destination.
    Smooth,
    /// Jump immediately.
    Instant,
}

/// Options for an intersection observer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ObserverOptions {
    /// Fraction of the target that must be visible, in `[0, 1]`.
    pub threshold: f64,
    /// CSS margin applied to the root (viewport) box.
    pub root_margin: String,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: "0px".to_owned(),
        }
    }
}

/// A single document mutation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "camelCase"))]
#[cfg_attr(feature = "serde", serde(rename_all_fields = "camelCase"))]
pub enum Patch {
    /// Add a class to the element's class list.
    AddClass {
        target: ElementId,
        class: &'static str,
    },
    /// Remove a class from the element's class list.
    RemoveClass {
        target: ElementId,
        class: &'static str,
    },
    /// Set an attribute.
    SetAttribute {
        target: ElementId,
        name: &'static str,
        value: String,
    },
    /// Remove an attribute.
    RemoveAttribute {
        target: ElementId,
        name: &'static str,
    },
    /// Set an inline style property (custom properties included).
    SetStyle {
        target: ElementId,
        property: &'static str,
        value: String,
    },
    /// Replace the element's text content.
    SetText { target: ElementId, text: String },
    /// Replace a form control's value.
    SetValue { target: ElementId, value: String },
    /// Enable or disable a form control.
    SetDisabled { target: ElementId, disabled: bool },
    /// Move keyboard focus.
    Focus { target: ElementId },
    /// Scroll the window.
    ScrollTo { top: f64, behavior: ScrollBehavior },
    /// Create an intersection observer.
    CreateObserver {
        observer: ObserverKind,
        options: ObserverOptions,
    },
    /// Start observing an element.
    Observe {
        observer: ObserverKind,
        target: ElementId,
    },
    /// Stop observing an element.
    Unobserve {
        observer: ObserverKind,
        target: ElementId,
    },
    /// Append a `<link>` resource hint to the document head.
    AppendHeadLink { rel: &'static str, href: String },
    /// Show a blocking alert.
    Alert { message: String },
}

/// Whether a handled event should keep its default browser action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[must_use]
pub enum EventOutcome {
    /// Let the browser run its default action.
    #[default]
    Continue,
    /// Call `preventDefault()` on the event.
    PreventDefault,
}

impl EventOutcome {
    /// Combine outcomes from several handlers of the same event.
    pub const fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Continue, Self::Continue) => Self::Continue,
            _ => Self::PreventDefault,
        }
    }

    /// Whether any handler asked to suppress the default action.
    #[must_use]
    pub const fn default_prevented(self) -> bool {
        matches!(self, Self::PreventDefault)
    }
}

/// Read access to the document plus a patch sink.
///
/// The convenience methods all route through [`Dom::apply`], so an
/// implementation only has to provide the reads and `apply`.
pub trait Dom {
    /// Top offset of an element relative to the document, in CSS pixels.
    fn offset_top(&self, element: ElementId) -> Option<f64>;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool;

    /// Current value of a form control (empty when unknown).
    fn value(&self, element: ElementId) -> &str;

    /// Element that currently holds keyboard focus.
    fn active_element(&self) -> Option<ElementId>;

    /// Focusable descendants of `container`, in tab order.
    fn focusable_within(&self, container: ElementId) -> Vec<ElementId>;

    /// Apply one mutation.
    fn apply(&mut self, patch: Patch);

    fn add_class(&mut self, target: ElementId, class: &'static str) {
        self.apply(Patch::AddClass { target, class });
    }

    fn remove_class(&mut self, target: ElementId, class: &'static str) {
        self.apply(Patch::RemoveClass { target, class });
    }

    /// Add or remove `class` depending on `on`.
    fn set_class(&mut self, target: ElementId, class: &'static str, on: bool) {
        if on {
            self.add_class(target, class);
        } else {
            self.remove_class(target, class);
        }
    }

    fn set_attribute(&mut self, target: ElementId, name: &'static str, value: impl Into<String>)
    where
        Self: Sized,
    {
        self.apply(Patch::SetAttribute {
            target,
            name,
            value: value.into(),
        });
    }

    fn set_style(&mut self, target: ElementId, property: &'static str, value: impl Into<String>)
    where
        Self: Sized,
    {
        self.apply(Patch::SetStyle {
            target,
            property,
            value: value.into(),
        });
    }

    fn set_text(&mut self, target: ElementId, text: impl Into<String>)
    where
        Self: Sized,
    {
        self.apply(Patch::SetText {
            target,
            text: text.into(),
        });
    }

    fn focus(&mut self, target: ElementId) {
        self.apply(Patch::Focus { target });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_merge_prevents_if_any_handler_prevents() {
        use EventOutcome::*;
        assert_eq!(Continue.merge(Continue), Continue);
        assert_eq!(Continue.merge(PreventDefault), PreventDefault);
        assert_eq!(PreventDefault.merge(Continue), PreventDefault);
        assert!(PreventDefault.default_prevented());
        assert!(!EventOutcome::default().default_prevented());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn patches_serialize_with_op_tag() {
        let patch = Patch::SetStyle {
            target: ElementId(3),
            property: "--progress",
            value: "90%".into(),
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"op": "setStyle", "target": 3, "property": "--progress", "value": "90%"})
        );
    }
}

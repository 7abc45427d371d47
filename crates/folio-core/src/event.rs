#![forbid(unsafe_code)]

//! Canonical DOM event types.
//!
//! The host translates browser events into these values and pushes them into
//! the runtime. Everything a handler needs to know about the event is carried
//! here; anything about the document itself is read back through
//! [`Dom`](crate::dom::Dom).
//!
//! # Design Notes
//!
//! - Element identity is an opaque [`ElementId`] assigned by the host.
//! - Scroll offsets are CSS pixels from the top of the document.
//! - `Modifiers` use bitflags for easy combination.

use bitflags::bitflags;

/// Opaque handle to a document element.
///
/// Handles are assigned by the host when it describes the markup and stay
/// stable for the lifetime of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ElementId(pub u32);

impl ElementId {
    /// Raw host-side value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ElementId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Canonical DOM event.
///
/// Events are dispatched to components in registration order; see
/// `folio_runtime::portfolio`.
#[derive(Debug, Clone, PartialEq)]
pub enum DomEvent {
    /// The window scrolled.
    Scroll {
        /// Vertical scroll offset in CSS pixels.
        offset: f64,
    },

    /// A click landed on `target` (the innermost element hit).
    Click {
        /// Element the click was dispatched to.
        target: ElementId,
    },

    /// A key was pressed while the document had focus.
    KeyDown(KeyEvent),

    /// The value of a form control changed through typing.
    Input {
        /// The edited control.
        target: ElementId,
    },

    /// A form control lost focus.
    Blur {
        /// The control that was blurred.
        target: ElementId,
    },

    /// A form was submitted.
    Submit {
        /// The submitted form.
        form: ElementId,
    },

    /// An intersection observer reported a change.
    Intersect(IntersectionEntry),

    /// The pointer entered an element.
    MouseEnter {
        /// Element the pointer entered.
        target: ElementId,
    },
}

/// One entry delivered by an intersection observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionEntry {
    /// Observer that produced the entry.
    pub observer: ObserverKind,
    /// Observed element.
    pub target: ElementId,
    /// Whether the element currently intersects the observer's root.
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    /// Entry for an element entering the viewport.
    #[must_use]
    pub const fn entering(observer: ObserverKind, target: ElementId) -> Self {
        Self {
            observer,
            target,
            is_intersecting: true,
        }
    }

    /// Entry for an element leaving the viewport.
    #[must_use]
    pub const fn leaving(observer: ObserverKind, target: ElementId) -> Self {
        Self {
            observer,
            target,
            is_intersecting: false,
        }
    }
}

/// The intersection observers the runtime asks the host to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ObserverKind {
    /// Generic `[data-animate]` reveal.
    Reveal,
    /// Skill progress bars.
    SkillBar,
    /// Deferred images.
    LazyImage,
}

impl ObserverKind {
    /// Stable name used by hosts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reveal => "reveal",
            Self::SkillBar => "skillBar",
            Self::LazyImage => "lazyImage",
        }
    }

    /// Parse a host-side observer name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "reveal" => Some(Self::Reveal),
            "skillBar" => Some(Self::SkillBar),
            "lazyImage" => Some(Self::LazyImage),
            _ => None,
        }
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if Shift modifier is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// Keys the runtime distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Escape key.
    Escape,

    /// Tab key (Shift+Tab is `Tab` with [`Modifiers::SHIFT`]).
    Tab,

    /// Enter/Return key.
    Enter,

    /// A regular character key.
    Char(char),

    /// Any key the runtime has no binding for.
    Other,
}

impl KeyCode {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            "Enter" => Self::Enter,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Self::Char(ch),
                    _ => Self::Other,
                }
            }
        }
    }
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Meta/Command key.
        const META  = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

#![forbid(unsafe_code)]

//! In-memory shadow of the live document.
//!
//! The browser host mirrors the handful of layout facts the runtime reads
//! (offsets, parentage, control values, focus, tab order) into a
//! [`MemoryDom`], and applies the patches it drains back onto the real
//! document. Applying a patch here also updates the shadow state, so reads
//! made later in the same step see the runtime's own writes (a cleared
//! field reads as empty, a focus move is reflected by `active_element`).
//!
//! # Invariants
//!
//! 1. Every applied patch is queued for the host exactly once, in order.
//! 2. `contains` terminates even if the host reports a parent cycle.

use std::collections::{HashMap, HashSet};

use folio_core::{Dom, ElementId, ObserverKind, ObserverOptions, Patch};

#[derive(Debug, Default, Clone)]
pub struct MemoryDom {
    parents: HashMap<ElementId, ElementId>,
    offsets: HashMap<ElementId, f64>,
    values: HashMap<ElementId, String>,
    active: Option<ElementId>,
    focusables: HashMap<ElementId, Vec<ElementId>>,

    classes: HashMap<ElementId, HashSet<&'static str>>,
    styles: HashMap<ElementId, HashMap<&'static str, String>>,
    attributes: HashMap<ElementId, HashMap<&'static str, String>>,
    texts: HashMap<ElementId, String>,
    disabled: HashSet<ElementId>,
    observers: HashMap<ObserverKind, ObserverOptions>,
    observed: HashSet<(ObserverKind, ElementId)>,
    head_links: Vec<(&'static str, String)>,
    alerts: Vec<String>,
    scroll_top: f64,

    pending: Vec<Patch>,
}

impl MemoryDom {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- host-mirrored layout facts ---

    pub fn set_offset_top(&mut self, element: ElementId, top: f64) {
        self.offsets.insert(element, top);
    }

    pub fn set_parent(&mut self, child: ElementId, parent: ElementId) {
        self.parents.insert(child, parent);
    }

    pub fn set_value(&mut self, element: ElementId, value: impl Into<String>) {
        self.values.insert(element, value.into());
    }

    pub fn set_active_element(&mut self, element: Option<ElementId>) {
        self.active = element;
    }

    /// Replace the tab-ordered focusable descendants of `container`.
    pub fn set_focusables(&mut self, container: ElementId, elements: Vec<ElementId>) {
        self.focusables.insert(container, elements);
    }

    // --- shadow state ---

    #[must_use]
    pub fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.classes
            .get(&element)
            .is_some_and(|names| names.contains(class))
    }

    #[must_use]
    pub fn style(&self, element: ElementId, property: &str) -> Option<&str> {
        self.styles
            .get(&element)?
            .get(property)
            .map(String::as_str)
    }

    #[must_use]
    pub fn attribute(&self, element: ElementId, name: &str) -> Option<&str> {
        self.attributes
            .get(&element)?
            .get(name)
            .map(String::as_str)
    }

    #[must_use]
    pub fn text(&self, element: ElementId) -> &str {
        self.texts.get(&element).map_or("", String::as_str)
    }

    #[must_use]
    pub fn is_disabled(&self, element: ElementId) -> bool {
        self.disabled.contains(&element)
    }

    /// Options the observer was created with, if it exists.
    #[must_use]
    pub fn observer(&self, kind: ObserverKind) -> Option<&ObserverOptions> {
        self.observers.get(&kind)
    }

    #[must_use]
    pub fn is_observing(&self, kind: ObserverKind, element: ElementId) -> bool {
        self.observed.contains(&(kind, element))
    }

    /// `(rel, href)` of every link appended to the head.
    #[must_use]
    pub fn head_links(&self) -> &[(&'static str, String)] {
        &self.head_links
    }

    #[must_use]
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Last scroll destination requested by the runtime.
    #[must_use]
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Patches applied since the last drain.
    #[must_use]
    pub fn pending_patches(&self) -> &[Patch] {
        &self.pending
    }

    /// Drain the patches the host still has to apply.
    pub fn take_patches(&mut self) -> Vec<Patch> {
        std::mem::take(&mut self.pending)
    }

    fn mirror(&mut self, patch: &Patch) {
        match patch {
            Patch::AddClass { target, class } => {
                self.classes.entry(*target).or_default().insert(*class);
            }
            Patch::RemoveClass { target, class } => {
                if let Some(names) = self.classes.get_mut(target) {
                    names.remove(class);
                }
            }
            Patch::SetAttribute {
                target,
                name,
                value,
            } => {
                self.attributes
                    .entry(*target)
                    .or_default()
                    .insert(*name, value.clone());
            }
            Patch::RemoveAttribute { target, name } => {
                if let Some(attrs) = self.attributes.get_mut(target) {
                    attrs.remove(name);
                }
            }
            Patch::SetStyle {
                target,
                property,
                value,
            } => {
                self.styles
                    .entry(*target)
                    .or_default()
                    .insert(*property, value.clone());
            }
            Patch::SetText { target, text } => {
                self.texts.insert(*target, text.clone());
            }
            Patch::SetValue { target, value } => {
                self.values.insert(*target, value.clone());
            }
            Patch::SetDisabled { target, disabled } => {
                if *disabled {
                    self.disabled.insert(*target);
                } else {
                    self.disabled.remove(target);
                }
            }
            Patch::Focus { target } => self.active = Some(*target),
            Patch::ScrollTo { top, .. } => self.scroll_top = *top,
            Patch::CreateObserver { observer, options } => {
                self.observers.insert(*observer, options.clone());
            }
            Patch::Observe { observer, target } => {
                self.observed.insert((*observer, *target));
            }
            Patch::Unobserve { observer, target } => {
                self.observed.remove(&(*observer, *target));
            }
            Patch::AppendHeadLink { rel, href } => self.head_links.push((*rel, href.clone())),
            Patch::Alert { message } => self.alerts.push(message.clone()),
        }
    }
}

impl Dom for MemoryDom {
    fn offset_top(&self, element: ElementId) -> Option<f64> {
        self.offsets.get(&element).copied()
    }

    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut current = node;
        for _ in 0..=self.parents.len() {
            if current == ancestor {
                return true;
            }
            match self.parents.get(&current) {
                Some(&parent) => current = parent,
                None => return false,
            }
        }
        false
    }

    fn value(&self, element: ElementId) -> &str {
        self.values.get(&element).map_or("", String::as_str)
    }

    fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    fn focusable_within(&self, container: ElementId) -> Vec<ElementId> {
        self.focusables.get(&container).cloned().unwrap_or_default()
    }

    fn apply(&mut self, patch: Patch) {
        self.mirror(&patch);
        self.pending.push(patch);
    }
}

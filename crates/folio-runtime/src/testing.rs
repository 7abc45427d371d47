//! Minimal in-crate document for unit tests.

use std::collections::{HashMap, HashSet};

use folio_core::{Dom, ElementId, Patch};

#[derive(Debug, Default)]
pub(crate) struct RecordingDom {
    pub offsets: HashMap<ElementId, f64>,
    pub parents: HashMap<ElementId, ElementId>,
    pub values: HashMap<ElementId, String>,
    pub active: Option<ElementId>,
    pub focusables: HashMap<ElementId, Vec<ElementId>>,
    pub styles: HashMap<(ElementId, &'static str), String>,
    pub classes: HashSet<(ElementId, &'static str)>,
    pub texts: HashMap<ElementId, String>,
    pub disabled: HashSet<ElementId>,
    pub patches: Vec<Patch>,
}

impl RecordingDom {
    pub fn take(&mut self) -> Vec<Patch> {
        std::mem::take(&mut self.patches)
    }

    pub fn style(&self, element: ElementId, property: &'static str) -> Option<&str> {
        self.styles.get(&(element, property)).map(String::as_str)
    }

    pub fn has_class(&self, element: ElementId, class: &'static str) -> bool {
        self.classes.contains(&(element, class))
    }

    pub fn text(&self, element: ElementId) -> &str {
        self.texts.get(&element).map_or("", String::as_str)
    }

    pub fn type_into(&mut self, element: ElementId, value: &str) {
        self.values.insert(element, value.to_owned());
    }
}

impl Dom for RecordingDom {
    fn offset_top(&self, element: ElementId) -> Option<f64> {
        self.offsets.get(&element).copied()
    }

    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut current = Some(node);
        while let Some(el) = current {
            if el == ancestor {
                return true;
            }
            current = self.parents.get(&el).copied();
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
        match &patch {
            Patch::AddClass { target, class } => {
                self.classes.insert((*target, *class));
            }
            Patch::RemoveClass { target, class } => {
                self.classes.remove(&(*target, *class));
            }
            Patch::SetStyle {
                target,
                property,
                value,
            } => {
                self.styles.insert((*target, *property), value.clone());
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
            _ => {}
        }
        self.patches.push(patch);
    }
}

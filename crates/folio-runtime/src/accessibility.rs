#![forbid(unsafe_code)]

//! Keyboard affordances for the mobile menu.
//!
//! - **Escape** closes an open menu and returns focus to the toggle.
//! - **Focus trap**: while the menu is open, Tab from its last focusable
//!   element wraps to the first and Shift+Tab from the first wraps to the
//!   last.
//!
//! The menu state itself belongs to [`Navigation`]; this component only
//! borrows it for the duration of a key event.
//!
//! # Failure Modes
//!
//! - A menu with no focusable descendants does not trap (focus may escape).
//! - Tab from an element in the middle of the menu keeps the browser's
//!   default order.

use folio_core::{Dom, EventOutcome, KeyCode, KeyEvent};

use crate::navigation::Navigation;

#[derive(Debug, Clone, Copy, Default)]
pub struct AccessibilityEnhancements;

impl AccessibilityEnhancements {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    pub fn on_key_down<D: Dom>(
        &mut self,
        key: KeyEvent,
        nav: &mut Navigation,
        dom: &mut D,
    ) -> EventOutcome {
        match key.code {
            KeyCode::Escape if nav.is_menu_open() => {
                nav.close_menu(dom);
                dom.focus(nav.toggle());
                EventOutcome::Continue
            }
            KeyCode::Tab if nav.is_menu_open() => self.trap_focus(key.shift(), nav, dom),
            _ => EventOutcome::Continue,
        }
    }

    fn trap_focus<D: Dom>(&self, backwards: bool, nav: &Navigation, dom: &mut D) -> EventOutcome {
        let focusable = dom.focusable_within(nav.menu());
        let (Some(&first), Some(&last)) = (focusable.first(), focusable.last()) else {
            return EventOutcome::Continue;
        };
        let active = dom.active_element();

        let wrap_to = if backwards && active == Some(first) {
            last
        } else if !backwards && active == Some(last) {
            first
        } else {
            return EventOutcome::Continue;
        };
        dom.focus(wrap_to);
        EventOutcome::PreventDefault
    }
}

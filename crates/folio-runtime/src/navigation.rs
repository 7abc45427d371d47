#![forbid(unsafe_code)]

//! Navigation: scrolled state, active section link, mobile menu, and
//! smooth in-page scrolling.
//!
//! # Invariants
//!
//! 1. **Active section**: after a scroll pass at offset `S`, the active
//!    section is the last section (document order) whose
//!    `offset_top - lookahead <= S`, or none. Exactly the link targeting it
//!    carries `active`.
//! 2. **Menu**: `menu_open` changes only through the toggle, a nav-link
//!    click, a click outside the navbar, or [`Navigation::close_menu`]
//!    (Escape). `aria-expanded` on the toggle always mirrors it.
//! 3. **Rate**: scroll passes run at most once per throttle window (leading
//!    edge); the optional settle pass runs once after scrolling goes quiet,
//!    using the last observed offset.
//!
//! # Failure Modes
//!
//! - A section with no known offset is skipped by the scan.
//! - An anchor whose target section is unknown still suppresses the jump but
//!   does not scroll.

use core::time::Duration;

use folio_core::rate_limit::{Debounce, Throttle};
use folio_core::{Dom, ElementId, EventOutcome, Patch, ScrollBehavior};

use crate::config::NavConfig;
use crate::markup::{Anchor, NavMarkup, Section};

const CLASS_ACTIVE: &str = "active";
const CLASS_SCROLLED: &str = "scrolled";
const ARIA_EXPANDED: &str = "aria-expanded";

/// Derived navigation state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavState {
    /// Id of the section whose link is highlighted.
    pub active_section: Option<String>,
    /// Whether the mobile menu is open.
    pub menu_open: bool,
    /// Whether the navbar shows its scrolled style.
    pub scrolled: bool,
}

/// Pick the active section for a scroll offset.
///
/// `sections` yields `(id, offset_top)` in document order. Ties and
/// out-of-order offsets resolve to the last qualifying entry.
#[must_use]
pub fn active_section<'a, I>(sections: I, offset: f64, lookahead: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    sections
        .into_iter()
        .filter(|&(_, top)| top - lookahead <= offset)
        .last()
        .map(|(id, _)| id)
}

/// The navigation component.
#[derive(Debug, Clone)]
pub struct Navigation {
    markup: NavMarkup,
    sections: Vec<Section>,
    anchors: Vec<Anchor>,
    scrolled_threshold: f64,
    lookahead: f64,
    header_offset: f64,
    throttle: Throttle,
    settle: Option<Debounce>,
    last_offset: f64,
    state: NavState,
}

impl Navigation {
    pub fn new(
        markup: NavMarkup,
        sections: Vec<Section>,
        anchors: Vec<Anchor>,
        config: &NavConfig,
    ) -> Self {
        Self {
            markup,
            sections,
            anchors,
            scrolled_threshold: config.scrolled_threshold_px,
            lookahead: config.section_lookahead_px,
            header_offset: config.header_offset_px,
            throttle: Throttle::new(config.scroll_throttle()),
            settle: config.settle().map(Debounce::new),
            last_offset: 0.0,
            state: NavState::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &NavState {
        &self.state
    }

    #[must_use]
    pub fn is_menu_open(&self) -> bool {
        self.state.menu_open
    }

    /// The mobile menu toggle button.
    #[must_use]
    pub fn toggle(&self) -> ElementId {
        self.markup.toggle
    }

    /// The mobile menu container.
    #[must_use]
    pub fn menu(&self) -> ElementId {
        self.markup.menu
    }

    /// Handle a window scroll at host time `now`.
    pub fn on_scroll<D: Dom>(&mut self, offset: f64, now: Duration, dom: &mut D) {
        self.last_offset = offset;
        if let Some(settle) = &mut self.settle {
            settle.trigger(now);
        }
        if self.throttle.try_fire(now) {
            self.sync_scroll(offset, dom);
        }
    }

    /// When the pending settle pass is due, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.settle.as_ref().and_then(Debounce::deadline)
    }

    /// Run the settle pass if it is due. Returns whether it ran.
    pub fn poll_settle<D: Dom>(&mut self, now: Duration, dom: &mut D) -> bool {
        let due = self.settle.as_mut().is_some_and(|settle| settle.poll(now));
        if due {
            self.sync_scroll(self.last_offset, dom);
        }
        due
    }

    fn sync_scroll<D: Dom>(&mut self, offset: f64, dom: &mut D) {
        let scrolled = offset > self.scrolled_threshold;
        if scrolled != self.state.scrolled {
            self.state.scrolled = scrolled;
            dom.set_class(self.markup.navbar, CLASS_SCROLLED, scrolled);
        }

        let current = active_section(
            self.sections.iter().filter_map(|section| {
                dom.offset_top(section.element)
                    .map(|top| (section.id.as_str(), top))
            }),
            offset,
            self.lookahead,
        )
        .map(str::to_owned);

        if current != self.state.active_section {
            tracing::debug!(
                from = ?self.state.active_section,
                to = ?current,
                offset,
                "active section changed"
            );
            for link in &self.markup.links {
                let on = current.as_deref().is_some_and(|id| link.targets(id));
                dom.set_class(link.element, CLASS_ACTIVE, on);
            }
            self.state.active_section = current;
        }
    }

    /// Handle a click anywhere in the document.
    pub fn on_click<D: Dom>(&mut self, target: ElementId, dom: &mut D) -> EventOutcome {
        if dom.contains(self.markup.toggle, target) {
            self.set_menu_open(!self.state.menu_open, dom);
        } else if self
            .markup
            .links
            .iter()
            .any(|link| dom.contains(link.element, target))
        {
            self.close_menu(dom);
        } else if !dom.contains(self.markup.navbar, target) {
            self.close_menu(dom);
        }

        self.smooth_scroll(target, dom)
    }

    fn smooth_scroll<D: Dom>(&self, target: ElementId, dom: &mut D) -> EventOutcome {
        let Some(anchor) = self
            .anchors
            .iter()
            .find(|anchor| dom.contains(anchor.element, target))
        else {
            return EventOutcome::Continue;
        };

        let destination = anchor
            .fragment()
            .and_then(|id| self.sections.iter().find(|section| section.id == id))
            .and_then(|section| dom.offset_top(section.element));

        if let Some(top) = destination {
            dom.apply(Patch::ScrollTo {
                top: (top - self.header_offset).max(0.0),
                behavior: ScrollBehavior::Smooth,
            });
        }
        EventOutcome::PreventDefault
    }

    /// Close the menu if it is open.
    pub fn close_menu<D: Dom>(&mut self, dom: &mut D) {
        if self.state.menu_open {
            self.set_menu_open(false, dom);
        }
    }

    fn set_menu_open<D: Dom>(&mut self, open: bool, dom: &mut D) {
        tracing::debug!(open, "mobile menu");
        self.state.menu_open = open;
        dom.set_class(self.markup.menu, CLASS_ACTIVE, open);
        dom.set_class(self.markup.toggle, CLASS_ACTIVE, open);
        dom.set_attribute(
            self.markup.toggle,
            ARIA_EXPANDED,
            if open { "true" } else { "false" },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::NavLink;
    use crate::testing::RecordingDom;
    use pretty_assertions::assert_eq;

    const NAVBAR: ElementId = ElementId(1);
    const TOGGLE: ElementId = ElementId(2);
    const MENU: ElementId = ElementId(3);
    const LINK_HOME: ElementId = ElementId(10);
    const LINK_ABOUT: ElementId = ElementId(11);
    const SEC_HOME: ElementId = ElementId(20);
    const SEC_ABOUT: ElementId = ElementId(21);
    const OUTSIDE: ElementId = ElementId(99);

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn fixture(settle_ms: u64) -> (Navigation, RecordingDom) {
        let markup = NavMarkup {
            navbar: NAVBAR,
            toggle: TOGGLE,
            menu: MENU,
            links: vec![
                NavLink::new(LINK_HOME, "#home"),
                NavLink::new(LINK_ABOUT, "#about"),
            ],
        };
        let sections = vec![
            Section::new(SEC_HOME, "home"),
            Section::new(SEC_ABOUT, "about"),
        ];
        let anchors = vec![
            Anchor::new(LINK_HOME, "#home"),
            Anchor::new(LINK_ABOUT, "#about"),
        ];
        let config = NavConfig {
            settle_ms,
            ..NavConfig::default()
        };
        let mut dom = RecordingDom::default();
        dom.offsets.insert(SEC_HOME, 0.0);
        dom.offsets.insert(SEC_ABOUT, 800.0);
        for child in [TOGGLE, MENU] {
            dom.parents.insert(child, NAVBAR);
        }
        for child in [LINK_HOME, LINK_ABOUT] {
            dom.parents.insert(child, MENU);
        }
        (Navigation::new(markup, sections, anchors, &config), dom)
    }

    #[test]
    fn active_section_picks_last_crossed_threshold() {
        let sections = [("a", 0.0), ("b", 500.0), ("c", 1000.0)];
        assert_eq!(active_section(sections, 0.0, 200.0), Some("a"));
        assert_eq!(active_section(sections, 299.0, 200.0), Some("a"));
        assert_eq!(active_section(sections, 300.0, 200.0), Some("b"));
        assert_eq!(active_section(sections, 5000.0, 200.0), Some("c"));
        assert_eq!(active_section([("a", 400.0)], 100.0, 200.0), None);
        assert_eq!(active_section(Vec::<(&str, f64)>::new(), 100.0, 200.0), None);
    }

    #[test]
    fn scroll_marks_navbar_and_active_link() {
        let (mut nav, mut dom) = fixture(0);
        nav.on_scroll(700.0, ms(0), &mut dom);
        assert!(nav.state().scrolled);
        assert_eq!(nav.state().active_section.as_deref(), Some("about"));
        assert_eq!(
            dom.take(),
            vec![
                Patch::AddClass {
                    target: NAVBAR,
                    class: "scrolled"
                },
                Patch::RemoveClass {
                    target: LINK_HOME,
                    class: "active"
                },
                Patch::AddClass {
                    target: LINK_ABOUT,
                    class: "active"
                },
            ]
        );
    }

    #[test]
    fn scroll_is_throttled_without_settle() {
        let (mut nav, mut dom) = fixture(0);
        nav.on_scroll(10.0, ms(0), &mut dom);
        assert_eq!(nav.state().active_section.as_deref(), Some("home"));
        nav.on_scroll(900.0, ms(50), &mut dom);
        assert_eq!(nav.state().active_section.as_deref(), Some("home"));
        assert_eq!(nav.next_deadline(), None);
        nav.on_scroll(900.0, ms(100), &mut dom);
        assert_eq!(nav.state().active_section.as_deref(), Some("about"));
    }

    #[test]
    fn settle_pass_catches_final_offset() {
        let (mut nav, mut dom) = fixture(150);
        nav.on_scroll(10.0, ms(0), &mut dom);
        nav.on_scroll(900.0, ms(50), &mut dom);
        assert_eq!(nav.state().active_section.as_deref(), Some("home"));
        assert_eq!(nav.next_deadline(), Some(ms(200)));
        assert!(!nav.poll_settle(ms(199), &mut dom));
        assert!(nav.poll_settle(ms(200), &mut dom));
        assert_eq!(nav.state().active_section.as_deref(), Some("about"));
        assert!(!nav.poll_settle(ms(400), &mut dom));
    }

    #[test]
    fn unchanged_state_emits_nothing() {
        let (mut nav, mut dom) = fixture(0);
        nav.on_scroll(900.0, ms(0), &mut dom);
        dom.take();
        nav.on_scroll(950.0, ms(500), &mut dom);
        assert!(dom.patches.is_empty());
    }

    #[test]
    fn section_without_offset_is_skipped() {
        let (mut nav, mut dom) = fixture(0);
        dom.offsets.remove(&SEC_ABOUT);
        nav.on_scroll(5000.0, ms(0), &mut dom);
        assert_eq!(nav.state().active_section.as_deref(), Some("home"));
    }

    #[test]
    fn toggle_flips_menu_and_aria() {
        let (mut nav, mut dom) = fixture(0);
        let _ = nav.on_click(TOGGLE, &mut dom);
        assert!(nav.is_menu_open());
        assert!(dom.patches.contains(&Patch::SetAttribute {
            target: TOGGLE,
            name: "aria-expanded",
            value: "true".into()
        }));
        dom.take();
        let _ = nav.on_click(TOGGLE, &mut dom);
        assert!(!nav.is_menu_open());
        assert!(dom.patches.contains(&Patch::SetAttribute {
            target: TOGGLE,
            name: "aria-expanded",
            value: "false".into()
        }));
    }

    #[test]
    fn outside_click_closes_but_inside_click_does_not() {
        let (mut nav, mut dom) = fixture(0);
        let _ = nav.on_click(TOGGLE, &mut dom);
        let _ = nav.on_click(NAVBAR, &mut dom);
        assert!(nav.is_menu_open());
        let outcome = nav.on_click(OUTSIDE, &mut dom);
        assert!(!nav.is_menu_open());
        assert_eq!(outcome, EventOutcome::Continue);
    }

    #[test]
    fn outside_click_with_closed_menu_is_silent() {
        let (mut nav, mut dom) = fixture(0);
        let _ = nav.on_click(OUTSIDE, &mut dom);
        assert!(dom.patches.is_empty());
    }

    #[test]
    fn link_click_closes_menu_and_smooth_scrolls() {
        let (mut nav, mut dom) = fixture(0);
        let _ = nav.on_click(TOGGLE, &mut dom);
        dom.take();
        let outcome = nav.on_click(LINK_ABOUT, &mut dom);
        assert!(outcome.default_prevented());
        assert!(!nav.is_menu_open());
        assert_eq!(
            dom.patches.last(),
            Some(&Patch::ScrollTo {
                top: 720.0,
                behavior: ScrollBehavior::Smooth
            })
        );
    }

    #[test]
    fn scroll_target_is_clamped_at_top() {
        let (mut nav, mut dom) = fixture(0);
        let _ = nav.on_click(LINK_HOME, &mut dom);
        assert_eq!(
            dom.patches.last(),
            Some(&Patch::ScrollTo {
                top: 0.0,
                behavior: ScrollBehavior::Smooth
            })
        );
    }

    #[test]
    fn anchor_to_missing_section_prevents_without_scrolling() {
        let (mut nav, mut dom) = fixture(0);
        nav.anchors.push(Anchor::new(ElementId(50), "#blog"));
        nav.anchors.push(Anchor::new(ElementId(51), "#"));
        assert!(nav.on_click(ElementId(50), &mut dom).default_prevented());
        assert!(nav.on_click(ElementId(51), &mut dom).default_prevented());
        assert!(
            !dom.patches
                .iter()
                .any(|p| matches!(p, Patch::ScrollTo { .. }))
        );
    }
}

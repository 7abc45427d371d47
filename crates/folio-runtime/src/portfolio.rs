#![forbid(unsafe_code)]

//! Bootstrap and event dispatch.
//!
//! [`Portfolio`] owns one instance of each component, constructed in a fixed
//! order once the document is ready: Navigation, ScrollAnimations,
//! ContactForm, PerformanceOptimizer, AccessibilityEnhancements. Events are
//! routed to the components in that same order, and timers are fired in
//! global deadline order across components.
//!
//! Listeners belong to the instance. Building a second `Portfolio` against
//! the same document yields an independent set; nothing is registered
//! globally, so repeated construction never accumulates handlers.

use core::time::Duration;

use folio_core::{Dom, DomEvent, EventOutcome};

use crate::accessibility::AccessibilityEnhancements;
use crate::config::SiteConfig;
use crate::contact_form::{ContactBackend, ContactForm, SimulatedBackend};
use crate::markup::SiteMarkup;
use crate::navigation::Navigation;
use crate::performance::PerformanceOptimizer;
use crate::scroll_animations::ScrollAnimations;

#[derive(Debug)]
pub struct Portfolio<B = SimulatedBackend> {
    navigation: Navigation,
    scroll_animations: ScrollAnimations,
    contact_form: ContactForm<B>,
    performance: PerformanceOptimizer,
    accessibility: AccessibilityEnhancements,
}

impl Portfolio<SimulatedBackend> {
    /// Wire every component with the simulated contact backend.
    pub fn new<D: Dom>(markup: SiteMarkup, config: &SiteConfig, dom: &mut D) -> Self {
        let backend = SimulatedBackend::new(config.form.submit_latency());
        Self::with_backend(markup, config, backend, dom)
    }
}

impl<B: ContactBackend> Portfolio<B> {
    /// Wire every component, delivering contact messages through `backend`.
    pub fn with_backend<D: Dom>(
        markup: SiteMarkup,
        config: &SiteConfig,
        backend: B,
        dom: &mut D,
    ) -> Self {
        let SiteMarkup {
            nav,
            sections,
            anchors,
            animated,
            skill_bars,
            contact,
            lazy_images,
            external_links,
        } = markup;

        let navigation = Navigation::new(nav, sections, anchors, &config.nav);
        let scroll_animations = ScrollAnimations::new(animated, skill_bars, &config.reveal, dom);
        let contact_form = ContactForm::new(contact, backend, config.form.success_display());
        let performance = PerformanceOptimizer::new(lazy_images, external_links, &config.lazy, dom);
        let accessibility = AccessibilityEnhancements::new();

        if config.mode.is_development() {
            tracing::debug!("portfolio initialized");
        }

        Self {
            navigation,
            scroll_animations,
            contact_form,
            performance,
            accessibility,
        }
    }

    #[must_use]
    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    #[must_use]
    pub fn scroll_animations(&self) -> &ScrollAnimations {
        &self.scroll_animations
    }

    #[must_use]
    pub fn contact_form(&self) -> &ContactForm<B> {
        &self.contact_form
    }

    #[must_use]
    pub fn performance(&self) -> &PerformanceOptimizer {
        &self.performance
    }

    /// Route one event at host time `now`.
    pub fn dispatch<D: Dom>(&mut self, event: &DomEvent, now: Duration, dom: &mut D) -> EventOutcome {
        match *event {
            DomEvent::Scroll { offset } => {
                self.navigation.on_scroll(offset, now, dom);
                EventOutcome::Continue
            }
            DomEvent::Click { target } => self.navigation.on_click(target, dom),
            DomEvent::KeyDown(key) => {
                self.accessibility
                    .on_key_down(key, &mut self.navigation, dom)
            }
            DomEvent::Input { target } => {
                self.contact_form.on_input(target, dom);
                EventOutcome::Continue
            }
            DomEvent::Blur { target } => {
                self.contact_form.on_blur(target, dom);
                EventOutcome::Continue
            }
            DomEvent::Submit { form } => self.contact_form.on_submit(form, now, dom),
            DomEvent::Intersect(entry) => {
                self.scroll_animations.on_intersect(entry, dom);
                self.performance.on_intersect(entry, dom);
                EventOutcome::Continue
            }
            DomEvent::MouseEnter { target } => {
                self.performance.on_mouse_enter(target, dom);
                EventOutcome::Continue
            }
        }
    }

    /// Earliest pending timer across components.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        match (
            self.navigation.next_deadline(),
            self.contact_form.next_deadline(),
        ) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fire every timer due by `now`, earliest first. Returns how many fired.
    pub fn advance<D: Dom>(&mut self, now: Duration, dom: &mut D) -> usize {
        let mut fired = 0;
        loop {
            let nav = self.navigation.next_deadline().filter(|&at| at <= now);
            let form = self.contact_form.next_deadline().filter(|&at| at <= now);
            let ran = match (nav, form) {
                (Some(n), Some(f)) if n <= f => self.navigation.poll_settle(n, dom),
                (Some(n), None) => self.navigation.poll_settle(n, dom),
                (_, Some(_)) => self.contact_form.fire_next(now, dom),
                (None, None) => false,
            };
            if !ran {
                return fired;
            }
            fired += 1;
        }
    }
}

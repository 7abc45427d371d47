#![forbid(unsafe_code)]

//! One-shot reveal and skill-bar animations driven by intersection.
//!
//! # Invariants
//!
//! 1. **Reveal is monotonic**: `Hidden -> Revealed` happens on the first
//!    intersecting entry; later entries (leaving or re-entering) emit
//!    nothing.
//! 2. **Skill bars fire once**: the first intersecting entry sets
//!    `--progress`, adds `animated`, and unobserves the bar.
//! 3. Entries for unknown elements or other observers are ignored.

use folio_core::{Dom, ElementId, IntersectionEntry, ObserverKind, Patch};

use crate::config::ObserverConfig;
use crate::markup::SkillBar;

const HIDDEN_TRANSFORM: &str = "translateY(20px)";
const SHOWN_TRANSFORM: &str = "translateY(0)";
const REVEAL_TRANSITION: &str = "opacity 0.6s ease, transform 0.6s ease";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Hidden,
    Revealed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillBarState {
    Pending,
    Animated,
}

#[derive(Debug, Clone)]
pub struct ScrollAnimations {
    reveals: Vec<(ElementId, RevealState)>,
    skill_bars: Vec<(SkillBar, SkillBarState)>,
}

impl ScrollAnimations {
    /// Hide every animated element and start observing it and the skill bars.
    pub fn new<D: Dom>(
        animated: Vec<ElementId>,
        skill_bars: Vec<SkillBar>,
        observer: &ObserverConfig,
        dom: &mut D,
    ) -> Self {
        for kind in [ObserverKind::Reveal, ObserverKind::SkillBar] {
            dom.apply(Patch::CreateObserver {
                observer: kind,
                options: observer.to_options(),
            });
        }

        for &element in &animated {
            dom.set_style(element, "opacity", "0");
            dom.set_style(element, "transform", HIDDEN_TRANSFORM);
            dom.set_style(element, "transition", REVEAL_TRANSITION);
            dom.apply(Patch::Observe {
                observer: ObserverKind::Reveal,
                target: element,
            });
        }
        for bar in &skill_bars {
            dom.apply(Patch::Observe {
                observer: ObserverKind::SkillBar,
                target: bar.element,
            });
        }

        Self {
            reveals: animated
                .into_iter()
                .map(|element| (element, RevealState::Hidden))
                .collect(),
            skill_bars: skill_bars
                .into_iter()
                .map(|bar| (bar, SkillBarState::Pending))
                .collect(),
        }
    }

    #[must_use]
    pub fn reveal_state(&self, element: ElementId) -> Option<RevealState> {
        self.reveals
            .iter()
            .find(|(el, _)| *el == element)
            .map(|(_, state)| *state)
    }

    #[must_use]
    pub fn skill_bar_state(&self, element: ElementId) -> Option<SkillBarState> {
        self.skill_bars
            .iter()
            .find(|(bar, _)| bar.element == element)
            .map(|(_, state)| *state)
    }

    pub fn on_intersect<D: Dom>(&mut self, entry: IntersectionEntry, dom: &mut D) {
        if !entry.is_intersecting {
            return;
        }
        match entry.observer {
            ObserverKind::Reveal => self.reveal(entry.target, dom),
            ObserverKind::SkillBar => self.animate_skill_bar(entry.target, dom),
            ObserverKind::LazyImage => {}
        }
    }

    fn reveal<D: Dom>(&mut self, element: ElementId, dom: &mut D) {
        let Some((_, state)) = self.reveals.iter_mut().find(|(el, _)| *el == element) else {
            return;
        };
        if *state == RevealState::Revealed {
            return;
        }
        *state = RevealState::Revealed;
        dom.set_style(element, "opacity", "1");
        dom.set_style(element, "transform", SHOWN_TRANSFORM);
    }

    fn animate_skill_bar<D: Dom>(&mut self, element: ElementId, dom: &mut D) {
        let Some((bar, state)) = self
            .skill_bars
            .iter_mut()
            .find(|(bar, _)| bar.element == element)
        else {
            return;
        };
        if *state == SkillBarState::Animated {
            return;
        }
        *state = SkillBarState::Animated;
        tracing::debug!(element = element.get(), progress = bar.progress, "skill bar animated");
        dom.set_style(element, "--progress", bar.css_value());
        dom.add_class(element, "animated");
        dom.apply(Patch::Unobserve {
            observer: ObserverKind::SkillBar,
            target: element,
        });
    }
}

#![forbid(unsafe_code)]

//! Host-driven stepper around [`Portfolio`].
//!
//! The host owns the event loop. It mirrors layout facts into the
//! [`MemoryDom`], advances the [`DeterministicClock`], and either dispatches
//! events one at a time (when it needs the `preventDefault` answer
//! synchronously) or queues them and calls [`StepPortfolio::step`]. After
//! each step it drains the emitted patches and applies them to the page.
//!
//! Components are only constructed when the host signals that the document
//! is ready. Events arriving earlier are discarded, as no listener existed
//! yet to receive them.
//!
//! # Example
//!
//! ```ignore
//! let mut stepper = StepPortfolio::from_json(markup_json, None)?;
//! stepper.ready();
//! stepper.dispatch(DomEvent::Scroll { offset: 120.0 });
//! stepper.advance_time(Duration::from_millis(16));
//! let jsonl = stepper.take_patches_jsonl()?;
//! ```

use core::time::Duration;
use std::collections::VecDeque;

use folio_core::{DomEvent, ElementId, EventOutcome, Patch};
use folio_runtime::{ConfigError, ContactBackend, Portfolio, SimulatedBackend, SiteConfig, SiteMarkup};

use crate::DeterministicClock;
use crate::input_parser::{HostInput, InputParseError, parse_encoded_input};
use crate::memory_dom::MemoryDom;

/// Errors constructing a stepper from host JSON.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Markup description that does not decode (including non-absolute
    /// external links).
    #[error("invalid markup: {0}")]
    Markup(#[source] serde_json::Error),
    #[error("invalid site config: {0}")]
    Config(#[from] ConfigError),
}

/// Summary of one [`StepPortfolio::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepResult {
    /// Queued events dispatched.
    pub events: usize,
    /// Timers fired.
    pub timers: usize,
    /// Dispatched events whose default action was prevented.
    pub prevented: usize,
}

#[derive(Debug)]
pub struct StepPortfolio<B = SimulatedBackend> {
    clock: DeterministicClock,
    dom: MemoryDom,
    config: SiteConfig,
    /// Markup and backend held until the host signals ready.
    pending: Option<(SiteMarkup, B)>,
    site: Option<Portfolio<B>>,
    queue: VecDeque<HostInput>,
    dropped: usize,
}

impl StepPortfolio<SimulatedBackend> {
    #[must_use]
    pub fn new(markup: SiteMarkup, config: SiteConfig) -> Self {
        let backend = SimulatedBackend::new(config.form.submit_latency());
        Self::with_backend(markup, config, backend)
    }

    /// Decode markup JSON and optional config JSON (defaults when `None`).
    pub fn from_json(markup_json: &str, config_json: Option<&str>) -> Result<Self, HostError> {
        let markup: SiteMarkup = serde_json::from_str(markup_json).map_err(HostError::Markup)?;
        let config = match config_json {
            Some(json) => SiteConfig::from_json_str(json)?,
            None => SiteConfig::default(),
        };
        Ok(Self::new(markup, config))
    }
}

impl<B: ContactBackend> StepPortfolio<B> {
    pub fn with_backend(markup: SiteMarkup, config: SiteConfig, backend: B) -> Self {
        Self {
            clock: DeterministicClock::new(),
            dom: MemoryDom::new(),
            config,
            pending: Some((markup, backend)),
            site: None,
            queue: VecDeque::new(),
            dropped: 0,
        }
    }

    /// Construct the components. Returns `false` if already ready.
    pub fn ready(&mut self) -> bool {
        let Some((markup, backend)) = self.pending.take() else {
            return false;
        };
        self.site = Some(Portfolio::with_backend(
            markup,
            &self.config,
            backend,
            &mut self.dom,
        ));
        tracing::debug!(now_ms = self.clock.now().as_millis() as u64, "document ready");
        true
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.site.is_some()
    }

    #[must_use]
    pub fn portfolio(&self) -> Option<&Portfolio<B>> {
        self.site.as_ref()
    }

    #[must_use]
    pub fn dom(&self) -> &MemoryDom {
        &self.dom
    }

    /// Mutable access for mirroring layout facts.
    pub fn dom_mut(&mut self) -> &mut MemoryDom {
        &mut self.dom
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Events discarded because they arrived before ready.
    #[must_use]
    pub fn dropped_events(&self) -> usize {
        self.dropped
    }

    /// Earliest pending timer, in host time.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.site.as_ref().and_then(Portfolio::next_deadline)
    }

    /// Advance the clock by `dt` and fire every timer that came due.
    pub fn advance_time(&mut self, dt: Duration) -> usize {
        self.clock.advance(dt);
        self.fire_timers()
    }

    /// Jump the clock to `now` (replay mode) and fire due timers. A time
    /// earlier than the current clock is ignored.
    pub fn set_time(&mut self, now: Duration) -> usize {
        if now > self.clock.now() {
            self.clock.set(now);
        }
        self.fire_timers()
    }

    fn fire_timers(&mut self) -> usize {
        match self.site.as_mut() {
            Some(site) => site.advance(self.clock.now(), &mut self.dom),
            None => 0,
        }
    }

    /// Dispatch one event immediately at the current time. `None` before
    /// ready (the event is dropped).
    pub fn dispatch(&mut self, event: DomEvent) -> Option<EventOutcome> {
        self.dispatch_input(HostInput::Event(event))
    }

    /// Mirror a typed value, then dispatch `Input` for it.
    pub fn type_into(
        &mut self,
        target: ElementId,
        value: impl Into<String>,
    ) -> Option<EventOutcome> {
        self.dispatch_input(HostInput::Typed {
            target,
            value: value.into(),
        })
    }

    fn dispatch_input(&mut self, input: HostInput) -> Option<EventOutcome> {
        if let HostInput::Ready = input {
            self.ready();
            return Some(EventOutcome::Continue);
        }
        let Some(site) = self.site.as_mut() else {
            self.dropped += 1;
            tracing::debug!(?input, "event before ready dropped");
            return None;
        };
        let now = self.clock.now();
        site.advance(now, &mut self.dom);
        let event = match input {
            HostInput::Typed { target, value } => {
                self.dom.set_value(target, value);
                DomEvent::Input { target }
            }
            HostInput::Event(event) => event,
            HostInput::Ready => return Some(EventOutcome::Continue),
        };
        Some(site.dispatch(&event, now, &mut self.dom))
    }

    /// Queue an event for the next [`step`](Self::step). Returns `false`
    /// (and drops it) before ready.
    pub fn push_event(&mut self, event: DomEvent) -> bool {
        self.push_input(HostInput::Event(event))
    }

    /// Decode and queue one JSON-encoded input. A `ready` input takes
    /// effect immediately. Returns `Ok(false)` for dropped or unknown
    /// inputs.
    pub fn push_encoded_input(&mut self, json: &str) -> Result<bool, InputParseError> {
        match parse_encoded_input(json)? {
            Some(input) => Ok(self.push_input(input)),
            None => Ok(false),
        }
    }

    fn push_input(&mut self, input: HostInput) -> bool {
        if let HostInput::Ready = input {
            return self.ready();
        }
        if !self.is_ready() {
            self.dropped += 1;
            return false;
        }
        self.queue.push_back(input);
        true
    }

    /// Fire due timers, then dispatch every queued event in order.
    pub fn step(&mut self) -> StepResult {
        let mut result = StepResult {
            timers: self.fire_timers(),
            ..StepResult::default()
        };
        while let Some(input) = self.queue.pop_front() {
            if let Some(outcome) = self.dispatch_input(input) {
                result.events += 1;
                if outcome.default_prevented() {
                    result.prevented += 1;
                }
            }
        }
        result
    }

    /// Drain the patches the host still has to apply.
    pub fn take_patches(&mut self) -> Vec<Patch> {
        self.dom.take_patches()
    }

    /// Drain pending patches as JSONL, one patch object per line.
    pub fn take_patches_jsonl(&mut self) -> Result<String, serde_json::Error> {
        patches_to_jsonl(&self.dom.take_patches())
    }
}

/// Encode patches as JSONL (each line ends with `\n`).
pub fn patches_to_jsonl(patches: &[Patch]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for patch in patches {
        out.push_str(&serde_json::to_string(patch)?);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::ScrollBehavior;
    use folio_runtime::SkillBarState;
    use pretty_assertions::assert_eq;

    const MARKUP: &str = r##"{
        "nav": { "navbar": 1, "toggle": 2, "menu": 3,
                 "links": [{ "element": 4, "href": "#home" }] },
        "sections": [{ "element": 5, "id": "home" }],
        "anchors": [{ "element": 4, "href": "#home" }],
        "contact": {
            "form": 20,
            "name": { "input": 21, "error": 22 },
            "email": { "input": 23, "error": 24 },
            "message": { "input": 25, "error": 26 },
            "submitButton": 27, "buttonLabel": 28, "buttonLoading": 29,
            "success": 30
        }
    }"##;

    #[test]
    fn events_before_ready_are_dropped() {
        let mut stepper = StepPortfolio::from_json(MARKUP, None).expect("markup");
        assert_eq!(stepper.dispatch(DomEvent::Click { target: ElementId(2) }), None);
        assert!(!stepper.push_event(DomEvent::Scroll { offset: 90.0 }));
        assert_eq!(stepper.dropped_events(), 2);
        assert!(stepper.take_patches().is_empty());

        assert!(stepper.ready());
        assert!(!stepper.ready());
        assert!(stepper.is_ready());
        assert!(!stepper.portfolio().expect("ready").navigation().is_menu_open());
    }

    #[test]
    fn queued_events_run_on_step() {
        let mut stepper = StepPortfolio::from_json(MARKUP, None).expect("markup");
        stepper.ready();
        stepper.dom_mut().set_offset_top(ElementId(5), 300.0);
        stepper.take_patches();

        assert!(stepper.push_event(DomEvent::Click { target: ElementId(4) }));
        assert_eq!(
            stepper.step(),
            StepResult {
                events: 1,
                timers: 0,
                prevented: 1
            }
        );
        assert_eq!(
            stepper.take_patches().last(),
            Some(&Patch::ScrollTo {
                top: 220.0,
                behavior: ScrollBehavior::Smooth
            })
        );
    }

    #[test]
    fn encoded_ready_takes_effect_immediately() {
        let mut stepper = StepPortfolio::from_json(MARKUP, None).expect("markup");
        assert_eq!(stepper.push_encoded_input(r#"{"kind":"blur","target":21}"#), Ok(false));
        assert_eq!(stepper.push_encoded_input(r#"{"kind":"ready"}"#), Ok(true));
        assert_eq!(stepper.push_encoded_input(r#"{"kind":"blur","target":21}"#), Ok(true));
        assert_eq!(stepper.push_encoded_input(r#"{"kind":"hover"}"#), Ok(false));
        assert_eq!(stepper.step().events, 1);
        assert_eq!(stepper.dom().text(ElementId(22)), "Name is required");
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut stepper = StepPortfolio::from_json(MARKUP, None).expect("markup");
        stepper.advance_time(Duration::from_millis(500));
        stepper.set_time(Duration::from_millis(100));
        assert_eq!(stepper.now(), Duration::from_millis(500));
    }

    #[test]
    fn bad_json_reports_the_cause() {
        assert!(matches!(
            StepPortfolio::from_json("{}", None),
            Err(HostError::Markup(_))
        ));
        let bad_link = MARKUP.replacen(
            r#""contact""#,
            r#""externalLinks": [{ "element": 9, "href": "/about" }], "contact""#,
            1,
        );
        let err = StepPortfolio::from_json(&bad_link, None).unwrap_err();
        assert!(err.to_string().contains("not an absolute"), "{err}");

        assert!(matches!(
            StepPortfolio::from_json(MARKUP, Some(r#"{"form":{"success_display_ms":0}}"#)),
            Err(HostError::Config(ConfigError::Validation(_)))
        ));
    }

    #[test]
    fn non_numeric_skill_progress_skips_only_that_bar() {
        let markup = MARKUP.replacen(
            r#""contact""#,
            r#""skillBars": [
                { "element": 8, "progress": "lots" },
                { "element": 9, "progress": "92.5" }
            ], "contact""#,
            1,
        );
        let mut stepper = StepPortfolio::from_json(&markup, None).expect("markup");
        assert!(stepper.ready());
        let anims = stepper.portfolio().expect("ready").scroll_animations();
        assert_eq!(anims.skill_bar_state(ElementId(8)), None);
        assert_eq!(anims.skill_bar_state(ElementId(9)), Some(SkillBarState::Pending));
    }

    #[test]
    fn jsonl_has_one_patch_per_line() {
        let mut stepper = StepPortfolio::from_json(MARKUP, None).expect("markup");
        stepper.ready();
        stepper.take_patches();
        let _ = stepper.dispatch(DomEvent::Click { target: ElementId(2) });
        let jsonl = stepper.take_patches_jsonl().expect("encode");
        let lines: Vec<&str> = jsonl.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            r#"{"op":"addClass","target":3,"class":"active"}"#
        );
        assert!(jsonl.ends_with('\n'));
    }
}

#![forbid(unsafe_code)]

//! Contact form: per-field validation and the submission lifecycle.
//!
//! # State machine
//!
//! ```text
//!   Idle ──submit (all valid)──► Submitting ──deliver Ok──► Success ──5 s──► Idle
//!    ▲                               │
//!    └────────── immediately ◄── Failed ◄──deliver Err──┘
//! ```
//!
//! Submitting from `Success` is allowed (the button is enabled again): the
//! pending hide is cancelled and the indicator hidden first.
//!
//! # Invariants
//!
//! 1. At most one submission is in flight; submit while `Submitting` is a
//!    no-op.
//! 2. A field's error text is shown only after that field was validated by
//!    blur or submit, and is cleared as soon as the visitor types in it.
//! 3. When a submission completes, the button is re-enabled and its label
//!    restored whatever the outcome.
//! 4. Every submit event has its default action prevented.

mod backend;
pub mod validation;

use core::time::Duration;

use folio_core::{Dom, ElementId, EventOutcome, Patch};

use crate::markup::{ContactFormMarkup, FieldMarkup};
use crate::timer::{TimerId, TimerQueue};

pub use backend::{ContactBackend, ContactSubmission, SimulatedBackend, SubmissionError};
pub use validation::{FieldKind, ValidationError};

const CLASS_ERROR: &str = "error";
const FAILURE_ALERT: &str = "Sorry, there was an error sending your message. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Success,
    Failed,
}

/// Validation state of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldState {
    /// Error currently displayed, if any.
    pub error: Option<ValidationError>,
    /// Validated by blur or submit since the last reset.
    pub touched: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormTimer {
    Complete,
    HideSuccess,
}

#[derive(Debug)]
pub struct ContactForm<B = SimulatedBackend> {
    markup: ContactFormMarkup,
    backend: B,
    state: SubmissionState,
    fields: [FieldState; 3],
    in_flight: Option<ContactSubmission>,
    timers: TimerQueue<FormTimer>,
    hide_timer: Option<TimerId>,
    success_display: Duration,
}

impl<B: ContactBackend> ContactForm<B> {
    pub fn new(markup: ContactFormMarkup, backend: B, success_display: Duration) -> Self {
        Self {
            markup,
            backend,
            state: SubmissionState::Idle,
            fields: [FieldState::default(); 3],
            in_flight: None,
            timers: TimerQueue::new(),
            hide_timer: None,
            success_display,
        }
    }

    #[must_use]
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    #[must_use]
    pub fn field(&self, kind: FieldKind) -> FieldState {
        self.fields[index(kind)]
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn field_markup(&self, kind: FieldKind) -> FieldMarkup {
        match kind {
            FieldKind::Name => self.markup.name,
            FieldKind::Email => self.markup.email,
            FieldKind::Message => self.markup.message,
        }
    }

    fn field_for_input(&self, input: ElementId) -> Option<FieldKind> {
        FieldKind::ALL
            .into_iter()
            .find(|&kind| self.field_markup(kind).input == input)
    }

    /// Re-validate the field that lost focus.
    pub fn on_blur<D: Dom>(&mut self, target: ElementId, dom: &mut D) {
        if let Some(kind) = self.field_for_input(target) {
            self.validate_field(kind, dom);
        }
    }

    /// Clear the error of the field being typed in.
    pub fn on_input<D: Dom>(&mut self, target: ElementId, dom: &mut D) {
        if let Some(kind) = self.field_for_input(target) {
            self.show_error(kind, None, dom);
        }
    }

    /// Handle a submit of `form` at host time `now`.
    pub fn on_submit<D: Dom>(&mut self, form: ElementId, now: Duration, dom: &mut D) -> EventOutcome {
        if form != self.markup.form {
            return EventOutcome::Continue;
        }
        if self.state == SubmissionState::Submitting {
            tracing::debug!("submit ignored: submission in flight");
            return EventOutcome::PreventDefault;
        }

        let mut all_valid = true;
        for kind in FieldKind::ALL {
            all_valid &= self.validate_field(kind, dom);
        }
        if !all_valid {
            tracing::debug!("submit blocked by validation");
            return EventOutcome::PreventDefault;
        }

        if self.state == SubmissionState::Success {
            self.hide_success(dom);
        }

        self.in_flight = Some(ContactSubmission {
            name: dom.value(self.markup.name.input).trim().to_owned(),
            email: dom.value(self.markup.email.input).trim().to_owned(),
            message: dom.value(self.markup.message.input).trim().to_owned(),
        });
        self.state = SubmissionState::Submitting;
        tracing::debug!("submission started");

        dom.apply(Patch::SetDisabled {
            target: self.markup.submit_button,
            disabled: true,
        });
        dom.set_style(self.markup.button_label, "display", "none");
        dom.set_style(self.markup.button_loading, "display", "inline-block");

        let deadline = now.saturating_add(self.backend.latency());
        self.timers.schedule(deadline, FormTimer::Complete);
        EventOutcome::PreventDefault
    }

    /// Earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Fire the earliest timer due at `now`. Returns whether one fired.
    ///
    /// Follow-up timers are scheduled relative to the fired timer's own
    /// deadline, not `now`.
    pub fn fire_next<D: Dom>(&mut self, now: Duration, dom: &mut D) -> bool {
        let Some((at, timer)) = self.timers.pop_due(now) else {
            return false;
        };
        match timer {
            FormTimer::Complete => self.complete(at, dom),
            FormTimer::HideSuccess => {
                self.hide_timer = None;
                self.hide_success(dom);
            }
        }
        true
    }

    fn complete<D: Dom>(&mut self, at: Duration, dom: &mut D) {
        let submission = self.in_flight.take().unwrap_or_default();
        match self.backend.deliver(&submission) {
            Ok(()) => {
                tracing::info!("contact message sent");
                self.state = SubmissionState::Success;
                dom.set_style(self.markup.success, "display", "block");
                for kind in FieldKind::ALL {
                    let input = self.field_markup(kind).input;
                    dom.apply(Patch::SetValue {
                        target: input,
                        value: String::new(),
                    });
                    self.show_error(kind, None, dom);
                    self.fields[index(kind)].touched = false;
                }
                let hide_at = at.saturating_add(self.success_display);
                self.hide_timer = Some(self.timers.schedule(hide_at, FormTimer::HideSuccess));
            }
            Err(err) => {
                tracing::warn!(error = %err, "contact submission failed");
                self.state = SubmissionState::Failed;
                dom.apply(Patch::Alert {
                    message: FAILURE_ALERT.to_owned(),
                });
            }
        }

        dom.apply(Patch::SetDisabled {
            target: self.markup.submit_button,
            disabled: false,
        });
        dom.set_style(self.markup.button_label, "display", "inline");
        dom.set_style(self.markup.button_loading, "display", "none");

        if self.state == SubmissionState::Failed {
            self.state = SubmissionState::Idle;
        }
    }

    fn hide_success<D: Dom>(&mut self, dom: &mut D) {
        if let Some(id) = self.hide_timer.take() {
            self.timers.cancel(id);
        }
        dom.set_style(self.markup.success, "display", "none");
        self.state = SubmissionState::Idle;
    }

    fn validate_field<D: Dom>(&mut self, kind: FieldKind, dom: &mut D) -> bool {
        let result = kind.validate(dom.value(self.field_markup(kind).input));
        self.fields[index(kind)].touched = true;
        self.show_error(kind, result.err(), dom);
        result.is_ok()
    }

    fn show_error<D: Dom>(&mut self, kind: FieldKind, error: Option<ValidationError>, dom: &mut D) {
        let field = &mut self.fields[index(kind)];
        if field.error == error {
            return;
        }
        field.error = error;
        let markup = self.field_markup(kind);
        match error {
            Some(err) => {
                dom.set_text(markup.error, kind.message(err));
                dom.add_class(markup.input, CLASS_ERROR);
            }
            None => {
                dom.set_text(markup.error, "");
                dom.remove_class(markup.input, CLASS_ERROR);
            }
        }
    }
}

const fn index(kind: FieldKind) -> usize {
    match kind {
        FieldKind::Name => 0,
        FieldKind::Email => 1,
        FieldKind::Message => 2,
    }
}

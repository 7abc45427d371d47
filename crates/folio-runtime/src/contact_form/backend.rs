#![forbid(unsafe_code)]

//! Delivery seam for contact form submissions.
//!
//! The site ships with [`SimulatedBackend`], which accepts everything after a
//! fixed latency. A real deployment swaps in an implementation that talks to
//! a mail or form service; the form only cares about the latency it should
//! wait and whether delivery succeeded.

use core::time::Duration;

/// The three validated field values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Delivery failure; surfaced to the visitor as a blocking alert.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("submission failed: {reason}")]
pub struct SubmissionError {
    pub reason: String,
}

impl SubmissionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

pub trait ContactBackend {
    /// How long the form stays in its submitting state before
    /// [`deliver`](Self::deliver) is called.
    fn latency(&self) -> Duration;

    /// Deliver a submission.
    fn deliver(&mut self, submission: &ContactSubmission) -> Result<(), SubmissionError>;
}

impl<B: ContactBackend + ?Sized> ContactBackend for Box<B> {
    fn latency(&self) -> Duration {
        (**self).latency()
    }

    fn deliver(&mut self, submission: &ContactSubmission) -> Result<(), SubmissionError> {
        (**self).deliver(submission)
    }
}

/// Local stand-in: always succeeds after `latency`.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    latency: Duration,
    delivered: usize,
}

impl SimulatedBackend {
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self {
            latency,
            delivered: 0,
        }
    }

    /// Number of submissions accepted so far.
    #[must_use]
    pub const fn delivered(&self) -> usize {
        self.delivered
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

impl ContactBackend for SimulatedBackend {
    fn latency(&self) -> Duration {
        self.latency
    }

    fn deliver(&mut self, submission: &ContactSubmission) -> Result<(), SubmissionError> {
        tracing::debug!(
            name_len = submission.name.len(),
            message_len = submission.message.len(),
            "simulated delivery"
        );
        self.delivered += 1;
        Ok(())
    }
}

#![forbid(unsafe_code)]

//! `folio-web` runs the portfolio runtime inside a browser host.
//!
//! Design goals:
//! - **Host-driven I/O**: JavaScript pushes page events and mirrors the few
//!   layout facts the runtime reads; the runtime answers with patches.
//! - **Deterministic time**: the host advances a monotonic clock explicitly,
//!   so a recorded session replays identically.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! On `wasm32` the crate exports [`PortfolioRunner`] through `wasm-bindgen`.
//! Everything else is plain Rust and is exercised by native tests.

pub mod input_parser;
pub mod memory_dom;
pub mod step_portfolio;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::PortfolioRunner;

use core::time::Duration;

pub use input_parser::{HostInput, InputParseError, parse_encoded_input};
pub use memory_dom::MemoryDom;
pub use step_portfolio::{HostError, StepPortfolio, StepResult, patches_to_jsonl};

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

#![forbid(unsafe_code)]

//! Rate limiters for high-frequency handlers.
//!
//! Scroll events arrive far faster than the active-link scan needs to run.
//! Two limiters are provided, both driven by a host monotonic timestamp
//! (`Duration` since page start) rather than a wall clock:
//!
//! - [`Throttle`]: leading edge. Fires immediately, then ignores triggers
//!   until the interval has elapsed.
//! - [`Debounce`]: trailing edge. Fires once after a quiet period with no
//!   new triggers.
//!
//! # Usage
//!
//! ```
//! use core::time::Duration;
//! use folio_core::rate_limit::{Debounce, Throttle};
//!
//! let ms = Duration::from_millis;
//! let mut throttle = Throttle::new(ms(100));
//! assert!(throttle.try_fire(ms(0)));
//! assert!(!throttle.try_fire(ms(40)));
//! assert!(throttle.try_fire(ms(100)));
//!
//! let mut debounce = Debounce::new(ms(150));
//! debounce.trigger(ms(0));
//! debounce.trigger(ms(100));
//! assert!(!debounce.poll(ms(200)));
//! assert!(debounce.poll(ms(250)));
//! assert!(!debounce.poll(ms(400)));
//! ```

use core::time::Duration;

/// Leading-edge throttle.
///
/// Single-slot state, O(1) per trigger. Meant for the single UI thread.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_fired: Option<Duration>,
}

impl Throttle {
    /// Create a throttle with the given cooldown.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    /// Returns `true` if the callback should run for a trigger at `now`.
    ///
    /// A trigger exactly `interval` after the last firing is accepted.
    pub fn try_fire(&mut self, now: Duration) -> bool {
        if let Some(last) = self.last_fired
            && now.saturating_sub(last) < self.interval
        {
            return false;
        }
        self.last_fired = Some(now);
        true
    }
}

/// Trailing-edge debounce.
///
/// Each [`trigger`](Self::trigger) pushes the deadline out to
/// `now + delay`; [`poll`](Self::poll) reports `true` exactly once when the
/// deadline has been reached.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Duration>,
}

impl Debounce {
    /// Create a debounce with the given quiet period.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Record a trigger at `now`, restarting the quiet period.
    pub fn trigger(&mut self, now: Duration) {
        self.deadline = Some(now.saturating_add(self.delay));
    }

    /// When the pending emission is due, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Returns `true` once when the quiet period has elapsed by `now`.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn throttle_fires_immediately_then_suppresses() {
        let mut t = Throttle::new(ms(100));
        assert!(t.try_fire(ms(5)));
        assert!(!t.try_fire(ms(50)));
        assert!(!t.try_fire(ms(104)));
        assert!(t.try_fire(ms(105)));
    }

    #[test]
    fn throttle_suppressed_triggers_do_not_extend_window() {
        let mut t = Throttle::new(ms(100));
        assert!(t.try_fire(ms(0)));
        for at in (10..100).step_by(10) {
            assert!(!t.try_fire(ms(at)));
        }
        assert!(t.try_fire(ms(100)));
    }

    #[test]
    fn zero_interval_throttle_never_suppresses() {
        let mut t = Throttle::new(Duration::ZERO);
        assert!(t.try_fire(ms(0)));
        assert!(t.try_fire(ms(0)));
    }

    #[test]
    fn debounce_waits_for_quiet_period() {
        let mut d = Debounce::new(ms(150));
        assert!(!d.poll(ms(0)));
        d.trigger(ms(0));
        d.trigger(ms(100));
        assert_eq!(d.deadline(), Some(ms(250)));
        assert!(!d.poll(ms(249)));
        assert!(d.poll(ms(250)));
        assert_eq!(d.deadline(), None);
        assert!(!d.poll(ms(1000)));
    }

    proptest! {
        #[test]
        fn throttle_firings_are_at_least_interval_apart(
            mut times in proptest::collection::vec(0u64..5_000, 1..64),
            interval in 1u64..500,
        ) {
            times.sort_unstable();
            let mut t = Throttle::new(ms(interval));
            let mut fired: Vec<u64> = Vec::new();
            for at in times {
                if t.try_fire(ms(at)) {
                    fired.push(at);
                }
            }
            prop_assert!(!fired.is_empty());
            for pair in fired.windows(2) {
                prop_assert!(pair[1] - pair[0] >= interval);
            }
        }

        #[test]
        fn debounce_emits_at_most_once_per_burst(
            mut times in proptest::collection::vec(0u64..1_000, 1..32),
        ) {
            times.sort_unstable();
            let mut d = Debounce::new(ms(50));
            for &at in &times {
                d.trigger(ms(at));
            }
            let last = *times.last().unwrap();
            prop_assert!(!d.poll(ms(last + 49)));
            prop_assert!(d.poll(ms(last + 50)));
            prop_assert!(!d.poll(ms(last + 51)));
        }
    }
}

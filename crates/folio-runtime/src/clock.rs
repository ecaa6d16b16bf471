#![forbid(unsafe_code)]

//! Host-controlled monotonic clock.

use web_time::Duration;

/// Deterministic monotonic clock controlled by the host.
///
/// The browser runner feeds it `performance.now()`; tests advance it by hand.
/// Time never moves backwards: [`set`](Self::set) ignores earlier instants.
#[derive(Debug, Default, Clone)]
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

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Jump to `now`. Returns `false` (and keeps the old time) if `now` is
    /// earlier than the current time.
    pub fn set(&mut self, now: Duration) -> bool {
        if now < self.now {
            return false;
        }
        self.now = now;
        true
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

#![forbid(unsafe_code)]

//! Cancellable one-shot timers on a host-driven clock.
//!
//! # Design
//!
//! [`TimerQueue<T>`] stores pending payloads keyed by `(deadline, id)`, so
//! iteration order is deadline first and scheduling order among equal
//! deadlines. Each scheduled payload gets a [`TimerId`] that callers keep next
//! to the entity the timer affects; cancelling by id guarantees the payload is
//! never delivered, which is what lets a later request replace an earlier
//! pending one instead of racing it.
//!
//! [`Scheduler<T>`] pairs a queue with a [`DeterministicClock`] and is what
//! behaviors actually schedule against.
//!
//! # Invariants
//!
//! 1. A payload is delivered at most once.
//! 2. A cancelled payload is never delivered.
//! 3. Payloads become due when `now >= deadline`, and are delivered in
//!    `(deadline, id)` order.

use std::collections::{BTreeMap, HashMap};

use web_time::Duration;

use crate::clock::DeterministicClock;

/// Identifier of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Pending one-shot timers ordered by deadline.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    entries: BTreeMap<(Duration, u64), T>,
    deadlines: HashMap<u64, Duration>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            deadlines: HashMap::new(),
            next_id: 1,
        }
    }

    /// Schedule `payload` for delivery at `deadline`.
    pub fn schedule_at(&mut self, deadline: Duration, payload: T) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert((deadline, id), payload);
        self.deadlines.insert(id, deadline);
        TimerId(id)
    }

    /// Cancel a pending timer, returning its payload if it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let deadline = self.deadlines.remove(&id.0)?;
        self.entries.remove(&(deadline, id.0))
    }

    /// Whether `id` is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id.0)
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Remove and return the earliest timer whose deadline is `<= now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, T)> {
        let (&(deadline, id), _) = self.entries.iter().next()?;
        if deadline > now {
            return None;
        }
        self.deadlines.remove(&id);
        let payload = self.entries.remove(&(deadline, id))?;
        Some((TimerId(id), payload))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A [`TimerQueue`] bound to a [`DeterministicClock`].
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    clock: DeterministicClock,
    queue: TimerQueue<T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: DeterministicClock::new(),
            queue: TimerQueue::new(),
        }
    }

    /// Current time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Schedule `payload` to fire `delay` from now.
    pub fn after(&mut self, delay: Duration, payload: T) -> TimerId {
        let deadline = self.clock.now().saturating_add(delay);
        self.queue.schedule_at(deadline, payload)
    }

    /// Cancel `previous` (if any) and schedule `payload` after `delay`.
    ///
    /// Convenience for the "one pending timer per entity" pattern.
    pub fn reschedule(&mut self, previous: Option<TimerId>, delay: Duration, payload: T) -> TimerId {
        if let Some(id) = previous {
            self.queue.cancel(id);
        }
        self.after(delay, payload)
    }

    /// Cancel a pending timer.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.queue.cancel(id)
    }

    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.queue.is_pending(id)
    }

    /// Advance the clock by `dt`. Due timers are collected with [`pop_due`](Self::pop_due).
    pub fn advance(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Jump the clock to `now`; earlier instants are ignored.
    pub fn set_time(&mut self, now: Duration) -> bool {
        self.clock.set(now)
    }

    /// Next due payload at the current time.
    pub fn pop_due(&mut self) -> Option<(TimerId, T)> {
        self.queue.pop_due(self.clock.now())
    }

    /// Time until the earliest pending timer (zero if already due).
    #[must_use]
    pub fn next_delay(&self) -> Option<Duration> {
        self.queue
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(self.clock.now()))
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#![forbid(unsafe_code)]

//! Ordered listener registry.
//!
//! # Design
//!
//! A page registers several independent handlers against the same signal
//! (three behaviors react to every scroll). [`ListenerRegistry`] records
//! `(signal, listener)` pairs in registration order and hands them back per
//! signal in that order, which is the only ordering guarantee the event loop
//! gives: handlers for one signal run one after another, each to completion,
//! in the order they were registered.
//!
//! Listeners are plain `Copy` tags rather than boxed closures; the owner
//! matches on the tag and calls into its own state, so handlers can borrow
//! the surface and timers mutably without shared ownership.
//!
//! # Invariants
//!
//! 1. `listeners(s)` yields in registration order.
//! 2. Unregistering is idempotent.

/// Identifier returned by [`ListenerRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone)]
struct Entry<S, L> {
    id: ListenerId,
    signal: S,
    listener: L,
}

/// Listeners grouped by signal, in registration order.
#[derive(Debug, Clone)]
pub struct ListenerRegistry<S, L> {
    entries: Vec<Entry<S, L>>,
    next_id: u64,
}

impl<S, L> Default for ListenerRegistry<S, L> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }
}

impl<S: Copy + Eq, L: Copy + Eq> ListenerRegistry<S, L> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `listener` to the handlers of `signal`.
    pub fn register(&mut self, signal: S, listener: L) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            signal,
            listener,
        });
        id
    }

    /// Remove a registration. Returns `false` if it was already gone.
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Listeners of `signal`, in registration order.
    ///
    /// Collected into a `Vec` so callers may mutate the registry while
    /// dispatching.
    #[must_use]
    pub fn listeners(&self, signal: S) -> Vec<L> {
        self.entries
            .iter()
            .filter(|entry| entry.signal == signal)
            .map(|entry| entry.listener)
            .collect()
    }

    /// Whether `listener` is registered for `signal`.
    #[must_use]
    pub fn is_registered(&self, signal: S, listener: L) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.signal == signal && entry.listener == listener)
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

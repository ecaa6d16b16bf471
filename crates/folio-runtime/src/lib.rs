#![forbid(unsafe_code)]

//! Folio Runtime
//!
//! Host-driven building blocks shared by the behavior layer and the browser
//! runner.
//!
//! # Key Components
//!
//! - [`DeterministicClock`] - monotonic time advanced explicitly by the host
//! - [`TimerQueue`] / [`Scheduler`] - cancellable one-shot timers
//! - [`ListenerRegistry`] - ordered listeners per signal
//! - [`LogSink`] - bounded, line-buffered log capture usable as a tracing writer
//!
//! Nothing here blocks or spawns threads: the embedding environment pushes
//! events and advances time, which keeps every run reproducible in tests.

pub mod clock;
pub mod listeners;
pub mod log_sink;
pub mod timer;

pub use clock::DeterministicClock;
pub use listeners::{ListenerId, ListenerRegistry};
pub use log_sink::LogSink;
pub use timer::{Scheduler, TimerId, TimerQueue};

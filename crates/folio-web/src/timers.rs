#![forbid(unsafe_code)]

//! Deferred work scheduled by the behaviors.

use folio_core::element::ElementHandle;
use folio_runtime::timer::Scheduler;

/// Payload of a pending one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Remove `show` from the toast.
    HideToast,
    /// Copy a progress bar's target width into `width`.
    FillProgress { bar: ElementHandle },
    /// Finish the in-flight contact form submission.
    CompleteSubmit,
    /// Stop the easter-egg body animation.
    ClearRainbow,
    /// Type the next character of a typewriter run.
    TypeNext { target: ElementHandle },
}

impl TimerAction {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::HideToast => "hide_toast",
            Self::FillProgress { .. } => "fill_progress",
            Self::CompleteSubmit => "complete_submit",
            Self::ClearRainbow => "clear_rainbow",
            Self::TypeNext { .. } => "type_next",
        }
    }
}

/// The scheduler every behavior arms its timers on.
pub type Timers = Scheduler<TimerAction>;

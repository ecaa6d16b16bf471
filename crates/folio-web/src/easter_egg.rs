#![forbid(unsafe_code)]

//! Konami code easter egg.
//!
//! Every key goes into a [`KeySequenceDetector`]. A complete match puts a
//! hue-rotating animation on the body for a few seconds; matching again
//! while it runs restarts the countdown.

use folio_core::element::ElementHandle;
use folio_core::event::KeyEvent;
use folio_core::key_sequence::KeySequenceDetector;
use folio_runtime::timer::TimerId;
use tracing::info;

use crate::config::KonamiConfig;
use crate::surface::ViewSurface;
use crate::timers::{TimerAction, Timers};

/// Style sheet key for the rainbow keyframes.
pub const RAINBOW_SHEET: &str = "folio-rainbow";

pub const RAINBOW_CSS: &str = "\
@keyframes rainbow {
    0% { filter: hue-rotate(0deg); }
    100% { filter: hue-rotate(360deg); }
}
";

/// Konami detector plus the pending animation reset.
#[derive(Debug, Clone)]
pub struct KonamiEasterEgg {
    detector: KeySequenceDetector,
    clear_timer: Option<TimerId>,
    triggered: u64,
}

impl KonamiEasterEgg {
    #[must_use]
    pub fn new(config: &KonamiConfig) -> Self {
        Self {
            detector: KeySequenceDetector::from_dom_keys(&config.sequence),
            clear_timer: None,
            triggered: 0,
        }
    }

    /// Feed one key. Returns `true` when it completed the sequence.
    pub fn on_key<S: ViewSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        body: Option<ElementHandle>,
        config: &KonamiConfig,
        timers: &mut Timers,
        key: &KeyEvent,
    ) -> bool {
        if !self.detector.push(key.code.clone()) {
            return false;
        }
        self.triggered += 1;
        if let Some(body) = body {
            surface.set_style(body, "animation", &config.animation);
        }
        surface.inject_style_sheet(RAINBOW_SHEET, RAINBOW_CSS);
        self.clear_timer = Some(timers.reschedule(
            self.clear_timer.take(),
            config.duration(),
            TimerAction::ClearRainbow,
        ));
        info!(count = self.triggered, "konami code entered");
        true
    }

    /// Remove the body animation; called when the clear timer fires.
    pub fn clear<S: ViewSurface + ?Sized>(&mut self, surface: &mut S, body: Option<ElementHandle>) {
        self.clear_timer = None;
        if let Some(body) = body {
            surface.set_style(body, "animation", "");
        }
    }

    /// Completed matches so far.
    #[must_use]
    pub const fn triggered(&self) -> u64 {
        self.triggered
    }

    /// Keys currently buffered.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.detector.buffered()
    }
}

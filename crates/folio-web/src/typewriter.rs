#![forbid(unsafe_code)]

//! Typewriter text effect.
//!
//! The element is cleared, the first character appears immediately, and each
//! following character is appended one timer tick later. Starting a new run
//! on an element cancels the run already typing there.

use std::collections::HashMap;

use folio_core::element::ElementHandle;
use folio_runtime::timer::TimerId;
use web_time::Duration;

use crate::surface::ViewSurface;
use crate::timers::{TimerAction, Timers};

#[derive(Debug, Clone)]
struct Run {
    chars: Vec<char>,
    typed: usize,
    timer: Option<TimerId>,
}

/// Typewriter runs keyed by element.
#[derive(Debug, Clone)]
pub struct Typewriter {
    speed: Duration,
    runs: HashMap<ElementHandle, Run>,
}

impl Typewriter {
    #[must_use]
    pub fn new(speed: Duration) -> Self {
        Self {
            speed,
            runs: HashMap::new(),
        }
    }

    /// Start typing `text` into `target`.
    pub fn start<S: ViewSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        timers: &mut Timers,
        target: ElementHandle,
        text: &str,
    ) {
        if let Some(previous) = self.runs.remove(&target)
            && let Some(timer) = previous.timer
        {
            timers.cancel(timer);
        }
        surface.set_text(target, "");
        self.runs.insert(
            target,
            Run {
                chars: text.chars().collect(),
                typed: 0,
                timer: None,
            },
        );
        self.step(surface, timers, target);
    }

    /// Type the next character; called when the run's timer fires.
    pub fn step<S: ViewSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        timers: &mut Timers,
        target: ElementHandle,
    ) {
        let Some(run) = self.runs.get_mut(&target) else {
            return;
        };
        run.timer = None;
        let Some(&next) = run.chars.get(run.typed) else {
            self.runs.remove(&target);
            return;
        };
        run.typed += 1;
        let mut text = surface.text(target).unwrap_or_default();
        text.push(next);
        surface.set_text(target, &text);
        if run.typed < run.chars.len() {
            run.timer = Some(timers.after(self.speed, TimerAction::TypeNext { target }));
        } else {
            self.runs.remove(&target);
        }
    }

    /// Whether a run is still typing into `target`.
    #[must_use]
    pub fn is_typing(&self, target: ElementHandle) -> bool {
        self.runs.contains_key(&target)
    }
}

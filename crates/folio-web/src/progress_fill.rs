#![forbid(unsafe_code)]

//! Intersection-driven progress fill.
//!
//! When a section becomes visible it gets `animate-in`, and each progress bar
//! inside it is filled after `index * stagger`. A fill copies the bar's
//! target width (an inline custom property) into `width`.
//!
//! Every bar has at most one pending fill. Re-entering a section cancels the
//! bar's pending fill and arms a new one, and the width write itself is
//! skipped when the width already matches.

use std::collections::HashMap;

use folio_core::element::ElementHandle;
use folio_core::event::VisibilityEntry;
use folio_runtime::timer::TimerId;
use tracing::{debug, trace};
use web_time::Duration;

use crate::page::ObservedSection;
use crate::surface::ViewSurface;
use crate::timers::{TimerAction, Timers};

pub const ANIMATE_IN_CLASS: &str = "animate-in";

/// Copy `width_property` into `width` unless it is already there.
///
/// Returns `true` when the style was written. A bar without a target width
/// is left untouched.
pub fn set_width_once<S: ViewSurface + ?Sized>(
    surface: &mut S,
    bar: ElementHandle,
    width_property: &str,
) -> bool {
    let Some(target) = surface.style(bar, width_property) else {
        trace!(%bar, width_property, "progress bar has no target width");
        return false;
    };
    if surface.style(bar, "width").as_deref() == Some(target.as_str()) {
        return false;
    }
    surface.set_style(bar, "width", &target);
    true
}

/// Staggered progress-bar fills keyed by bar.
#[derive(Debug, Clone)]
pub struct ProgressFill {
    stagger: Duration,
    width_property: String,
    pending: HashMap<ElementHandle, TimerId>,
}

impl ProgressFill {
    #[must_use]
    pub fn new(stagger: Duration, width_property: impl Into<String>) -> Self {
        Self {
            stagger,
            width_property: width_property.into(),
            pending: HashMap::new(),
        }
    }

    /// Handle one batch of visibility records. Returns the number of fills armed.
    pub fn on_visibility<S: ViewSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        sections: &[ObservedSection],
        entries: &[VisibilityEntry],
        timers: &mut Timers,
    ) -> usize {
        let mut armed = 0;
        for entry in entries.iter().filter(|e| e.intersecting) {
            let Some(section) = sections.iter().find(|s| s.element == entry.target) else {
                trace!(target = %entry.target, "visibility record for unknown section");
                continue;
            };
            surface.add_class(section.element, ANIMATE_IN_CLASS);
            for (index, &bar) in section.progress_bars.iter().enumerate() {
                let delay = self.stagger.saturating_mul(index as u32);
                let previous = self.pending.remove(&bar);
                let id = timers.reschedule(previous, delay, TimerAction::FillProgress { bar });
                self.pending.insert(bar, id);
                armed += 1;
            }
            debug!(
                section = %section.element,
                bars = section.progress_bars.len(),
                ratio = entry.ratio,
                "section entered view"
            );
        }
        armed
    }

    /// Run a due fill. Returns `true` when the width changed.
    pub fn fill<S: ViewSurface + ?Sized>(&mut self, surface: &mut S, bar: ElementHandle) -> bool {
        self.pending.remove(&bar);
        set_width_once(surface, bar, &self.width_property)
    }

    /// Pending fill for `bar`, if any.
    #[must_use]
    pub fn pending(&self, bar: ElementHandle) -> Option<TimerId> {
        self.pending.get(&bar).copied()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ElementSpec, MemorySurface};
    use crate::surface::ViewQuery;

    fn section_with_bars(s: &mut MemorySurface, widths: &[&str]) -> ObservedSection {
        let element = s.append_to_body(ElementSpec::new("section").id("skills"));
        let progress_bars = widths
            .iter()
            .map(|w| {
                s.append(
                    element,
                    ElementSpec::new("div").class("progress-fill").style("--width", w),
                )
            })
            .collect();
        ObservedSection {
            element,
            progress_bars,
        }
    }

    fn run_due(fill: &mut ProgressFill, s: &mut MemorySurface, timers: &mut Timers) -> usize {
        let mut fired = 0;
        while let Some((_, action)) = timers.pop_due() {
            if let TimerAction::FillProgress { bar } = action {
                fill.fill(s, bar);
                fired += 1;
            }
        }
        fired
    }

    #[test]
    fn set_width_once_skips_identical_writes() {
        let mut s = MemorySurface::new(800.0, 600.0);
        let bar = s.append_to_body(ElementSpec::new("div").style("--width", "90%"));
        assert!(set_width_once(&mut s, bar, "--width"));
        assert!(!set_width_once(&mut s, bar, "--width"));
        assert_eq!(s.style(bar, "width").as_deref(), Some("90%"));
    }

    #[test]
    fn missing_target_width_is_a_no_op() {
        let mut s = MemorySurface::new(800.0, 600.0);
        let bar = s.append_to_body(ElementSpec::new("div").style("width", "10%"));
        assert!(!set_width_once(&mut s, bar, "--width"));
        assert_eq!(s.style(bar, "width").as_deref(), Some("10%"));
    }

    #[test]
    fn bars_fill_staggered() {
        let mut s = MemorySurface::new(800.0, 600.0);
        let section = section_with_bars(&mut s, &["90%", "80%", "70%"]);
        let mut fill = ProgressFill::new(Duration::from_millis(100), "--width");
        let mut timers = Timers::new();
        let entry = VisibilityEntry::new(section.element, true, 0.5);

        let sections = [section.clone()];
        assert_eq!(fill.on_visibility(&mut s, &sections, &[entry], &mut timers), 3);
        assert!(s.has_class(section.element, ANIMATE_IN_CLASS));

        assert_eq!(run_due(&mut fill, &mut s, &mut timers), 1);
        timers.advance(Duration::from_millis(99));
        assert_eq!(run_due(&mut fill, &mut s, &mut timers), 0);
        timers.advance(Duration::from_millis(1));
        assert_eq!(run_due(&mut fill, &mut s, &mut timers), 1);
        timers.advance(Duration::from_millis(100));
        assert_eq!(run_due(&mut fill, &mut s, &mut timers), 1);
        assert_eq!(s.style(section.progress_bars[2], "width").as_deref(), Some("70%"));
        assert_eq!(fill.pending_count(), 0);
    }

    #[test]
    fn reentry_replaces_pending_fills() {
        let mut s = MemorySurface::new(800.0, 600.0);
        let section = section_with_bars(&mut s, &["90%", "80%"]);
        let sections = [section.clone()];
        let mut fill = ProgressFill::new(Duration::from_millis(100), "--width");
        let mut timers = Timers::new();
        let entry = VisibilityEntry::new(section.element, true, 0.5);

        fill.on_visibility(&mut s, &sections, &[entry], &mut timers);
        let first = fill.pending(section.progress_bars[1]).unwrap();
        timers.advance(Duration::from_millis(50));
        fill.on_visibility(&mut s, &sections, &[entry], &mut timers);
        assert!(!timers.is_pending(first));
        assert_eq!(timers.pending(), 2);
    }

    #[test]
    fn non_intersecting_records_are_ignored() {
        let mut s = MemorySurface::new(800.0, 600.0);
        let section = section_with_bars(&mut s, &["90%"]);
        let mut fill = ProgressFill::new(Duration::from_millis(100), "--width");
        let mut timers = Timers::new();
        let entry = VisibilityEntry::new(section.element, false, 0.0);
        assert_eq!(fill.on_visibility(&mut s, &[section.clone()], &[entry], &mut timers), 0);
        assert!(!s.has_class(section.element, ANIMATE_IN_CLASS));
    }
}

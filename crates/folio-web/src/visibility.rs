#![forbid(unsafe_code)]

//! Visibility tracking for hosts without an intersection observer.
//!
//! [`VisibilityTracker`] reproduces the observer contract the progress fill
//! relies on: the root is the viewport grown by the root margin (negative
//! margins shrink it), a target's ratio is the visible share of its area, and
//! a record is produced for every target on the first evaluation and then
//! only when the target crosses the threshold.
//!
//! # Invariants
//!
//! 1. `ratio` is in `0.0..=1.0`.
//! 2. `intersecting` implies `ratio >= threshold`.
//! 3. After the first evaluation, two consecutive evaluations over an
//!    unchanged surface produce no records.

use std::collections::HashMap;

use folio_core::element::ElementHandle;
use folio_core::event::VisibilityEntry;
use folio_core::geometry::{Insets, Rect};

use crate::surface::ViewQuery;

/// Intersection-observer emulation over a [`ViewQuery`].
#[derive(Debug, Clone)]
pub struct VisibilityTracker {
    threshold: f64,
    root_margin: Insets,
    targets: Vec<ElementHandle>,
    last: HashMap<ElementHandle, bool>,
}

impl VisibilityTracker {
    /// `threshold` is clamped into `0.0..=1.0`.
    #[must_use]
    pub fn new(threshold: f64, root_margin: Insets) -> Self {
        Self {
            threshold: if threshold.is_nan() {
                0.0
            } else {
                threshold.clamp(0.0, 1.0)
            },
            root_margin,
            targets: Vec::new(),
            last: HashMap::new(),
        }
    }

    /// Start watching `target`. Watching twice is a no-op.
    pub fn observe(&mut self, target: ElementHandle) {
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
    }

    pub fn unobserve(&mut self, target: ElementHandle) {
        self.targets.retain(|t| *t != target);
        self.last.remove(&target);
    }

    #[must_use]
    pub fn observed(&self) -> &[ElementHandle] {
        &self.targets
    }

    /// Root rectangle in viewport coordinates.
    #[must_use]
    pub fn root<S: ViewQuery + ?Sized>(&self, surface: &S) -> Rect {
        Rect::from_size(surface.viewport_width(), surface.viewport_height()).outset(self.root_margin)
    }

    /// Visible share of `target` inside `root`, and whether it touches at all.
    #[must_use]
    pub fn measure(root: &Rect, target: &Rect) -> (f64, bool) {
        match root.intersection(target) {
            None => (0.0, false),
            Some(_) if target.is_empty() => (1.0, true),
            Some(overlap) => ((overlap.area() / target.area()).clamp(0.0, 1.0), true),
        }
    }

    /// Records for targets whose state changed since the previous call.
    pub fn evaluate<S: ViewQuery + ?Sized>(&mut self, surface: &S) -> Vec<VisibilityEntry> {
        let root = self.root(surface);
        let mut entries = Vec::new();
        for &target in &self.targets {
            let (ratio, touches) = surface
                .client_rect(target)
                .map_or((0.0, false), |rect| Self::measure(&root, &rect));
            let intersecting = touches && ratio >= self.threshold;
            if self.last.insert(target, intersecting) != Some(intersecting) {
                entries.push(VisibilityEntry::new(target, intersecting, ratio));
            }
        }
        entries
    }

    /// Forget previous states so the next evaluation reports every target.
    pub fn reset(&mut self) {
        self.last.clear();
    }
}

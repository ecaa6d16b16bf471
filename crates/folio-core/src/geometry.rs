#![forbid(unsafe_code)]

//! Geometric primitives in CSS pixels.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in CSS pixels (origin at top-left).
///
/// Used both for document-relative boxes (`offsetTop`/`offsetHeight`) and for
/// viewport-relative boxes (`getBoundingClientRect`); the surface that hands
/// one out says which.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    #[must_use]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[inline]
    #[must_use]
    pub const fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    #[must_use]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Area in square pixels; zero for degenerate or inverted rectangles.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        if self.width <= 0.0 || self.height <= 0.0 {
            0.0
        } else {
            self.width * self.height
        }
    }

    /// Check if the rectangle has zero or negative extent.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check whether a vertical coordinate lies in `[top, bottom)`.
    #[inline]
    #[must_use]
    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.top() && y < self.bottom()
    }

    /// Same rectangle moved by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Grow the rectangle outward by `insets`; negative insets contract it.
    ///
    /// This is how an intersection root margin applies to the root box.
    #[must_use]
    pub fn outset(&self, insets: Insets) -> Self {
        Self::new(
            self.x - insets.left,
            self.y - insets.top,
            (self.width + insets.left + insets.right).max(0.0),
            (self.height + insets.top + insets.bottom).max(0.0),
        )
    }

    /// Overlap of two rectangles.
    ///
    /// Edge-adjacent rectangles produce `Some` with a zero-sized extent,
    /// matching how the browser treats a target touching the root edge.
    #[must_use]
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.left().max(other.left());
        let y = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < x || bottom < y {
            return None;
        }
        Some(Rect::new(x, y, right - x, bottom - y))
    }
}

/// Per-edge offsets, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    /// Create insets from CSS shorthand order (top, right, bottom, left).
    #[inline]
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// All edges zero.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Render as a CSS margin string, e.g. `0px 0px -50px 0px`.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_y_is_half_open() {
        let r = Rect::new(0.0, 100.0, 50.0, 200.0);
        assert!(r.contains_y(100.0));
        assert!(r.contains_y(299.0));
        assert!(!r.contains_y(300.0));
        assert!(!r.contains_y(99.9));
    }

    #[test]
    fn outset_with_negative_bottom_contracts() {
        let root = Rect::from_size(800.0, 600.0);
        let shrunk = root.outset(Insets::new(0.0, 0.0, -50.0, 0.0));
        assert_eq!(shrunk, Rect::new(0.0, 0.0, 800.0, 550.0));
    }

    #[test]
    fn outset_never_produces_negative_size() {
        let root = Rect::from_size(10.0, 10.0);
        let collapsed = root.outset(Insets::new(-20.0, 0.0, -20.0, 0.0));
        assert_eq!(collapsed.height, 0.0);
        assert!(collapsed.is_empty());
    }

    #[test]
    fn intersection_overlap() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 80.0, 100.0, 100.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(50.0, 80.0, 50.0, 20.0)));
    }

    #[test]
    fn intersection_disjoint_is_none() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, 20.0, 10.0, 10.0);
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn intersection_edge_adjacent_is_zero_sized() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, 10.0, 10.0, 10.0);
        let hit = a.intersection(&b).expect("edge contact intersects");
        assert_eq!(hit.area(), 0.0);
    }

    #[test]
    fn translate_moves_origin_only() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0).translate(10.0, -2.0);
        assert_eq!(r, Rect::new(11.0, 0.0, 3.0, 4.0));
    }

    #[test]
    fn insets_css() {
        assert_eq!(
            Insets::new(0.0, 0.0, -50.0, 0.0).to_css(),
            "0px 0px -50px 0px"
        );
    }
}

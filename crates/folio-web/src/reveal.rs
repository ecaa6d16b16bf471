#![forbid(unsafe_code)]

//! Reveal-on-scroll.
//!
//! A card is revealed once its viewport-relative top rises above
//! `viewport height - offset`. Revealing is one-way: nothing here ever
//! removes `revealed` or `animated`. The bar's width is left alone; filling
//! it is the job of [`progress_fill`](crate::progress_fill).

use tracing::trace;

use crate::page::RevealCard;
use crate::surface::ViewSurface;

pub const REVEALED_CLASS: &str = "revealed";
pub const ANIMATED_CLASS: &str = "animated";

/// Marks cards revealed as they scroll into view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealAnimator {
    offset: f64,
}

impl RevealAnimator {
    #[must_use]
    pub const fn new(offset: f64) -> Self {
        Self { offset }
    }

    /// Reveal every card past the threshold. Returns how many were newly revealed.
    pub fn update<S: ViewSurface + ?Sized>(&self, surface: &mut S, cards: &[RevealCard]) -> usize {
        let reveal_line = surface.viewport_height() - self.offset;
        let mut newly = 0;
        for card in cards {
            let Some(rect) = surface.client_rect(card.element) else {
                continue;
            };
            if rect.top() >= reveal_line {
                continue;
            }
            if !surface.has_class(card.element, REVEALED_CLASS) {
                surface.add_class(card.element, REVEALED_CLASS);
                newly += 1;
                trace!(card = %card.element, top = rect.top(), "revealed");
            }
            if let Some(bar) = card.progress_bar
                && !surface.has_class(bar, ANIMATED_CLASS)
            {
                surface.add_class(bar, ANIMATED_CLASS);
            }
        }
        newly
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ElementSpec, MemorySurface};
    use crate::surface::ViewQuery;
    use folio_core::geometry::Rect;

    fn card_at(surface: &mut MemorySurface, top: f64, with_bar: bool) -> RevealCard {
        let element = surface.append_to_body(
            ElementSpec::new("div")
                .class("expertise-card")
                .rect(Rect::new(0.0, top, 300.0, 200.0)),
        );
        let progress_bar = with_bar.then(|| {
            surface.append(
                element,
                ElementSpec::new("div")
                    .class("progress-fill")
                    .style("--width", "75%"),
            )
        });
        RevealCard {
            element,
            progress_bar,
        }
    }

    #[test]
    fn threshold_is_strict() {
        let mut s = MemorySurface::new(1000.0, 800.0);
        let above = card_at(&mut s, 649.0, false);
        let at = card_at(&mut s, 650.0, false);
        let n = RevealAnimator::new(150.0).update(&mut s, &[above, at]);
        assert_eq!(n, 1);
        assert!(s.has_class(above.element, REVEALED_CLASS));
        assert!(!s.has_class(at.element, REVEALED_CLASS));
    }

    #[test]
    fn reveal_marks_bar_without_touching_width() {
        let mut s = MemorySurface::new(1000.0, 800.0);
        let card = card_at(&mut s, 100.0, true);
        RevealAnimator::new(150.0).update(&mut s, &[card]);
        let bar = card.progress_bar.unwrap();
        assert!(s.has_class(bar, ANIMATED_CLASS));
        assert_eq!(s.style(bar, "width"), None);
    }

    #[test]
    fn scrolling_back_keeps_reveal() {
        let mut s = MemorySurface::new(1000.0, 800.0);
        let card = card_at(&mut s, 1200.0, true);
        let animator = RevealAnimator::new(150.0);
        assert_eq!(animator.update(&mut s, &[card]), 0);
        s.set_scroll_y(700.0);
        assert_eq!(animator.update(&mut s, &[card]), 1);
        s.set_scroll_y(0.0);
        assert_eq!(animator.update(&mut s, &[card]), 0);
        assert!(s.has_class(card.element, REVEALED_CLASS));
    }

    #[test]
    fn cards_without_geometry_are_skipped() {
        let mut s = MemorySurface::new(1000.0, 800.0);
        let card = card_at(&mut s, 0.0, false);
        s.set_rect(card.element, None);
        assert_eq!(RevealAnimator::new(150.0).update(&mut s, &[card]), 0);
    }
}

#![forbid(unsafe_code)]

//! Active navigation link tracking.
//!
//! The probe point sits a fixed distance below the scroll offset. The section
//! whose document box contains it (half-open, `[top, top + height)`) is the
//! section "in view", and the first navigation link pointing at it is the
//! only link carrying `active`. When several sections contain the probe the
//! last one in document order wins; when none does, no link is active.

use tracing::trace;

use crate::page::{NavLink, TrackedSection};
use crate::surface::ViewSurface;

/// Class marking the active link.
pub const ACTIVE_CLASS: &str = "active";

/// Maps the scroll offset to the active navigation link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveNavTracker {
    probe_offset: f64,
}

impl ActiveNavTracker {
    #[must_use]
    pub const fn new(probe_offset: f64) -> Self {
        Self { probe_offset }
    }

    #[must_use]
    pub const fn probe_offset(&self) -> f64 {
        self.probe_offset
    }

    /// Section id containing the probe, without touching any link.
    #[must_use]
    pub fn section_in_view<'a, S: ViewSurface + ?Sized>(
        &self,
        surface: &S,
        sections: &'a [TrackedSection],
    ) -> Option<&'a TrackedSection> {
        let probe = surface.scroll_y() + self.probe_offset;
        sections.iter().rev().find(|section| {
            surface
                .offset_rect(section.element)
                .is_some_and(|rect| rect.contains_y(probe))
        })
    }

    /// Recompute `active` on every link. Returns the matched section id.
    pub fn update<'a, S: ViewSurface + ?Sized>(
        &self,
        surface: &mut S,
        sections: &'a [TrackedSection],
        links: &[NavLink],
    ) -> Option<&'a str> {
        let matched = self.section_in_view(surface, sections);
        for link in links {
            surface.remove_class(link.element, ACTIVE_CLASS);
        }
        let section = matched?;
        match links
            .iter()
            .find(|link| link.target.as_deref() == Some(section.id.as_str()))
        {
            Some(link) => surface.add_class(link.element, ACTIVE_CLASS),
            None => trace!(section = %section.id, "no nav link targets section"),
        }
        Some(section.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ElementSpec, MemorySurface};
    use crate::surface::ViewQuery;
    use folio_core::geometry::Rect;

    struct Fixture {
        surface: MemorySurface,
        sections: Vec<TrackedSection>,
        links: Vec<NavLink>,
    }

    fn fixture() -> Fixture {
        let mut surface = MemorySurface::new(1200.0, 800.0);
        let mut sections = Vec::new();
        let mut links = Vec::new();
        for (i, id) in ["home", "about", "contact"].into_iter().enumerate() {
            let top = if i == 0 { 0.0 } else { 100.0 + 200.0 * (i as f64 - 1.0) };
            let height = if i == 0 { 100.0 } else { 200.0 };
            let element = surface.append_to_body(
                ElementSpec::new("section")
                    .id(id)
                    .rect(Rect::new(0.0, top, 1200.0, height)),
            );
            sections.push(TrackedSection {
                id: id.to_string(),
                element,
            });
            let link = surface.append_to_body(ElementSpec::new("a").class("nav-link"));
            links.push(NavLink {
                element: link,
                target: Some(id.to_string()),
            });
        }
        Fixture {
            surface,
            sections,
            links,
        }
    }

    fn active(f: &Fixture) -> Vec<usize> {
        f.links
            .iter()
            .enumerate()
            .filter(|(_, l)| f.surface.has_class(l.element, ACTIVE_CLASS))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn half_open_section_bounds() {
        // about spans [100, 300); the probe is scroll_y + 0 here.
        let mut f = fixture();
        let tracker = ActiveNavTracker::new(0.0);
        for (scroll, expected) in [(100.0, "about"), (299.0, "about"), (300.0, "contact")] {
            f.surface.set_scroll_y(scroll);
            let matched = tracker.update(&mut f.surface, &f.sections, &f.links);
            assert_eq!(matched, Some(expected), "scroll {scroll}");
        }
        assert_eq!(active(&f), vec![2]);
    }

    #[test]
    fn default_probe_offset_looks_below_scroll() {
        let mut f = fixture();
        let tracker = ActiveNavTracker::new(150.0);
        f.surface.set_scroll_y(0.0);
        assert_eq!(tracker.update(&mut f.surface, &f.sections, &f.links), Some("about"));
        assert_eq!(active(&f), vec![1]);
    }

    #[test]
    fn no_match_clears_every_link() {
        let mut f = fixture();
        let tracker = ActiveNavTracker::new(0.0);
        f.surface.set_scroll_y(150.0);
        tracker.update(&mut f.surface, &f.sections, &f.links);
        assert_eq!(active(&f), vec![1]);
        f.surface.set_scroll_y(5000.0);
        assert_eq!(tracker.update(&mut f.surface, &f.sections, &f.links), None);
        assert!(active(&f).is_empty());
    }

    #[test]
    fn only_first_duplicate_link_is_marked() {
        let mut f = fixture();
        let extra = f.surface.append_to_body(ElementSpec::new("a").class("nav-link"));
        f.links.push(NavLink {
            element: extra,
            target: Some("home".into()),
        });
        ActiveNavTracker::new(0.0).update(&mut f.surface, &f.sections, &f.links);
        assert_eq!(active(&f), vec![0]);
    }

    #[test]
    fn sections_without_geometry_never_match() {
        let mut f = fixture();
        for s in &f.sections {
            f.surface.set_rect(s.element, None);
        }
        assert_eq!(
            ActiveNavTracker::new(150.0).update(&mut f.surface, &f.sections, &f.links),
            None
        );
    }
}

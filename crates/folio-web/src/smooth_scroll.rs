#![forbid(unsafe_code)]

//! Smooth scrolling for in-page anchors.

use folio_core::element::ElementHandle;
use tracing::debug;

use crate::page::Anchor;
use crate::surface::{ScrollAlign, ScrollBehavior, ViewSurface};

/// Handle a click that may have landed on (or inside) an in-page anchor.
///
/// Returns `true` when default navigation must be prevented, which is the
/// case for every in-page anchor, even one whose target is missing.
pub fn on_click<S: ViewSurface + ?Sized>(
    surface: &mut S,
    anchors: &[Anchor],
    target: ElementHandle,
) -> bool {
    let Some(anchor) = anchors
        .iter()
        .find(|anchor| surface.contains(anchor.element, target))
    else {
        return false;
    };
    match anchor.target {
        Some(destination) => {
            surface.scroll_into_view(destination, ScrollBehavior::Smooth, ScrollAlign::Start);
            debug!(href = %anchor.href, "smooth scroll");
        }
        None => debug!(href = %anchor.href, "anchor without target"),
    }
    true
}

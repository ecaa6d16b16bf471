#![forbid(unsafe_code)]

//! Stateless one-line effects: cursor follower, navbar background, parallax
//! blobs, and the body's `loaded` marker.

use folio_core::element::ElementHandle;
use folio_core::geometry::Point;
use tracing::info;

use crate::config::{FollowerConfig, NavbarConfig, ParallaxConfig};
use crate::page::ParallaxBlobs;
use crate::surface::ViewSurface;

pub const LOADED_CLASS: &str = "loaded";

/// Center the follower on the pointer.
pub fn move_follower<S: ViewSurface + ?Sized>(
    surface: &mut S,
    follower: ElementHandle,
    pointer: Point,
    config: &FollowerConfig,
) {
    surface.set_style(follower, "left", &px(pointer.x - config.offset_px));
    surface.set_style(follower, "top", &px(pointer.y - config.offset_px));
}

/// Darken the navbar once the page is scrolled past the threshold.
pub fn update_navbar<S: ViewSurface + ?Sized>(
    surface: &mut S,
    navbar: ElementHandle,
    config: &NavbarConfig,
) {
    let background = if surface.scroll_y() > config.threshold_px {
        &config.scrolled_background
    } else {
        &config.resting_background
    };
    surface.set_style(navbar, "background", background);
}

/// Move the two background blobs against each other.
pub fn apply_parallax<S: ViewSurface + ?Sized>(
    surface: &mut S,
    blobs: ParallaxBlobs,
    config: &ParallaxConfig,
) {
    let scrolled = surface.scroll_y();
    surface.set_style(
        blobs.first,
        "transform",
        &translate_y(scrolled * config.first_factor),
    );
    surface.set_style(
        blobs.second,
        "transform",
        &translate_y(scrolled * config.second_factor),
    );
}

/// Mark the page as loaded.
pub fn mark_loaded<S: ViewSurface + ?Sized>(surface: &mut S, body: Option<ElementHandle>) {
    if let Some(body) = body {
        surface.add_class(body, LOADED_CLASS);
    }
    info!("Portfolio loaded successfully!");
}

fn px(value: f64) -> String {
    format!("{}px", unsigned_zero(value))
}

fn translate_y(value: f64) -> String {
    format!("translateY({}px)", unsigned_zero(value))
}

/// `-0.0` prints as `-0`; browsers write a plain `0`.
fn unsigned_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

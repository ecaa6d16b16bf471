#![forbid(unsafe_code)]

//! Browser runner for the Folio portfolio page.
//!
//! This crate provides [`PortfolioRunner`], a `wasm-bindgen`-exported struct
//! that wraps `folio_web::Synchronizer` over the live DOM. It can attach to
//! the page (listeners, `IntersectionObserver`, wall-clock timers) or be
//! driven by the host with encoded inputs and explicit time steps.

#[cfg(target_arch = "wasm32")]
mod dom_surface;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::PortfolioRunner;

// Runner core is used by the wasm module and by native tests.
#[cfg(any(target_arch = "wasm32", test))]
mod runner_core;

#![forbid(unsafe_code)]

//! Folio Web
//!
//! Page behaviors for a scroll-reactive portfolio page, written against
//! capability traits so they run unchanged in the browser and in tests.
//!
//! # Key Components
//!
//! - [`Synchronizer`] - owns the page and dispatches events to behaviors
//! - [`ViewQuery`] / [`ViewMutator`] / [`PageIndex`] - what a host surface provides
//! - [`MemorySurface`] - in-memory surface for tests and native replay
//! - [`FolioConfig`] - every tunable, loadable from JSON or TOML
//! - [`VisibilityTracker`] - intersection-observer emulation
//!
//! # Example
//!
//! ```
//! use folio_core::geometry::Rect;
//! use folio_core::event::Event;
//! use folio_web::memory::{ElementSpec, MemorySurface};
//! use folio_web::surface::ViewQuery;
//! use folio_web::{FolioConfig, Synchronizer};
//!
//! let mut page = MemorySurface::new(1280.0, 720.0);
//! let link = page.append_to_body(
//!     ElementSpec::new("a").class("nav-link").attr("data-section", "about"),
//! );
//! page.append_to_body(
//!     ElementSpec::new("section").id("about").rect(Rect::new(0.0, 0.0, 1280.0, 900.0)),
//! );
//!
//! let mut sync = Synchronizer::new(page, FolioConfig::default()).unwrap();
//! sync.init();
//! sync.handle(Event::Scroll);
//! assert!(sync.surface().has_class(link, "active"));
//! ```

pub mod active_nav;
pub mod config;
pub mod contact_form;
pub mod easter_egg;
pub mod effects;
pub mod error;
pub mod input_parser;
pub mod memory;
pub mod mobile_menu;
pub mod page;
pub mod progress_fill;
pub mod reveal;
pub mod smooth_scroll;
pub mod surface;
pub mod synchronizer;
pub mod timers;
pub mod toast;
pub mod typewriter;
pub mod visibility;

pub use config::{ConfigError, ElementNames, FolioConfig};
pub use contact_form::{SimulatedTransport, SubmitError, Submission, SubmitTransport};
pub use error::FolioError;
pub use input_parser::{InputParseError, parse_encoded_input};
pub use memory::{ElementSpec, MemorySurface};
pub use page::PageModel;
pub use surface::{PageIndex, ScrollAlign, ScrollBehavior, ViewMutator, ViewQuery, ViewSurface};
pub use synchronizer::{Behavior, Dispatch, Signal, Synchronizer};
pub use timers::TimerAction;
pub use toast::ToastKind;
pub use visibility::VisibilityTracker;

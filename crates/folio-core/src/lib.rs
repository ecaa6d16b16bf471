#![forbid(unsafe_code)]

//! Core types for Folio.
//!
//! This crate holds the host-independent vocabulary shared by every other
//! Folio crate: pixel geometry, element handles, canonical page events, and
//! the key-sequence detector behind the keyboard easter egg. Nothing here
//! touches a DOM or a clock.

pub mod element;
pub mod event;
pub mod geometry;
pub mod key_sequence;

pub use element::ElementHandle;
pub use event::{ClickEvent, Event, KeyCode, KeyEvent, Modifiers, VisibilityEntry};
pub use geometry::{Insets, Point, Rect};
pub use key_sequence::KeySequenceDetector;

#![forbid(unsafe_code)]

//! Canonical page events.
//!
//! Hosts translate whatever their platform delivers (DOM events, JSON test
//! fixtures) into these values before handing them to the synchronizer.
//!
//! # Design Notes
//!
//! - `Scroll` carries no payload: scroll offset and element geometry are read
//!   back from the surface when the event is handled, the same way a DOM
//!   handler reads `window.scrollY`.
//! - Key codes are normalized from DOM `KeyboardEvent.key` values so that
//!   `ArrowUp` and `Up` compare equal.

use bitflags::bitflags;

use crate::element::ElementHandle;
use crate::geometry::Point;

/// Canonical page event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The document scrolled.
    Scroll,

    /// Pointer moved, in viewport coordinates.
    PointerMove(Point),

    /// A click somewhere in the document.
    Click(ClickEvent),

    /// A key was pressed.
    Key(KeyEvent),

    /// The contact form was submitted.
    Submit,

    /// The document finished parsing (`DOMContentLoaded`).
    ContentLoaded,

    /// A batch of visibility-change records from the intersection observer.
    Visibility(Vec<VisibilityEntry>),
}

impl Event {
    /// Short lowercase name, used in logs and encoded inputs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scroll => "scroll",
            Self::PointerMove(_) => "mouse_move",
            Self::Click(_) => "click",
            Self::Key(_) => "key",
            Self::Submit => "submit",
            Self::ContentLoaded => "loaded",
            Self::Visibility(_) => "visibility",
        }
    }
}

/// A click, resolved by the host to the nearest element it knows about.
///
/// `target` is `None` when the click landed on something the surface has no
/// handle for (for example bare document background).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickEvent {
    pub target: Option<ElementHandle>,
}

impl ClickEvent {
    #[must_use]
    pub const fn on(target: ElementHandle) -> Self {
        Self {
            target: Some(target),
        }
    }

    #[must_use]
    pub const fn background() -> Self {
        Self { target: None }
    }
}

/// One intersection-observer record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityEntry {
    pub target: ElementHandle,
    /// `isIntersecting` as reported by the observer.
    pub intersecting: bool,
    /// `intersectionRatio` in `0.0..=1.0`.
    pub ratio: f64,
}

impl VisibilityEntry {
    #[must_use]
    pub const fn new(target: ElementHandle, intersecting: bool, ratio: f64) -> Self {
        Self {
            target,
            intersecting,
            ratio,
        }
    }
}

/// A keyboard event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// Auto-repeat from a held key.
    pub repeat: bool,
}

impl KeyEvent {
    /// Create a key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            repeat: false,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Mark as an auto-repeat event.
    #[must_use]
    pub const fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    /// Build from a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        Self::new(KeyCode::from_dom_key(key))
    }
}

/// Normalized key code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character, case preserved.
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    /// Any other named key, kept verbatim.
    Named(Box<str>),
}

impl KeyCode {
    /// Normalize a DOM `KeyboardEvent.key` value.
    ///
    /// Arrow keys accept both the DOM (`ArrowUp`) and short (`Up`) spellings.
    /// Single characters are kept as-is, so `b` and `B` differ.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "ArrowUp" | "Up" => Self::Up,
            "ArrowDown" | "Down" => Self::Down,
            "ArrowLeft" | "Left" => Self::Left,
            "ArrowRight" | "Right" => Self::Right,
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            "Backspace" => Self::Backspace,
            "Tab" => Self::Tab,
            "Spacebar" => Self::Char(' '),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Named(other.into()),
                }
            }
        }
    }

    /// Canonical DOM spelling.
    #[must_use]
    pub fn to_dom_key(&self) -> String {
        match self {
            Self::Char(c) => c.to_string(),
            Self::Enter => "Enter".to_string(),
            Self::Escape => "Escape".to_string(),
            Self::Backspace => "Backspace".to_string(),
            Self::Tab => "Tab".to_string(),
            Self::Up => "ArrowUp".to_string(),
            Self::Down => "ArrowDown".to_string(),
            Self::Left => "ArrowLeft".to_string(),
            Self::Right => "ArrowRight".to_string(),
            Self::Named(name) => name.to_string(),
        }
    }
}

bitflags! {
    /// Modifier keys held during an input event.
    ///
    /// Encoded as a compact `u8` bitset by hosts (`mods`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const NONE  = 0b0000;
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_spellings_normalize() {
        assert_eq!(KeyCode::from_dom_key("ArrowUp"), KeyCode::Up);
        assert_eq!(KeyCode::from_dom_key("Up"), KeyCode::Up);
        assert_eq!(KeyCode::from_dom_key("ArrowRight"), KeyCode::Right);
    }

    #[test]
    fn single_chars_keep_case() {
        assert_eq!(KeyCode::from_dom_key("b"), KeyCode::Char('b'));
        assert_eq!(KeyCode::from_dom_key("B"), KeyCode::Char('B'));
        assert_ne!(KeyCode::from_dom_key("a"), KeyCode::from_dom_key("A"));
    }

    #[test]
    fn multibyte_single_char_is_char() {
        assert_eq!(KeyCode::from_dom_key("é"), KeyCode::Char('é'));
    }

    #[test]
    fn unknown_names_are_kept() {
        assert_eq!(
            KeyCode::from_dom_key("MediaPlayPause"),
            KeyCode::Named("MediaPlayPause".into())
        );
        assert_eq!(KeyCode::from_dom_key("MediaPlayPause").to_dom_key(), "MediaPlayPause");
    }

    #[test]
    fn dom_key_round_trips_for_arrows() {
        for key in ["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight"] {
            assert_eq!(KeyCode::from_dom_key(key).to_dom_key(), key);
        }
    }

    #[test]
    fn event_kind_names() {
        assert_eq!(Event::Scroll.kind(), "scroll");
        assert_eq!(Event::Click(ClickEvent::background()).kind(), "click");
        assert_eq!(Event::Visibility(Vec::new()).kind(), "visibility");
    }
}

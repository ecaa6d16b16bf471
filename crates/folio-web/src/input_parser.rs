#![forbid(unsafe_code)]

//! JSON input parser for recorded or host-encoded page events.
//!
//! [`parse_encoded_input`] turns one JSON object into an [`Event`]. The
//! `kind` field selects the variant:
//!
//! | kind | fields |
//! |---|---|
//! | `scroll` | |
//! | `mouse_move` | `x`, `y` |
//! | `click` | `target` (optional element handle) |
//! | `key` | `key` (DOM key name), `mods`, `repeat`, `phase` |
//! | `submit` | |
//! | `loaded` | |
//! | `intersection` / `visibility` | `entries: [{target, intersecting, ratio}]` |
//!
//! Unknown kinds and key releases return `Ok(None)`.

use folio_core::element::ElementHandle;
use folio_core::event::{ClickEvent, Event, KeyEvent, Modifiers, VisibilityEntry};
use folio_core::geometry::Point;
use serde::Deserialize;

/// Errors from parsing encoded input JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
    /// A number that cannot be used (NaN, infinite, out of range).
    InvalidValue(&'static str),
}

impl core::fmt::Display for InputParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::InvalidValue(field) => write!(f, "invalid value for field: {field}"),
        }
    }
}

impl std::error::Error for InputParseError {}

#[derive(Debug, Deserialize)]
struct RawInput {
    kind: String,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    target: Option<u32>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    mods: Option<i32>,
    #[serde(default)]
    repeat: Option<bool>,
    #[serde(default)]
    phase: Option<String>,
    #[serde(default)]
    entries: Option<Vec<RawEntry>>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    target: u32,
    #[serde(default)]
    intersecting: bool,
    #[serde(default)]
    ratio: f64,
}

/// Parse one JSON-encoded input into an [`Event`].
pub fn parse_encoded_input(json: &str) -> Result<Option<Event>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    match raw.kind.as_str() {
        "scroll" => Ok(Some(Event::Scroll)),
        "mouse_move" | "mousemove" => parse_pointer(&raw).map(Some),
        "click" => Ok(Some(Event::Click(ClickEvent {
            target: raw.target.map(ElementHandle::new),
        }))),
        "key" | "keydown" => parse_key(&raw),
        "submit" => Ok(Some(Event::Submit)),
        "loaded" | "content_loaded" => Ok(Some(Event::ContentLoaded)),
        "intersection" | "visibility" => parse_visibility(raw).map(Some),
        _ => Ok(None),
    }
}

fn finite(value: Option<f64>, field: &'static str) -> Result<f64, InputParseError> {
    let value = value.ok_or(InputParseError::MissingField(field))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputParseError::InvalidValue(field))
    }
}

fn parse_pointer(raw: &RawInput) -> Result<Event, InputParseError> {
    let x = finite(raw.x, "x")?;
    let y = finite(raw.y, "y")?;
    Ok(Event::PointerMove(Point::new(x, y)))
}

fn parse_modifiers(mods: Option<i32>) -> Modifiers {
    let bits = mods.unwrap_or(0).clamp(0, i32::from(u8::MAX)) as u8;
    Modifiers::from_bits_truncate(bits)
}

fn parse_key(raw: &RawInput) -> Result<Option<Event>, InputParseError> {
    if matches!(raw.phase.as_deref(), Some("up" | "keyup")) {
        return Ok(None);
    }
    let key = raw
        .key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or(InputParseError::MissingField("key"))?;
    Ok(Some(Event::Key(
        KeyEvent::from_dom_key(key)
            .with_modifiers(parse_modifiers(raw.mods))
            .with_repeat(raw.repeat.unwrap_or(false)),
    )))
}

fn parse_visibility(raw: RawInput) -> Result<Event, InputParseError> {
    let entries = raw
        .entries
        .ok_or(InputParseError::MissingField("entries"))?
        .into_iter()
        .map(|entry| {
            if !entry.ratio.is_finite() {
                return Err(InputParseError::InvalidValue("ratio"));
            }
            Ok(VisibilityEntry::new(
                ElementHandle::new(entry.target),
                entry.intersecting,
                entry.ratio.clamp(0.0, 1.0),
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Event::Visibility(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::event::KeyCode;

    #[test]
    fn simple_kinds() {
        assert_eq!(parse_encoded_input(r#"{"kind":"scroll"}"#), Ok(Some(Event::Scroll)));
        assert_eq!(parse_encoded_input(r#"{"kind":"submit"}"#), Ok(Some(Event::Submit)));
        assert_eq!(
            parse_encoded_input(r#"{"kind":"loaded"}"#),
            Ok(Some(Event::ContentLoaded))
        );
    }

    #[test]
    fn pointer_move() {
        assert_eq!(
            parse_encoded_input(r#"{"kind":"mouse_move","x":10.5,"y":20}"#),
            Ok(Some(Event::PointerMove(Point::new(10.5, 20.0))))
        );
        assert_eq!(
            parse_encoded_input(r#"{"kind":"mouse_move","x":1}"#),
            Err(InputParseError::MissingField("y"))
        );
    }

    #[test]
    fn click_with_and_without_target() {
        assert_eq!(
            parse_encoded_input(r#"{"kind":"click","target":4}"#),
            Ok(Some(Event::Click(ClickEvent::on(ElementHandle::new(4)))))
        );
        assert_eq!(
            parse_encoded_input(r#"{"kind":"click"}"#),
            Ok(Some(Event::Click(ClickEvent::background())))
        );
    }

    #[test]
    fn key_is_normalized() {
        let Ok(Some(Event::Key(key))) =
            parse_encoded_input(r#"{"kind":"key","key":"ArrowUp","mods":1}"#)
        else {
            panic!("expected key event");
        };
        assert_eq!(key.code, KeyCode::Up);
        assert_eq!(key.modifiers, Modifiers::SHIFT);
    }

    #[test]
    fn key_release_is_ignored() {
        assert_eq!(
            parse_encoded_input(r#"{"kind":"key","key":"a","phase":"up"}"#),
            Ok(None)
        );
        assert_eq!(
            parse_encoded_input(r#"{"kind":"key"}"#),
            Err(InputParseError::MissingField("key"))
        );
    }

    #[test]
    fn visibility_entries() {
        let event = parse_encoded_input(
            r#"{"kind":"intersection","entries":[{"target":2,"intersecting":true,"ratio":0.4},{"target":3}]}"#,
        );
        assert_eq!(
            event,
            Ok(Some(Event::Visibility(vec![
                VisibilityEntry::new(ElementHandle::new(2), true, 0.4),
                VisibilityEntry::new(ElementHandle::new(3), false, 0.0),
            ])))
        );
    }

    #[test]
    fn unknown_kind_is_none_and_bad_json_errors() {
        assert_eq!(parse_encoded_input(r#"{"kind":"resize"}"#), Ok(None));
        assert!(matches!(
            parse_encoded_input("{"),
            Err(InputParseError::Json(_))
        ));
    }
}

#![forbid(unsafe_code)]

//! Fixed key-sequence detection over the most recent keystrokes.
//!
//! [`KeySequenceDetector`] keeps a ring buffer exactly as long as the target
//! sequence. Every key is appended (the oldest falls off) and the buffer is
//! compared with the target. A match is reported on the keystroke that
//! completes the sequence; the next keystroke shifts the window, so one
//! complete entry of the sequence is reported once.
//!
//! # Example
//!
//! ```
//! use folio_core::event::KeyCode;
//! use folio_core::key_sequence::KeySequenceDetector;
//!
//! let mut detector = KeySequenceDetector::konami();
//! let keys = ["ArrowUp", "ArrowUp", "ArrowDown", "ArrowDown", "ArrowLeft",
//!             "ArrowRight", "ArrowLeft", "ArrowRight", "b", "a"];
//! let hits: Vec<bool> = keys.iter().map(|k| detector.push(KeyCode::from_dom_key(k))).collect();
//! assert_eq!(hits.iter().filter(|h| **h).count(), 1);
//! assert!(hits[9]);
//! ```

use std::collections::VecDeque;

use crate::event::KeyCode;

/// DOM spellings of the Konami code.
pub const KONAMI_KEYS: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "b",
    "a",
];

/// Detects one fixed key sequence in a stream of keystrokes.
///
/// # Invariants
///
/// 1. The recent-key buffer never holds more keys than the target sequence.
/// 2. An empty target sequence never matches.
#[derive(Debug, Clone)]
pub struct KeySequenceDetector {
    target: Vec<KeyCode>,
    recent: VecDeque<KeyCode>,
}

impl KeySequenceDetector {
    /// Detector for an arbitrary sequence.
    #[must_use]
    pub fn new(target: Vec<KeyCode>) -> Self {
        let recent = VecDeque::with_capacity(target.len());
        Self { target, recent }
    }

    /// Detector for a sequence given as DOM key names.
    #[must_use]
    pub fn from_dom_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        Self::new(
            keys.into_iter()
                .map(|k| KeyCode::from_dom_key(k.as_ref()))
                .collect(),
        )
    }

    /// Detector for the Konami code.
    #[must_use]
    pub fn konami() -> Self {
        Self::from_dom_keys(KONAMI_KEYS)
    }

    /// Record a keystroke. Returns `true` when it completes the sequence.
    pub fn push(&mut self, key: KeyCode) -> bool {
        if self.target.is_empty() {
            return false;
        }
        if self.recent.len() == self.target.len() {
            self.recent.pop_front();
        }
        self.recent.push_back(key);
        let matched = self.recent.len() == self.target.len()
            && self.recent.iter().eq(self.target.iter());
        #[cfg(feature = "tracing")]
        if matched {
            tracing::debug!(len = self.target.len(), "key sequence matched");
        }
        matched
    }

    /// Keys currently buffered, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &KeyCode> {
        self.recent.iter()
    }

    /// Number of buffered keys.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.recent.len()
    }

    /// Forget buffered keys.
    pub fn reset(&mut self) {
        self.recent.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(detector: &mut KeySequenceDetector, keys: &[&str]) -> Vec<bool> {
        keys.iter()
            .map(|k| detector.push(KeyCode::from_dom_key(k)))
            .collect()
    }

    #[test]
    fn konami_matches_on_last_key() {
        let mut d = KeySequenceDetector::konami();
        let hits = feed(&mut d, &KONAMI_KEYS);
        assert_eq!(hits.iter().filter(|h| **h).count(), 1);
        assert!(hits[9]);
    }

    #[test]
    fn prefix_noise_still_matches() {
        let mut d = KeySequenceDetector::konami();
        feed(&mut d, &["x", "y", "ArrowUp"]);
        let hits = feed(&mut d, &KONAMI_KEYS);
        assert!(hits[9]);
    }

    #[test]
    fn reordered_sequence_does_not_match() {
        let mut d = KeySequenceDetector::konami();
        let mut keys = KONAMI_KEYS;
        keys.swap(8, 9);
        let hits = feed(&mut d, &keys);
        assert!(hits.iter().all(|h| !h));
    }

    #[test]
    fn shorter_sequence_does_not_match() {
        let mut d = KeySequenceDetector::konami();
        let hits = feed(&mut d, &KONAMI_KEYS[1..]);
        assert!(hits.iter().all(|h| !h));
    }

    #[test]
    fn uppercase_letters_do_not_match() {
        let mut d = KeySequenceDetector::konami();
        let mut keys = KONAMI_KEYS;
        keys[8] = "B";
        keys[9] = "A";
        assert!(feed(&mut d, &keys).iter().all(|h| !h));
    }

    #[test]
    fn extra_key_after_match_does_not_rematch() {
        let mut d = KeySequenceDetector::konami();
        feed(&mut d, &KONAMI_KEYS);
        assert!(!d.push(KeyCode::Char('a')));
    }

    #[test]
    fn two_complete_entries_match_twice() {
        let mut d = KeySequenceDetector::konami();
        let mut keys = KONAMI_KEYS.to_vec();
        keys.extend_from_slice(&KONAMI_KEYS);
        let hits = feed(&mut d, &keys);
        assert_eq!(hits.iter().filter(|h| **h).count(), 2);
    }

    #[test]
    fn empty_target_never_matches() {
        let mut d = KeySequenceDetector::new(Vec::new());
        assert!(!d.push(KeyCode::Enter));
        assert_eq!(d.buffered(), 0);
    }

    #[test]
    fn reset_clears_buffer() {
        let mut d = KeySequenceDetector::konami();
        feed(&mut d, &KONAMI_KEYS[..9]);
        d.reset();
        assert_eq!(d.buffered(), 0);
        assert!(!d.push(KeyCode::Char('a')));
    }
}

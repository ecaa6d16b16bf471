#![forbid(unsafe_code)]

//! Crate-level error type.

use crate::config::ConfigError;
use crate::input_parser::InputParseError;

/// Errors surfaced to hosts.
#[derive(Debug)]
pub enum FolioError {
    /// Configuration could not be loaded or failed validation.
    Config(ConfigError),
    /// An encoded input could not be parsed.
    Input(InputParseError),
    /// The host environment is missing something the page needs.
    Host(String),
}

impl core::fmt::Display for FolioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Input(e) => write!(f, "input error: {e}"),
            Self::Host(msg) => write!(f, "host error: {msg}"),
        }
    }
}

impl std::error::Error for FolioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Input(e) => Some(e),
            Self::Host(_) => None,
        }
    }
}

impl From<ConfigError> for FolioError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<InputParseError> for FolioError {
    fn from(e: InputParseError) -> Self {
        Self::Input(e)
    }
}

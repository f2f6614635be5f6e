//! Crate-level error types.

use std::fmt;

/// Errors produced by the sitewalk crate.
///
/// Every variant except [`SitewalkError::Io`] describes malformed
/// configuration. These are raised once, at construction, so per-frame
/// updates never fail.
#[derive(Debug)]
pub enum SitewalkError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options or layout parsing/serialization failure.
    OptionsParse(String),
    /// Options that parse but describe impossible motion or framing.
    InvalidOptions(String),
    /// A vehicle spec that its path family cannot drive.
    InvalidVehicle(String),
    /// A marker spec that cannot be placed (duplicate id, bad anchor).
    InvalidMarker(String),
    /// Activation of a marker id that was never registered.
    UnknownMarker(u32),
}

impl fmt::Display for SitewalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::InvalidOptions(msg) => write!(f, "invalid options: {msg}"),
            Self::InvalidVehicle(msg) => {
                write!(f, "invalid vehicle configuration: {msg}")
            }
            Self::InvalidMarker(msg) => {
                write!(f, "invalid marker configuration: {msg}")
            }
            Self::UnknownMarker(id) => write!(f, "unknown marker id {id}"),
        }
    }
}

impl std::error::Error for SitewalkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SitewalkError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for SitewalkError {
    fn from(e: toml::de::Error) -> Self {
        Self::OptionsParse(e.to_string())
    }
}

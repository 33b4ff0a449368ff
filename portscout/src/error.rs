//! Error types for portscout.

use std::io;
use thiserror::Error;

/// Result type for portscout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for portscout operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (device directory, bridge files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serial port error.
    #[cfg(feature = "native")]
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Malformed glob pattern.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// An extension provider failed to contribute port names.
    #[error("Provider '{name}' failed: {message}")]
    Provider {
        /// Name the provider was registered under.
        name: String,
        /// Failure description.
        message: String,
    },

    /// None of the candidate ports could be opened.
    #[error("No candidate port could be opened")]
    DeviceNotFound,

    /// Discovery produced no candidates at all.
    #[error("No serial port candidates found")]
    NoCandidates,
}

impl Error {
    /// Build a provider failure from any displayable message.
    pub fn provider(name: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Provider {
            name: name.into(),
            message: message.to_string(),
        }
    }
}

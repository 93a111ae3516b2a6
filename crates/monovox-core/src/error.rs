//! Error types for monovox-core.

use thiserror::Error;

/// Error type for decoding and configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The payload decoded to zero bytes.
    #[error("Audio payload is empty")]
    EmptyAudio,

    /// Malformed base64 or a buffer that could not be constructed.
    #[error("Decode failure: {0}")]
    DecodeFailure(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(String),

    /// A background task panicked before producing a result.
    #[error("Background task panicked")]
    TaskPanicked,
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Error::DecodeFailure(e.to_string())
    }
}

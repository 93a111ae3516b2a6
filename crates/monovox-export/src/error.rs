//! Error types for monovox-export

use std::io;
use thiserror::Error;

/// Export error type
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Encoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Invalid audio data
    #[error("Invalid audio data: {0}")]
    InvalidData(String),

    /// Background export could not run or did not finish
    #[error("Export job failed: {0}")]
    Job(#[from] monovox_core::Error),
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

impl From<hound::Error> for ExportError {
    fn from(e: hound::Error) -> Self {
        match e {
            hound::Error::IoError(io) => ExportError::Io(io),
            other => ExportError::Encoding(other.to_string()),
        }
    }
}

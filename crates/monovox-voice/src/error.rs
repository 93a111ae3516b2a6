//! Error types.

use thiserror::Error;

/// Error type for voice and session operations.
///
/// Cloneable so the same value can be returned to a caller or carried by a
/// [`PlaybackEvent::Error`](crate::PlaybackEvent::Error).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The backend could not start a voice.
    #[error("Failed to start voice: {0}")]
    DeviceStartFailure(String),

    /// A running voice failed on the device.
    #[error("Voice failed during playback: {0}")]
    DeviceFailure(String),

    /// Seek target was NaN. Out-of-range targets are clamped instead.
    #[error("Invalid seek target: {0}")]
    InvalidSeekTarget(f64),

    /// Rate must be finite and positive.
    #[error("Invalid playback rate: {0}. Must be finite and > 0")]
    InvalidRate(f64),

    /// Device not found.
    #[error("Audio device not found: {0}")]
    InvalidDevice(String),

    #[error(transparent)]
    Core(#[from] monovox_core::Error),
}

/// Result type.
pub type Result<T> = std::result::Result<T, Error>;

// Device errors are flattened to strings at the API boundary so the error
// stays cloneable.

#[cfg(feature = "device")]
impl From<cpal::DefaultStreamConfigError> for Error {
    fn from(e: cpal::DefaultStreamConfigError) -> Self {
        Error::DeviceStartFailure(e.to_string())
    }
}

#[cfg(feature = "device")]
impl From<cpal::BuildStreamError> for Error {
    fn from(e: cpal::BuildStreamError) -> Self {
        Error::DeviceStartFailure(e.to_string())
    }
}

#[cfg(feature = "device")]
impl From<cpal::PlayStreamError> for Error {
    fn from(e: cpal::PlayStreamError) -> Self {
        Error::DeviceStartFailure(e.to_string())
    }
}

#[cfg(feature = "device")]
impl From<cpal::DevicesError> for Error {
    fn from(e: cpal::DevicesError) -> Self {
        Error::InvalidDevice(e.to_string())
    }
}

#[cfg(feature = "device")]
impl From<cpal::DeviceNameError> for Error {
    fn from(e: cpal::DeviceNameError) -> Self {
        Error::InvalidDevice(e.to_string())
    }
}

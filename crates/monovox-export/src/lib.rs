//! # monovox Export
//!
//! Serializes a decoded [`SampleBuffer`](monovox_core::SampleBuffer) into a
//! self-contained 16-bit PCM mono WAV file:
//! - **In memory**: [`encode_wav`] for downloads and uploads
//! - **On disk**: [`export_wav_file`]
//! - **In the background**: [`ExportJob`] while playback continues
//!
//! ## Note
//!
//! This crate is typically not used directly. Instead, use the engine API
//! from the main `monovox` crate:
//!
//! ```ignore
//! let engine = PlaybackEngine::builder().build()?;
//! let buffer = engine.decode(&payload, 24_000)?;
//! let wav_bytes = engine.encode(&buffer)?;
//! ```

pub mod error;
pub mod format;
mod handle;

// Re-exports
pub use error::{ExportError, Result};
pub use format::wav::{encode_wav, export_wav_file};
pub use handle::{ExportJob, ExportStatus};

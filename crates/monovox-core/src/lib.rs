//! Core types for the monovox playback engine.
//!
//! # Primary API
//!
//! - [`SampleBuffer`]: immutable decoded mono audio
//! - [`decode`] / [`encode_pcm_base64`]: base64 PCM codec
//! - [`clock_position`] / [`ClockAnchor`]: device time to buffer offset
//! - [`EngineConfig`]: tick cadence, default rate, output device
//! - [`TaskHandle`]: poll a decode or export running off the event loop
//!
//! # Example
//!
//! ```ignore
//! use monovox_core::{decode, EngineConfig};
//!
//! let buffer = decode(&payload_b64, 24_000)?;
//! println!("{:.2}s of audio", buffer.duration());
//! ```

pub mod error;
pub use error::{Error, Result};

mod buffer;
pub use buffer::{SampleBuffer, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE};

pub mod codec;
pub use codec::{decode, decode_pcm_bytes, encode_pcm_base64, encode_pcm_bytes};

pub mod clock;
pub use clock::{clamp_position, clock_position, ClockAnchor};

mod config;
pub use config::{EngineConfig, DEFAULT_TICK_INTERVAL};

pub(crate) mod lockfree;
pub use lockfree::{AtomicDouble, OneShot};

mod task;
pub use task::TaskHandle;

pub use std::sync::Arc;

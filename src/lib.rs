//! # monovox - Single-voice playback engine
//!
//! Turns base64 16-bit PCM into controllable, seekable, rate-adjustable
//! playback, and serializes the same samples as WAV for export. However
//! many sessions exist, at most one voice is audible at a time.
//!
//! ## Architecture
//!
//! monovox is an umbrella crate that coordinates:
//! - **monovox-core** - Sample buffers, PCM codec, playback clock, config
//! - **monovox-voice** - Voice slot, session state machine, CPAL and mock backends
//! - **monovox-export** - WAV encoding, file and background export
//!
//! ## Quick Start
//!
//! ```ignore
//! use monovox::prelude::*;
//!
//! let engine = PlaybackEngine::builder().build()?;
//! let buffer = engine.decode(&payload_b64, 24_000)?;
//!
//! let (mut session, events) = engine.create_session(buffer.clone());
//! session.play()?;
//! session.seek(1.5)?;
//! session.set_rate(1.25)?;
//!
//! // From the host event loop
//! session.pump();
//! for event in events.try_iter() { /* Tick / Ended / Error */ }
//!
//! let wav = engine.encode(&buffer)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `device` (default) - CPAL output backend

/// Re-export of monovox-core for direct access
pub use monovox_core as core;
/// Re-export of monovox-voice for direct access
pub use monovox_voice as voice;
/// Re-export of monovox-export for direct access
pub use monovox_export as export;

pub use monovox_core::{
    decode, encode_pcm_base64, Arc, ClockAnchor, EngineConfig, SampleBuffer, TaskHandle,
    DEFAULT_TICK_INTERVAL,
};
pub use monovox_export::{ExportJob, ExportStatus};
pub use monovox_voice::{
    mock::MockBackend, ActiveVoice, PlaybackEvent, PlaybackSession, PlaybackStatus, SessionId,
    Voice, VoiceBackend, VoiceId, VoiceSlot,
};

#[cfg(feature = "device")]
pub use monovox_voice::CpalBackend;

pub mod error;
pub use error::{Error, Result};

mod builder;
mod engine;

pub use builder::PlaybackEngineBuilder;
pub use engine::PlaybackEngine;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{PlaybackEngine, PlaybackEngineBuilder};

    pub use crate::{PlaybackEvent, PlaybackSession, PlaybackStatus, SampleBuffer};

    pub use crate::{ExportJob, ExportStatus};

    pub use crate::{Error, Result};

    pub use crate::Arc;
    pub use std::time::Duration;
}

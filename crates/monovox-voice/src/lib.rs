//! Single-voice playback for monovox.
//!
//! - [`VoiceBackend`] / [`Voice`]: the seam to one-shot hardware voices
//! - [`VoiceSlot`]: registry that keeps at most one voice alive
//! - [`PlaybackSession`]: play / pause / stop / seek / rate state machine
//! - [`MockBackend`](mock::MockBackend): manual-clock backend for tests
//! - `CpalBackend`: real output (feature `device`)
//!
//! # Example
//!
//! ```ignore
//! use monovox_voice::{mock::MockBackend, PlaybackSession, VoiceSlot};
//!
//! let slot = VoiceSlot::new(Arc::new(MockBackend::new()));
//! let (mut session, events) = PlaybackSession::new(slot, buffer, &EngineConfig::default());
//! session.play()?;
//! loop {
//!     session.pump();
//!     for event in events.try_iter() { /* ... */ }
//! }
//! ```

pub mod error;
pub use error::{Error, Result};

mod voice;
pub use voice::{Voice, VoiceBackend, VoiceId, VoiceNotifier, VoiceRequest, VoiceSignal};

mod slot;
pub use slot::{ActiveVoice, SessionId, VoiceSlot};

mod ticker;
pub use ticker::TickSchedule;

mod session;
pub use session::{PlaybackEvent, PlaybackSession, PlaybackStatus};

pub mod mock;

#[cfg(feature = "device")]
mod device;
#[cfg(feature = "device")]
pub use device::CpalBackend;

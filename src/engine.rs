//! Main playback engine coordinating decode, sessions and export.

use crate::Result;
use crossbeam_channel::Receiver;
use monovox_core::{Arc, EngineConfig, SampleBuffer, TaskHandle};
use monovox_export::ExportJob;
use monovox_voice::{ActiveVoice, PlaybackEvent, PlaybackSession, VoiceSlot};
use std::path::Path;

/// Playback engine.
///
/// Owns the voice slot shared by every session it creates, so at most one
/// session is audible at a time. Starting playback in one session silences
/// whichever session was playing before; that session then reads as paused.
///
/// # Example
/// ```ignore
/// use monovox::prelude::*;
///
/// let engine = PlaybackEngine::builder().build()?;
/// let buffer = engine.decode(&payload_b64, 24_000)?;
///
/// let (mut session, events) = engine.create_session(buffer.clone());
/// session.play()?;
///
/// loop {
///     session.pump();
///     for event in events.try_iter() {
///         match event {
///             PlaybackEvent::Tick(pos) => println!("{pos:.2}s"),
///             PlaybackEvent::Ended => return Ok(()),
///             PlaybackEvent::Error(e) => eprintln!("{e}"),
///         }
///     }
///     std::thread::sleep(Duration::from_millis(10));
/// }
/// ```
pub struct PlaybackEngine {
    config: EngineConfig,
    slot: VoiceSlot,
}

impl PlaybackEngine {
    /// Create a new engine builder
    pub fn builder() -> crate::PlaybackEngineBuilder {
        crate::PlaybackEngineBuilder::default()
    }

    pub(crate) fn new(config: EngineConfig, slot: VoiceSlot) -> Self {
        Self { config, slot }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Device clock in seconds.
    pub fn now(&self) -> f64 {
        self.slot.now()
    }

    /// Decode a base64 16-bit PCM payload into a shareable buffer.
    pub fn decode(&self, payload: &str, sample_rate: u32) -> Result<Arc<SampleBuffer>> {
        let buffer = monovox_core::decode(payload, sample_rate)?;
        tracing::debug!(
            samples = buffer.len(),
            sample_rate,
            duration = buffer.duration(),
            "decoded payload"
        );
        Ok(Arc::new(buffer))
    }

    /// Decode on a worker thread so the caller's loop keeps pumping.
    pub fn decode_in_background(
        &self,
        payload: impl Into<String>,
        sample_rate: u32,
    ) -> Result<TaskHandle<monovox_core::Result<Arc<SampleBuffer>>>> {
        let payload = payload.into();
        let task = TaskHandle::spawn("decode", move || {
            monovox_core::decode(&payload, sample_rate).map(Arc::new)
        })?;
        Ok(task)
    }

    /// New idle session over `buffer`, with its event receiver.
    pub fn create_session(
        &self,
        buffer: Arc<SampleBuffer>,
    ) -> (PlaybackSession, Receiver<PlaybackEvent>) {
        PlaybackSession::new(self.slot.clone(), buffer, &self.config)
    }

    /// Serialize `buffer` as a 16-bit PCM mono WAV file in memory.
    pub fn encode(&self, buffer: &SampleBuffer) -> Result<Vec<u8>> {
        Ok(monovox_export::encode_wav(buffer)?)
    }

    /// Write `buffer` as a WAV file at `path`.
    pub fn export_to_file(&self, buffer: &SampleBuffer, path: impl AsRef<Path>) -> Result<()> {
        Ok(monovox_export::export_wav_file(buffer, path.as_ref())?)
    }

    /// Serialize on a worker thread. Playback of the same buffer continues.
    pub fn export_in_background(&self, buffer: Arc<SampleBuffer>) -> Result<ExportJob> {
        Ok(ExportJob::spawn(buffer)?)
    }

    /// Silence whatever is playing. Returns whether a voice was live.
    pub fn stop_all(&self) -> bool {
        self.slot.stop_all()
    }

    /// The voice currently holding the slot, if any.
    pub fn active_voice(&self) -> Option<ActiveVoice> {
        self.slot.occupant()
    }

    /// List available output devices
    #[cfg(feature = "device")]
    pub fn list_output_devices() -> Result<Vec<String>> {
        Ok(monovox_voice::CpalBackend::list_output_devices()?)
    }
}

impl std::fmt::Debug for PlaybackEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackEngine")
            .field("config", &self.config)
            .field("slot", &self.slot)
            .finish()
    }
}

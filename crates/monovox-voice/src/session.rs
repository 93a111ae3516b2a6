//! Playback session state machine.
//!
//! ```text
//! Idle ──play──▶ Playing ──pause──▶ Paused
//!   ▲              │  ▲                │
//!   └────stop──────┤  └─────play───────┘
//!                  ▼
//!                Ended (terminal)
//! ```
//!
//! Hardware voices are one-shot, so every reposition or re-rate while
//! playing tears the current voice down and starts a new one at the
//! recomputed offset.

use crate::slot::{SessionId, VoiceSlot};
use crate::ticker::TickSchedule;
use crate::voice::{VoiceId, VoiceSignal};
use crate::{Error, Result};
use crossbeam_channel::{Receiver, Sender};
use monovox_core::{clamp_position, Arc, ClockAnchor, EngineConfig, SampleBuffer};

/// Session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Playing,
    Paused,
    Ended,
}

impl PlaybackStatus {
    #[inline]
    pub fn is_playing(self) -> bool {
        self == PlaybackStatus::Playing
    }
}

/// Events delivered to the session owner, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// Current position in seconds, emitted every tick interval while playing.
    Tick(f64),
    /// Playback reached the end of the buffer. Emitted once.
    Ended,
    /// The device failed after the voice had started. Emitted once per voice.
    Error(Error),
}

#[derive(Debug, Clone, Copy)]
struct LiveVoice {
    id: VoiceId,
    anchor: ClockAnchor,
}

/// Controllable playback of one shared buffer.
///
/// Sessions never spawn threads. The owner calls [`pump`](Self::pump)
/// from its event loop; that drains voice signals and emits a tick when
/// one is due.
pub struct PlaybackSession {
    id: SessionId,
    slot: VoiceSlot,
    buffer: Arc<SampleBuffer>,
    duration: f64,
    status: PlaybackStatus,
    position: f64,
    rate: f64,
    voice: Option<LiveVoice>,
    signal_tx: Sender<VoiceSignal>,
    signal_rx: Receiver<VoiceSignal>,
    events: Option<Sender<PlaybackEvent>>,
    ticks: TickSchedule,
}

impl PlaybackSession {
    /// Create an idle session at position 0.
    pub fn new(
        slot: VoiceSlot,
        buffer: Arc<SampleBuffer>,
        config: &EngineConfig,
    ) -> (Self, Receiver<PlaybackEvent>) {
        let (signal_tx, signal_rx) = crossbeam_channel::unbounded();
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let id = slot.register_session();
        let duration = buffer.duration();

        tracing::debug!(session = id, duration, "session created");

        let session = Self {
            id,
            slot,
            buffer,
            duration,
            status: PlaybackStatus::Idle,
            position: 0.0,
            rate: config.default_rate,
            voice: None,
            signal_tx,
            signal_rx,
            events: Some(event_tx),
            ticks: TickSchedule::new(config.tick_interval),
        };
        (session, event_rx)
    }

    #[inline]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn buffer(&self) -> &Arc<SampleBuffer> {
        &self.buffer
    }

    /// Current status. A session whose voice was taken by another session
    /// reads as `Paused`.
    pub fn status(&self) -> PlaybackStatus {
        if self.is_evicted() {
            PlaybackStatus::Paused
        } else {
            self.status
        }
    }

    /// Current position in seconds, always within `[0, duration]`.
    pub fn position(&self) -> f64 {
        match self.voice {
            Some(voice) if self.status.is_playing() => match self.slot.peek_eviction(self.id) {
                Some(position) if !self.slot.is_current(voice.id) => position,
                _ => voice.anchor.position(self.slot.now(), self.duration),
            },
            _ => self.position,
        }
    }

    /// Start or resume playback. No-op while playing or after the end.
    pub fn play(&mut self) -> Result<()> {
        self.reconcile();
        match self.status {
            PlaybackStatus::Playing | PlaybackStatus::Ended => Ok(()),
            PlaybackStatus::Idle | PlaybackStatus::Paused => self.start_at(self.position),
        }
    }

    /// Pause at the current position.
    pub fn pause(&mut self) -> Result<()> {
        self.reconcile();
        if !self.status.is_playing() {
            return Ok(());
        }
        let position = self.current_position();
        self.teardown();
        self.position = position;
        self.status = PlaybackStatus::Paused;
        tracing::debug!(session = self.id, position, "paused");
        Ok(())
    }

    /// Stop and rewind to 0. Emits no `Ended`.
    pub fn stop(&mut self) -> Result<()> {
        self.reconcile();
        if self.status == PlaybackStatus::Ended {
            return Ok(());
        }
        self.teardown();
        self.position = 0.0;
        self.status = PlaybackStatus::Idle;
        Ok(())
    }

    /// Move to `target` seconds, clamped to `[0, duration]`.
    ///
    /// While playing this restarts the voice at the target. While paused or
    /// idle it only records the target.
    pub fn seek(&mut self, target: f64) -> Result<()> {
        if target.is_nan() {
            return Err(Error::InvalidSeekTarget(target));
        }
        self.reconcile();
        let target = clamp_position(target, self.duration);
        match self.status {
            PlaybackStatus::Ended => Ok(()),
            PlaybackStatus::Playing => {
                self.teardown();
                self.start_at(target)
            }
            PlaybackStatus::Idle | PlaybackStatus::Paused => {
                self.position = target;
                Ok(())
            }
        }
    }

    /// Change the playback rate. While playing, the voice is rebuilt at the
    /// current position with the new rate.
    pub fn set_rate(&mut self, rate: f64) -> Result<()> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(Error::InvalidRate(rate));
        }
        self.reconcile();
        match self.status {
            PlaybackStatus::Ended => Ok(()),
            PlaybackStatus::Playing => {
                let position = self.current_position();
                self.teardown();
                self.rate = rate;
                self.start_at(position)
            }
            PlaybackStatus::Idle | PlaybackStatus::Paused => {
                self.rate = rate;
                Ok(())
            }
        }
    }

    /// Drain voice signals and emit a tick if one is due.
    pub fn pump(&mut self) {
        while let Ok(signal) = self.signal_rx.try_recv() {
            self.handle_signal(signal);
        }
        self.reconcile();

        if self.status.is_playing() && self.ticks.due(self.slot.now()) {
            let position = self.current_position();
            self.emit(PlaybackEvent::Tick(position));
        }
    }

    /// Stop playback, drop the buffer reference and close the event channel.
    pub fn release(mut self) {
        self.shutdown();
    }

    fn start_at(&mut self, offset: f64) -> Result<()> {
        if offset >= self.duration {
            self.finish();
            return Ok(());
        }

        let started = self.slot.start(
            self.id,
            Arc::clone(&self.buffer),
            offset,
            self.rate,
            self.signal_tx.clone(),
        );
        match started {
            Ok((id, anchor)) => {
                self.voice = Some(LiveVoice { id, anchor });
                self.position = offset;
                self.status = PlaybackStatus::Playing;
                self.ticks.arm(anchor.started_at);
                Ok(())
            }
            Err(e) => {
                self.voice = None;
                self.position = offset;
                self.status = PlaybackStatus::Idle;
                self.ticks.disarm();
                Err(e)
            }
        }
    }

    fn handle_signal(&mut self, signal: VoiceSignal) {
        let id = signal.voice_id();
        let ours = matches!(self.voice, Some(voice) if voice.id == id);
        if !ours || !self.slot.is_current(id) {
            tracing::trace!(session = self.id, voice = id, "ignoring stale voice signal");
            return;
        }

        match signal {
            VoiceSignal::Ended(_) => {
                tracing::debug!(session = self.id, voice = id, "voice ended");
                self.finish();
            }
            VoiceSignal::Failed(_, message) => {
                tracing::error!(session = self.id, voice = id, %message, "voice failed");
                let position = self.current_position();
                self.teardown();
                self.position = position;
                self.status = PlaybackStatus::Idle;
                self.emit(PlaybackEvent::Error(Error::DeviceFailure(message)));
            }
        }
    }

    /// Enter `Ended` at the end of the buffer.
    fn finish(&mut self) {
        self.teardown();
        self.position = self.duration;
        self.status = PlaybackStatus::Ended;
        self.emit(PlaybackEvent::Ended);
    }

    /// Commit an eviction observed through the slot.
    fn reconcile(&mut self) {
        if !self.is_evicted() {
            return;
        }
        let fallback = self.current_position();
        let position = self.slot.take_eviction(self.id).unwrap_or(fallback);
        self.voice = None;
        self.ticks.disarm();
        self.position = clamp_position(position, self.duration);
        self.status = PlaybackStatus::Paused;
        tracing::debug!(session = self.id, position = self.position, "voice was evicted");
    }

    fn is_evicted(&self) -> bool {
        self.status.is_playing()
            && matches!(self.voice, Some(voice) if !self.slot.is_current(voice.id))
    }

    fn current_position(&self) -> f64 {
        match self.voice {
            Some(voice) => voice.anchor.position(self.slot.now(), self.duration),
            None => self.position,
        }
    }

    fn teardown(&mut self) {
        if let Some(voice) = self.voice.take() {
            self.slot.release(self.id, voice.id);
        }
        self.ticks.disarm();
    }

    fn emit(&self, event: PlaybackEvent) {
        if let Some(events) = &self.events {
            // Owner may have dropped the receiver
            let _ = events.send(event);
        }
    }

    fn shutdown(&mut self) {
        self.teardown();
        self.slot.forget_session(self.id);
        self.events = None;
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("id", &self.id)
            .field("status", &self.status())
            .field("position", &self.position())
            .field("rate", &self.rate)
            .field("duration", &self.duration)
            .finish()
    }
}

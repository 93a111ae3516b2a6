//! Global voice slot: at most one live voice across every session.
//!
//! The slot is an explicit registry shared by all sessions an engine
//! creates. Starting a voice always tears down the current occupant first,
//! whoever owns it, and records where an evicted owner stopped so it can
//! later report that position.

use crate::voice::{Voice, VoiceBackend, VoiceId, VoiceNotifier, VoiceRequest, VoiceSignal};
use crate::{Error, Result};
use crossbeam_channel::Sender;
use monovox_core::{Arc, ClockAnchor, SampleBuffer};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Identity of a session registered with a [`VoiceSlot`].
pub type SessionId = u64;

/// Snapshot of the slot occupant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveVoice {
    pub session: SessionId,
    pub voice: VoiceId,
    pub anchor: ClockAnchor,
}

struct Occupant {
    owner: SessionId,
    voice_id: VoiceId,
    voice: Box<dyn Voice>,
    notifier: VoiceNotifier,
    anchor: ClockAnchor,
    duration: f64,
}

impl Occupant {
    /// Detach first, then stop. A stop is never reported as an end.
    fn teardown(mut self) {
        self.notifier.detach();
        self.voice.stop();
    }
}

#[derive(Default)]
struct SlotState {
    occupant: Option<Occupant>,
    /// Last position of sessions whose voice was taken away from them.
    evictions: HashMap<SessionId, f64>,
    next_voice_id: VoiceId,
    next_session_id: SessionId,
}

/// Shared registry holding at most one live voice.
///
/// Cloning is cheap; clones refer to the same slot.
#[derive(Clone)]
pub struct VoiceSlot {
    backend: Arc<dyn VoiceBackend>,
    state: Arc<Mutex<SlotState>>,
}

impl VoiceSlot {
    pub fn new(backend: Arc<dyn VoiceBackend>) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(SlotState {
                next_voice_id: 1,
                next_session_id: 1,
                ..Default::default()
            })),
        }
    }

    /// Device clock of the backend, in seconds.
    #[inline]
    pub fn now(&self) -> f64 {
        self.backend.now()
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Allocate a session identity.
    pub fn register_session(&self) -> SessionId {
        let mut state = self.state.lock();
        let id = state.next_session_id;
        state.next_session_id += 1;
        id
    }

    /// Tear down the current occupant and start a new voice for `owner`.
    ///
    /// On failure the slot is left empty and the error is always
    /// [`Error::DeviceStartFailure`].
    pub fn start(
        &self,
        owner: SessionId,
        buffer: Arc<SampleBuffer>,
        offset: f64,
        rate: f64,
        signal_tx: Sender<VoiceSignal>,
    ) -> Result<(VoiceId, ClockAnchor)> {
        let mut state = self.state.lock();

        if let Some(previous) = state.occupant.take() {
            if previous.owner != owner {
                let position = previous.anchor.position(self.now(), previous.duration);
                tracing::debug!(
                    evicted = previous.owner,
                    voice = previous.voice_id,
                    position,
                    "evicting voice"
                );
                state.evictions.insert(previous.owner, position);
            }
            previous.teardown();
        }
        state.evictions.remove(&owner);

        let voice_id = state.next_voice_id;
        state.next_voice_id += 1;

        let duration = buffer.duration();
        let notifier = VoiceNotifier::new(voice_id, signal_tx);
        let request = VoiceRequest {
            buffer,
            offset,
            rate,
            notifier: notifier.clone(),
        };

        match self.backend.start(request) {
            Ok(voice) => {
                let anchor = ClockAnchor::new(self.now(), offset, rate);
                tracing::debug!(session = owner, voice = voice_id, offset, rate, "voice started");
                state.occupant = Some(Occupant {
                    owner,
                    voice_id,
                    voice,
                    notifier,
                    anchor,
                    duration,
                });
                Ok((voice_id, anchor))
            }
            Err(e) => {
                notifier.detach();
                tracing::warn!(session = owner, voice = voice_id, error = %e, "voice start failed");
                Err(match e {
                    Error::DeviceStartFailure(_) => e,
                    other => Error::DeviceStartFailure(other.to_string()),
                })
            }
        }
    }

    /// Tear down `voice_id` if `owner` still holds it. Returns whether
    /// anything was stopped.
    pub fn release(&self, owner: SessionId, voice_id: VoiceId) -> bool {
        let mut state = self.state.lock();
        let holds = matches!(
            &state.occupant,
            Some(occ) if occ.owner == owner && occ.voice_id == voice_id
        );
        if !holds {
            return false;
        }
        if let Some(occupant) = state.occupant.take() {
            occupant.teardown();
        }
        true
    }

    /// Whether `voice_id` is the live occupant.
    pub fn is_current(&self, voice_id: VoiceId) -> bool {
        matches!(&self.state.lock().occupant, Some(occ) if occ.voice_id == voice_id)
    }

    pub fn occupant(&self) -> Option<ActiveVoice> {
        self.state.lock().occupant.as_ref().map(|occ| ActiveVoice {
            session: occ.owner,
            voice: occ.voice_id,
            anchor: occ.anchor,
        })
    }

    pub fn is_occupied(&self) -> bool {
        self.state.lock().occupant.is_some()
    }

    /// Position at which `owner` lost its voice, if it did.
    pub fn peek_eviction(&self, owner: SessionId) -> Option<f64> {
        self.state.lock().evictions.get(&owner).copied()
    }

    pub fn take_eviction(&self, owner: SessionId) -> Option<f64> {
        self.state.lock().evictions.remove(&owner)
    }

    /// Drop everything recorded for a released session.
    pub fn forget_session(&self, owner: SessionId) {
        self.state.lock().evictions.remove(&owner);
    }

    /// Silence the occupant. Its owner observes an eviction.
    pub fn stop_all(&self) -> bool {
        let mut state = self.state.lock();
        let Some(occupant) = state.occupant.take() else {
            return false;
        };
        let position = occupant.anchor.position(self.now(), occupant.duration);
        state.evictions.insert(occupant.owner, position);
        tracing::info!(session = occupant.owner, position, "stopping active voice");
        occupant.teardown();
        true
    }
}

impl std::fmt::Debug for VoiceSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceSlot")
            .field("backend", &self.backend.name())
            .field("occupant", &self.occupant())
            .finish()
    }
}

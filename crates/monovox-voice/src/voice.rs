//! Backend seam for one-shot hardware voices.
//!
//! A voice plays one buffer from a fixed offset at a fixed rate. It can be
//! started once and stopped once; it cannot be repositioned, re-rated or
//! resumed. Anything that changes offset or rate builds a new voice.

use crate::Result;
use crossbeam_channel::Sender;
use monovox_core::{Arc, OneShot, SampleBuffer};

/// Identity of one started voice. Never reused within a [`VoiceSlot`](crate::VoiceSlot).
pub type VoiceId = u64;

/// Asynchronous signal from a running voice, tagged with its identity.
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceSignal {
    /// The voice played to the end of its buffer on its own.
    Ended(VoiceId),
    /// The device reported an error after the voice started.
    Failed(VoiceId, String),
}

impl VoiceSignal {
    pub fn voice_id(&self) -> VoiceId {
        match self {
            VoiceSignal::Ended(id) | VoiceSignal::Failed(id, _) => *id,
        }
    }
}

/// Completion callback handed to a backend with each voice.
///
/// Ending and failing share one latch, so a voice reports at most one
/// signal. [`detach`](Self::detach) disarms the latch; the slot always
/// detaches before it stops a voice, so a programmatic stop can never be
/// reported as a natural end.
#[derive(Debug, Clone)]
pub struct VoiceNotifier {
    id: VoiceId,
    latch: Arc<OneShot>,
    signal_tx: Sender<VoiceSignal>,
}

impl VoiceNotifier {
    pub(crate) fn new(id: VoiceId, signal_tx: Sender<VoiceSignal>) -> Self {
        Self {
            id,
            latch: Arc::new(OneShot::armed()),
            signal_tx,
        }
    }

    #[inline]
    pub fn id(&self) -> VoiceId {
        self.id
    }

    /// Still attached and not yet fired.
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.latch.is_armed()
    }

    /// Report natural completion. Returns false if detached or already fired.
    pub fn ended(&self) -> bool {
        self.latch.fire() && self.send(VoiceSignal::Ended(self.id))
    }

    /// Report a runtime device failure. Returns false if detached or already fired.
    pub fn failed(&self, message: impl Into<String>) -> bool {
        self.latch.fire() && self.send(VoiceSignal::Failed(self.id, message.into()))
    }

    /// Disarm the callback; later `ended`/`failed` calls are dropped.
    #[inline]
    pub fn detach(&self) {
        self.latch.disarm();
    }

    /// Send without consulting the latch (tests simulating late delivery).
    pub(crate) fn send_unlatched(&self, signal: VoiceSignal) -> bool {
        self.send(signal)
    }

    fn send(&self, signal: VoiceSignal) -> bool {
        // Receiver is gone once its session is released
        self.signal_tx.send(signal).is_ok()
    }
}

/// Everything a backend needs to start one voice.
#[derive(Debug, Clone)]
pub struct VoiceRequest {
    pub buffer: Arc<SampleBuffer>,
    /// Start offset into the buffer in seconds.
    pub offset: f64,
    /// Playback rate, always finite and > 0.
    pub rate: f64,
    pub notifier: VoiceNotifier,
}

/// A started voice. Dropping it must also silence it.
pub trait Voice: Send {
    /// Silence the voice and release its device resources.
    fn stop(&mut self);
}

/// Source of voices and of the device clock they run against.
pub trait VoiceBackend: Send + Sync {
    /// Device clock in seconds. Monotonic.
    fn now(&self) -> f64;

    /// Start a voice. Must either return a playing voice or an error with
    /// nothing left running.
    fn start(&self, request: VoiceRequest) -> Result<Box<dyn Voice>>;

    /// Human-readable backend name for logs.
    fn name(&self) -> &str {
        "voice-backend"
    }
}

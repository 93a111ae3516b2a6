//! Deterministic backend for tests and headless hosts.
//!
//! The device clock only moves when [`MockBackend::advance`] is called, and
//! voices end exactly when the clock passes their end time. Counters and
//! fault injection let tests check single-voice arbitration without audio
//! hardware.

use crate::voice::{Voice, VoiceBackend, VoiceId, VoiceNotifier, VoiceRequest, VoiceSignal};
use crate::{Error, Result};
use monovox_core::{Arc, AtomicDouble, ClockAnchor};
use parking_lot::Mutex;

/// One successful `start` call as seen by the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartRecord {
    pub id: VoiceId,
    pub offset: f64,
    pub rate: f64,
    pub started_at: f64,
}

struct MockVoiceState {
    record: StartRecord,
    end_time: f64,
    notifier: VoiceNotifier,
    stopped: bool,
    finished: bool,
}

#[derive(Default)]
struct MockState {
    voices: Vec<MockVoiceState>,
    stops: usize,
    fail_next: Option<String>,
}

#[derive(Default)]
struct Shared {
    clock: AtomicDouble,
    state: Mutex<MockState>,
}

/// Backend with a manual clock. Clones share state.
#[derive(Clone, Default)]
pub struct MockBackend {
    shared: Arc<Shared>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward and deliver the end of every voice whose
    /// buffer ran out.
    pub fn advance(&self, seconds: f64) {
        let now = self.shared.clock.add(seconds.max(0.0));
        self.deliver_due(now);
    }

    /// Jump the clock to `time`. Never moves it backwards.
    pub fn set_time(&self, time: f64) {
        let now = self.shared.clock.get().max(time);
        self.shared.clock.set(now);
        self.deliver_due(now);
    }

    fn deliver_due(&self, now: f64) {
        let due: Vec<VoiceNotifier> = {
            let mut state = self.shared.state.lock();
            state
                .voices
                .iter_mut()
                .filter(|v| !v.stopped && !v.finished && v.end_time <= now)
                .map(|v| {
                    v.finished = true;
                    v.notifier.clone()
                })
                .collect()
        };
        for notifier in due {
            notifier.ended();
        }
    }

    /// Make the next `start` call fail with `message`.
    pub fn fail_next_start(&self, message: impl Into<String>) {
        self.shared.state.lock().fail_next = Some(message.into());
    }

    /// Report a runtime device error on a started voice.
    pub fn fail_voice(&self, id: VoiceId, message: impl Into<String>) -> bool {
        match self.notifier(id) {
            Some(notifier) => notifier.failed(message),
            None => false,
        }
    }

    /// Deliver an end signal for `id` even if it was detached, as a late
    /// callback from a torn-down voice would.
    pub fn inject_stale_end(&self, id: VoiceId) -> bool {
        match self.notifier(id) {
            Some(notifier) => notifier.send_unlatched(VoiceSignal::Ended(id)),
            None => false,
        }
    }

    fn notifier(&self, id: VoiceId) -> Option<VoiceNotifier> {
        let state = self.shared.state.lock();
        state
            .voices
            .iter()
            .find(|v| v.record.id == id)
            .map(|v| v.notifier.clone())
    }

    pub fn start_count(&self) -> usize {
        self.shared.state.lock().voices.len()
    }

    pub fn stop_count(&self) -> usize {
        self.shared.state.lock().stops
    }

    /// Voices started and not yet stopped.
    pub fn live_voices(&self) -> usize {
        let state = self.shared.state.lock();
        state.voices.iter().filter(|v| !v.stopped).count()
    }

    pub fn starts(&self) -> Vec<StartRecord> {
        let state = self.shared.state.lock();
        state.voices.iter().map(|v| v.record).collect()
    }

    pub fn last_start(&self) -> Option<StartRecord> {
        self.shared.state.lock().voices.last().map(|v| v.record)
    }
}

impl VoiceBackend for MockBackend {
    fn now(&self) -> f64 {
        self.shared.clock.get()
    }

    fn start(&self, request: VoiceRequest) -> Result<Box<dyn Voice>> {
        let mut state = self.shared.state.lock();
        if let Some(message) = state.fail_next.take() {
            return Err(Error::DeviceStartFailure(message));
        }

        let started_at = self.now();
        let id = request.notifier.id();
        let anchor = ClockAnchor::new(started_at, request.offset, request.rate);
        state.voices.push(MockVoiceState {
            record: StartRecord {
                id,
                offset: request.offset,
                rate: request.rate,
                started_at,
            },
            end_time: anchor.end_time(request.buffer.duration()),
            notifier: request.notifier,
            stopped: false,
            finished: false,
        });

        Ok(Box::new(MockVoice {
            id,
            stopped: false,
            shared: Arc::clone(&self.shared),
        }))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

struct MockVoice {
    id: VoiceId,
    stopped: bool,
    shared: Arc<Shared>,
}

impl Voice for MockVoice {
    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        let mut state = self.shared.state.lock();
        state.stops += 1;
        if let Some(v) = state.voices.iter_mut().find(|v| v.record.id == self.id) {
            v.stopped = true;
        }
    }
}

impl Drop for MockVoice {
    fn drop(&mut self) {
        self.stop();
    }
}

//! Position tick cadence.

use std::time::Duration;

/// Fixed-period schedule measured on the device clock.
///
/// Missed periods are coalesced: a late `due` check yields a single tick
/// and the next deadline moves past `now`.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSchedule {
    interval: f64,
    next: Option<f64>,
}

impl TickSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.as_secs_f64(),
            next: None,
        }
    }

    #[inline]
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// First tick one interval after `now`.
    pub fn arm(&mut self, now: f64) {
        self.next = Some(now + self.interval);
    }

    pub fn disarm(&mut self) {
        self.next = None;
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.next.is_some()
    }

    /// Whether a tick is due at `now`. Advances the deadline when it is.
    pub fn due(&mut self, now: f64) -> bool {
        let Some(next) = self.next else {
            return false;
        };
        if now < next || self.interval <= 0.0 {
            return false;
        }
        let missed = ((now - next) / self.interval).floor() + 1.0;
        self.next = Some(next + missed * self.interval);
        true
    }
}

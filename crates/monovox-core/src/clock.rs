//! Playback clock: maps device time onto a buffer offset.
//!
//! A voice is started at `offset` seconds into the buffer when the device
//! clock reads `started_at`. While it plays, the position is
//! `offset + (now - started_at) * rate`, clamped to `[0, duration]`.

/// Position within a buffer of length `duration`, given the device clock
/// `now` and the anchor recorded when the current voice started.
///
/// Never returns a value outside `[0, duration]`. A device clock that reads
/// earlier than the anchor yields the anchor offset.
#[inline]
pub fn clock_position(
    now: f64,
    anchor_time: f64,
    anchor_offset: f64,
    rate: f64,
    duration: f64,
) -> f64 {
    let duration = duration.max(0.0);
    let elapsed = ((now - anchor_time) * rate).max(0.0);
    let position = anchor_offset + elapsed;
    if position.is_nan() {
        return clamp_position(anchor_offset, duration);
    }
    clamp_position(position, duration)
}

/// Clamp an offset into `[0, duration]`; NaN maps to 0.
#[inline]
pub fn clamp_position(position: f64, duration: f64) -> f64 {
    if position.is_nan() {
        return 0.0;
    }
    position.clamp(0.0, duration.max(0.0))
}

/// Device time, buffer offset and rate captured when a voice starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockAnchor {
    pub started_at: f64,
    pub offset: f64,
    pub rate: f64,
}

impl ClockAnchor {
    #[inline]
    pub const fn new(started_at: f64, offset: f64, rate: f64) -> Self {
        Self {
            started_at,
            offset,
            rate,
        }
    }

    #[inline]
    pub fn position(&self, now: f64, duration: f64) -> f64 {
        clock_position(now, self.started_at, self.offset, self.rate, duration)
    }

    /// Device time at which the buffer runs out if nothing intervenes.
    #[inline]
    pub fn end_time(&self, duration: f64) -> f64 {
        self.started_at + (duration - self.offset).max(0.0) / self.rate
    }
}

//! Immutable decoded audio.

use crate::{Error, Result};

/// Lowest accepted sample rate in Hz.
pub const MIN_SAMPLE_RATE: u32 = 8_000;

/// Highest accepted sample rate in Hz.
pub const MAX_SAMPLE_RATE: u32 = 384_000;

/// Decoded mono audio: normalized samples plus their sample rate.
///
/// Built once by the codec and never mutated afterwards. Playback sessions
/// and export jobs share it through `Arc<SampleBuffer>`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Wrap already-normalized samples.
    ///
    /// Fails with [`Error::EmptyAudio`] for an empty vector and with
    /// [`Error::DecodeFailure`] when the sample rate is outside
    /// [`MIN_SAMPLE_RATE`]..=[`MAX_SAMPLE_RATE`].
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::EmptyAudio);
        }
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
            return Err(Error::DecodeFailure(format!(
                "sample_rate {sample_rate} out of range ({MIN_SAMPLE_RATE}-{MAX_SAMPLE_RATE} Hz)"
            )));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Always 1; the engine is mono only.
    #[inline]
    pub fn channels(&self) -> u16 {
        1
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds (`len / sample_rate`).
    #[inline]
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Sample at a fractional frame index, linearly interpolated.
    /// Returns silence past the end.
    #[inline]
    pub fn sample_at(&self, frame: f64) -> f32 {
        let len = self.samples.len();
        if frame < 0.0 || frame >= len as f64 {
            return 0.0;
        }
        let idx = frame.floor() as usize;
        let frac = (frame - idx as f64) as f32;
        let s0 = self.samples[idx];
        let s1 = self.samples[(idx + 1).min(len - 1)];
        s0 + (s1 - s0) * frac
    }
}

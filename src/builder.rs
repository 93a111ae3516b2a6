//! Builder for configuring and constructing a `PlaybackEngine`.

use crate::{PlaybackEngine, Result};
use monovox_core::{Arc, EngineConfig};
use monovox_voice::{VoiceBackend, VoiceSlot};
use std::time::Duration;

/// Without an explicit [`backend`](Self::backend) the engine plays through
/// CPAL (feature `device`). Building without either is an error.
///
/// # Example
///
/// ```ignore
/// use monovox::prelude::*;
///
/// let engine = PlaybackEngine::builder()
///     .tick_interval(Duration::from_millis(100))
///     .default_rate(1.25)
///     .build()?;
/// ```
#[derive(Default)]
pub struct PlaybackEngineBuilder {
    config: EngineConfig,
    backend: Option<Arc<dyn VoiceBackend>>,
}

impl PlaybackEngineBuilder {
    /// Default: 250 ms
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.config.tick_interval = interval;
        self
    }

    /// Default: 1.0
    pub fn default_rate(mut self, rate: f64) -> Self {
        self.config.default_rate = rate;
        self
    }

    /// Only used by the CPAL backend.
    pub fn output_device(mut self, index: usize) -> Self {
        self.config.output_device = Some(index);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Play through a custom backend (e.g. `MockBackend` in tests).
    pub fn backend<B: VoiceBackend + 'static>(mut self, backend: B) -> Self {
        self.backend = Some(Arc::new(backend));
        self
    }

    pub fn build(self) -> Result<PlaybackEngine> {
        self.config.validate()?;

        let backend = match self.backend {
            Some(backend) => backend,
            None => default_backend(&self.config)?,
        };
        let slot = VoiceSlot::new(backend);

        tracing::info!(
            backend = slot.backend_name(),
            tick_interval = ?self.config.tick_interval,
            default_rate = self.config.default_rate,
            "playback engine ready"
        );

        Ok(PlaybackEngine::new(self.config, slot))
    }
}

#[cfg(feature = "device")]
fn default_backend(config: &EngineConfig) -> Result<Arc<dyn VoiceBackend>> {
    let backend = monovox_voice::CpalBackend::new(config.output_device)?;
    Ok(Arc::new(backend))
}

#[cfg(not(feature = "device"))]
fn default_backend(_config: &EngineConfig) -> Result<Arc<dyn VoiceBackend>> {
    Err(monovox_core::Error::InvalidConfig(
        "no voice backend: enable the `device` feature or call `.backend(..)`".into(),
    )
    .into())
}

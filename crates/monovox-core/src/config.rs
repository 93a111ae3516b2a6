//! Engine configuration.

use crate::{Error, Result};
use std::time::Duration;

/// Default position tick period (about 4 Hz).
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(250);

const MIN_TICK_INTERVAL: Duration = Duration::from_millis(10);
const MAX_TICK_INTERVAL: Duration = Duration::from_secs(10);

/// Configuration for the playback engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Period between position ticks while playing.
    pub tick_interval: Duration,
    /// Playback rate new sessions start with.
    pub default_rate: f64,
    /// Output device index; `None` uses the host default.
    pub output_device: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            default_rate: 1.0,
            output_device: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval < MIN_TICK_INTERVAL || self.tick_interval > MAX_TICK_INTERVAL {
            return Err(Error::InvalidConfig(format!(
                "tick_interval {:?} out of range ({:?}-{:?})",
                self.tick_interval, MIN_TICK_INTERVAL, MAX_TICK_INTERVAL
            )));
        }
        if !(self.default_rate.is_finite() && self.default_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "default_rate {} must be finite and positive",
                self.default_rate
            )));
        }
        Ok(())
    }
}

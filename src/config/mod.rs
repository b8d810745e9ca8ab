//! Generator configuration.

mod builder;

pub use builder::ConfigBuilder;

use std::time::Duration;

use crate::error::Error;
use crate::layout::BitLayout;

/// Default custom epoch: January 1, 2024 00:00:00 UTC, in milliseconds.
///
/// A recent epoch maximizes the usable lifespan of the timestamp field.
pub const DEFAULT_EPOCH_MS: i64 = 1_704_067_200_000;

/// Default clock-backward tolerance. Drifts up to this are waited out;
/// anything larger fails the emission.
pub const DEFAULT_MAX_CLOCK_BACKWARD: Duration = Duration::from_millis(5);

/// Parameters for a [`Generator`](crate::Generator).
///
/// Constructed directly or through [`Config::builder`]; validated when the
/// generator is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Worker identity, unique across all concurrently running generators.
    /// Valid range depends on the layout (0-1023 for the default).
    pub worker_id: u32,
    /// Custom epoch in milliseconds since the Unix epoch. Must be positive
    /// and not in the future.
    pub epoch_ms: i64,
    /// Maximum tolerated backward clock drift.
    pub max_clock_backward: Duration,
    /// Whether the generator updates its atomic metric counters.
    pub enable_metrics: bool,
    /// Bit allocation strategy. A layout with all bit fields zero resolves
    /// to [`BitLayout::DEFAULT`].
    pub layout: BitLayout,
}

impl Config {
    /// Production defaults for the given worker: 2024 epoch, 5ms drift
    /// tolerance, metrics on, default 41+10+12 layout.
    pub fn new(worker_id: u32) -> Self {
        Self {
            worker_id,
            epoch_ms: DEFAULT_EPOCH_MS,
            max_clock_backward: DEFAULT_MAX_CLOCK_BACKWARD,
            enable_metrics: true,
            layout: BitLayout::DEFAULT,
        }
    }

    /// Start building a configuration from the defaults for worker 0.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Resolve the layout default and check every field.
    pub(crate) fn validated(mut self) -> Result<Config, Error> {
        if self.layout.is_unset() {
            self.layout = BitLayout::DEFAULT;
        }
        self.layout.validate()?;
        self.layout.validate_worker_id(self.worker_id)?;
        if self.epoch_ms <= 0 {
            return Err(Error::Configuration {
                field: "epoch_ms",
                value: self.epoch_ms.to_string(),
                reason: "must be positive",
                constraint: "epoch timestamp in milliseconds must be > 0".to_string(),
            });
        }
        Ok(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0)
    }
}

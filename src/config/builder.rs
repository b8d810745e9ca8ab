//! Builder for [`Config`].

use std::time::Duration;

use super::Config;
use crate::layout::BitLayout;

/// Fluent builder for [`Config`]. Validation is deferred to generator
/// construction so a builder never fails mid-chain.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Start from the defaults for worker 0.
    pub fn new() -> Self {
        Self {
            config: Config::new(0),
        }
    }

    /// Set the worker identity.
    pub const fn worker_id(mut self, worker_id: u32) -> Self {
        self.config.worker_id = worker_id;
        self
    }

    /// Set the custom epoch in milliseconds since the Unix epoch.
    pub const fn epoch(mut self, epoch_ms: i64) -> Self {
        self.config.epoch_ms = epoch_ms;
        self
    }

    /// Set the maximum tolerated backward clock drift.
    pub const fn max_clock_backward(mut self, tolerance: Duration) -> Self {
        self.config.max_clock_backward = tolerance;
        self
    }

    /// Enable or disable metric counter updates.
    pub const fn enable_metrics(mut self, enable: bool) -> Self {
        self.config.enable_metrics = enable;
        self
    }

    /// Set the bit layout.
    pub const fn layout(mut self, layout: BitLayout) -> Self {
        self.config.layout = layout;
        self
    }

    /// Finish building.
    pub const fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! The identifier generator state machine.

mod batch;
mod clock;
mod metrics;
mod wait;

pub use self::metrics::Metrics;

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::cancel::CancelToken;
use crate::config::Config;
use crate::error::{Error, OverflowKind};
use crate::id::FlakeId;
use crate::layout::BitLayout;

use self::clock::MonotonicClock;
use self::metrics::Counters;

/// Layout constants cached at construction so the hot path never touches
/// the layout itself.
#[derive(Debug, Clone, Copy)]
struct Constants {
    timestamp_shift: u32,
    worker_shift: u32,
    max_sequence: i64,
    /// `2^timestamp_bits`; the elapsed-unit count must stay below this.
    max_timestamp: i64,
    time_unit_ms: i64,
    /// Right-shift converting milliseconds to units, or `None` for the
    /// division fallback.
    time_unit_shift: Option<u32>,
    /// Clock-backward tolerance converted into time units.
    tolerance_units: i64,
    tolerance_ms: i64,
}

/// Mutable emission state, guarded by the generator's mutex.
#[derive(Debug)]
pub(crate) struct EmitState {
    pub(crate) last_time_unit: i64,
    pub(crate) sequence: i64,
}

/// A thread-safe identifier generator bound to one worker identity.
///
/// Emissions serialize on an internal mutex held only for the critical
/// section; metric counters are atomic and readable without the lock. The
/// fast path neither sleeps nor allocates. Every method takes `&self`, so a
/// generator can be shared across threads by reference or `Arc`.
///
/// Uniqueness across processes requires that no two concurrently running
/// generators share a worker identity; that assignment is the caller's
/// responsibility and a violation collides silently.
#[derive(Debug)]
pub struct Generator {
    clock: MonotonicClock,
    /// The configured epoch divided into layout time units.
    custom_epoch_units: i64,
    worker_id: u32,
    layout: BitLayout,
    epoch_ms: i64,
    constants: Constants,
    pub(crate) state: Mutex<EmitState>,
    counters: Counters,
}

impl Generator {
    /// Create a generator with production defaults for the given worker.
    pub fn new(worker_id: u32) -> Result<Self, Error> {
        Self::with_config(Config::new(worker_id))
    }

    /// Create a generator from a full configuration.
    ///
    /// Validates the layout (resolving an all-zero layout to the default)
    /// and the worker identity against it, anchors the monotonic clock, and
    /// pre-computes every shift and mask the emission path needs.
    pub fn with_config(config: Config) -> Result<Self, Error> {
        let config = config.validated()?;
        let layout = config.layout;

        let clock = MonotonicClock::start();
        if config.epoch_ms > clock.now_ms() {
            return Err(Error::Configuration {
                field: "epoch_ms",
                value: config.epoch_ms.to_string(),
                reason: "ahead of current time",
                constraint: "epoch must not be in the future".to_string(),
            });
        }

        let shifts = layout.shifts();
        let time_unit_ms = layout.time_unit_ms();
        let tolerance_ms = config.max_clock_backward.as_millis() as i64;

        Ok(Self {
            clock,
            custom_epoch_units: config.epoch_ms / time_unit_ms,
            worker_id: config.worker_id,
            layout,
            epoch_ms: config.epoch_ms,
            constants: Constants {
                timestamp_shift: shifts.timestamp_shift,
                worker_shift: shifts.worker_shift,
                max_sequence: shifts.max_sequence,
                max_timestamp: 1i64 << layout.timestamp_bits,
                time_unit_ms,
                time_unit_shift: layout.time_unit_shift(),
                tolerance_units: tolerance_ms / time_unit_ms,
                tolerance_ms,
            },
            state: Mutex::new(EmitState {
                last_time_unit: 0,
                sequence: 0,
            }),
            counters: Counters::new(config.enable_metrics),
        })
    }

    /// Emit one identifier, blocking through drift or sequence-overflow
    /// waits as needed.
    pub fn generate(&self) -> Result<FlakeId, Error> {
        self.generate_with_cancel(CancelToken::never())
    }

    /// Emit one identifier, aborting promptly with
    /// [`Error::Canceled`] if `cancel` fires during a wait.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "trace", skip_all, fields(worker_id = self.worker_id))
    )]
    pub fn generate_with_cancel(&self, cancel: &CancelToken) -> Result<FlakeId, Error> {
        let mut state = self.state.lock()?;
        let word = self.emit_at(&mut state, cancel)?;
        self.counters.incr_generated(1);
        Ok(FlakeId::from_i64(word))
    }

    /// One emission under the already-held lock.
    ///
    /// `state` is written only after every wait has succeeded; a canceled
    /// wait leaves `last_time_unit` and `sequence` exactly as they were, so
    /// a retry cannot duplicate an identifier.
    fn emit_at(&self, state: &mut EmitState, cancel: &CancelToken) -> Result<i64, Error> {
        if cancel.is_canceled() {
            return Err(Error::Canceled);
        }

        let mut now = self.now_units();

        if now < state.last_time_unit {
            self.counters.incr_clock_backward();
            let drift = state.last_time_unit - now;
            if drift <= self.constants.tolerance_units {
                let wait_start = Instant::now();
                let sleep = Duration::from_millis((drift * self.constants.time_unit_ms) as u64);
                let slept = wait::sleep_cancellable(sleep, cancel);
                self.counters.add_wait_us(wait_start.elapsed().as_micros() as u64);
                slept?;
                now = self.now_units();
            }
            if now < state.last_time_unit {
                self.counters.incr_clock_backward_err();
                let unit_ms = self.constants.time_unit_ms;
                return Err(Error::ClockRegressed {
                    current_ms: now * unit_ms,
                    last_ms: state.last_time_unit * unit_ms,
                    drift_ms: (state.last_time_unit - now) * unit_ms,
                    tolerance_ms: self.constants.tolerance_ms,
                    worker_id: self.worker_id,
                    recovered: false,
                });
            }
        }

        let (unit, sequence) = if now == state.last_time_unit {
            let next = (state.sequence + 1) & self.constants.max_sequence;
            if next == 0 {
                // Sequence exhausted within this unit; recovered by waiting,
                // never surfaced.
                self.counters.incr_sequence_overflow();
                let advanced = self.wait_for_next_unit(state.last_time_unit, cancel)?;
                (advanced, 0)
            } else {
                (now, next)
            }
        } else {
            (now, 0)
        };

        let elapsed = unit - self.custom_epoch_units;
        if elapsed >= self.constants.max_timestamp {
            return Err(Error::Overflow {
                kind: OverflowKind::Timestamp,
                timestamp: unit,
                sequence_count: sequence,
                worker_id: self.worker_id,
                max_sequence: self.constants.max_sequence,
                wait_duration: Duration::ZERO,
            });
        }

        state.last_time_unit = unit;
        state.sequence = sequence;

        Ok(elapsed << self.constants.timestamp_shift
            | (self.worker_id as i64) << self.constants.worker_shift
            | sequence)
    }

    /// Current time in layout units via the monotonic clock.
    #[inline]
    fn now_units(&self) -> i64 {
        let ms = self.clock.now_ms();
        match self.constants.time_unit_shift {
            Some(shift) => ms >> shift,
            None => ms / self.constants.time_unit_ms,
        }
    }

    /// Wait (hybrid sleep + yield loop) until the clock passes `last_unit`,
    /// accumulating wait time even when canceled.
    fn wait_for_next_unit(&self, last_unit: i64, cancel: &CancelToken) -> Result<i64, Error> {
        let wait_start = Instant::now();
        let next_start_ms = (last_unit + 1) * self.constants.time_unit_ms;
        let remaining_ms = next_start_ms - self.clock.now_ms();
        let remaining = if remaining_ms > 0 {
            Duration::from_millis(remaining_ms as u64)
        } else {
            Duration::ZERO
        };
        let result = wait::wait_for_next_unit(last_unit, remaining, || self.now_units(), cancel);
        self.counters.add_wait_us(wait_start.elapsed().as_micros() as u64);
        result
    }

    /// Snapshot the metric counters.
    pub fn metrics(&self) -> Metrics {
        self.counters.snapshot()
    }

    /// Zero all metric counters. Mainly a test affordance; production
    /// counters are meant to increase monotonically.
    pub fn reset_metrics(&self) {
        self.counters.reset()
    }

    /// The worker identity baked into every identifier.
    pub const fn worker_id(&self) -> u32 {
        self.worker_id
    }

    /// The layout this generator composes identifiers under.
    pub const fn layout(&self) -> BitLayout {
        self.layout
    }

    /// The configured epoch in milliseconds since the Unix epoch.
    pub const fn epoch_ms(&self) -> i64 {
        self.epoch_ms
    }
}

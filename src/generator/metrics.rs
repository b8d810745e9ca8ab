//! Atomic metric counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Read-only snapshot of a generator's counters.
///
/// Each field is an independent atomic load; no cross-counter transactional
/// consistency is implied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    /// Identifiers successfully emitted.
    pub generated: u64,
    /// Clock-backward events, including ones recovered by waiting.
    pub clock_backward: u64,
    /// Clock-backward events that exceeded tolerance and failed the
    /// emission.
    pub clock_backward_err: u64,
    /// Sequence exhaustions recovered by waiting for the next time unit.
    pub sequence_overflow: u64,
    /// Cumulative microseconds spent in drift and overflow waits.
    pub wait_time_us: u64,
}

/// The generator's live counters. Updates are skipped entirely when the
/// configuration opted out of metrics.
#[derive(Debug)]
pub(crate) struct Counters {
    enabled: bool,
    generated: AtomicU64,
    clock_backward: AtomicU64,
    clock_backward_err: AtomicU64,
    sequence_overflow: AtomicU64,
    wait_time_us: AtomicU64,
}

impl Counters {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            generated: AtomicU64::new(0),
            clock_backward: AtomicU64::new(0),
            clock_backward_err: AtomicU64::new(0),
            sequence_overflow: AtomicU64::new(0),
            wait_time_us: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn incr_generated(&self, n: u64) {
        if self.enabled {
            self.generated.fetch_add(n, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn incr_clock_backward(&self) {
        if self.enabled {
            self.clock_backward.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn incr_clock_backward_err(&self) {
        if self.enabled {
            self.clock_backward_err.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn incr_sequence_overflow(&self) {
        if self.enabled {
            self.sequence_overflow.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn add_wait_us(&self, us: u64) {
        if self.enabled {
            self.wait_time_us.fetch_add(us, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self) -> Metrics {
        Metrics {
            generated: self.generated.load(Ordering::Relaxed),
            clock_backward: self.clock_backward.load(Ordering::Relaxed),
            clock_backward_err: self.clock_backward_err.load(Ordering::Relaxed),
            sequence_overflow: self.sequence_overflow.load(Ordering::Relaxed),
            wait_time_us: self.wait_time_us.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn reset(&self) {
        self.generated.store(0, Ordering::Relaxed);
        self.clock_backward.store(0, Ordering::Relaxed);
        self.clock_backward_err.store(0, Ordering::Relaxed);
        self.sequence_overflow.store(0, Ordering::Relaxed);
        self.wait_time_us.store(0, Ordering::Relaxed);
    }
}

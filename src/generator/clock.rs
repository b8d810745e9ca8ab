//! Monotonic time source.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Wall-clock anchor coupled to a monotonic reference.
///
/// The wall clock and an [`Instant`] are captured once, at generator
/// construction. Every later reading is the anchor plus the monotonic
/// elapsed time, never a fresh wall-clock read, so NTP corrections and
/// manual time changes cannot move the clock backward through the core.
#[derive(Debug, Clone)]
pub(crate) struct MonotonicClock {
    wall_anchor_ms: i64,
    reference: Instant,
}

impl MonotonicClock {
    pub(crate) fn start() -> Self {
        let wall_anchor_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_millis() as i64;
        Self {
            wall_anchor_ms,
            reference: Instant::now(),
        }
    }

    /// Current time in milliseconds since the Unix epoch, reconciled
    /// through the monotonic reference.
    #[inline]
    pub(crate) fn now_ms(&self) -> i64 {
        self.wall_anchor_ms + self.reference.elapsed().as_millis() as i64
    }
}

//! Error types with structured diagnostic context.

use std::fmt;
use std::sync::{MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;

use crate::id::FlakeId;

/// Errors produced by generator construction and emission.
///
/// All variants are `Clone` so the process-wide default generator can cache
/// its construction error and return it on every access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// A configuration field failed validation.
    #[error("invalid configuration: {field}={value} ({reason}) - {constraint}")]
    Configuration {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value, rendered for diagnostics.
        value: String,
        /// Why the value is invalid.
        reason: &'static str,
        /// The valid range or rule, e.g. "must be between 0 and 1023".
        constraint: String,
    },

    /// The reconciled monotonic clock stayed behind the last emitted time
    /// unit even after waiting out a drift within tolerance.
    #[error(
        "clock moved backwards: drift={drift_ms}ms tolerance={tolerance_ms}ms \
         current={current_ms} last={last_ms} worker={worker_id} ({})",
        recovery_label(.recovered)
    )]
    ClockRegressed {
        /// Current reconciled timestamp in milliseconds.
        current_ms: i64,
        /// Timestamp of the last emitted identifier in milliseconds.
        last_ms: i64,
        /// Backward drift in milliseconds (always positive).
        drift_ms: i64,
        /// Configured tolerance in milliseconds.
        tolerance_ms: i64,
        /// Worker that observed the regression.
        worker_id: u32,
        /// Whether the drift resolved by waiting. Surfaced errors always
        /// carry `false`; the flag exists so logs can distinguish.
        recovered: bool,
    },

    /// A sequence or timestamp field ran out of room.
    ///
    /// Sequence exhaustion is recovered internally by waiting and never
    /// surfaces; only [`OverflowKind::Timestamp`] reaches callers, once the
    /// layout's lifespan is exhausted.
    #[error(
        "{kind}: timestamp={timestamp} worker={worker_id} \
         sequence_count={sequence_count} max_sequence={max_sequence} \
         waited={wait_duration:?}"
    )]
    Overflow {
        kind: OverflowKind,
        /// Time-unit count at the moment of overflow.
        timestamp: i64,
        /// Sequence value at the moment of overflow.
        sequence_count: i64,
        worker_id: u32,
        /// Largest sequence value the layout permits.
        max_sequence: i64,
        /// How long the generator waited trying to resolve it.
        wait_duration: Duration,
    },

    /// A cancellation signal fired during a wait.
    #[error("operation canceled")]
    Canceled,

    /// A thread panicked while holding the generator lock.
    #[error("generator mutex poisoned by a panicking thread")]
    LockPoisoned,
}

fn recovery_label(recovered: &bool) -> &'static str {
    if *recovered {
        "recovered"
    } else {
        "unrecovered"
    }
}

/// Which field of the identifier overflowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowKind {
    /// The per-time-unit sequence counter wrapped.
    Sequence,
    /// The elapsed time no longer fits the layout's timestamp bits.
    Timestamp,
}

impl fmt::Display for OverflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowKind::Sequence => f.write_str("sequence overflow"),
            OverflowKind::Timestamp => f.write_str("timestamp overflow"),
        }
    }
}

impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Error::LockPoisoned
    }
}

/// A batch emission that failed partway through.
///
/// The identifiers emitted before the failure are valid and unique; the
/// caller decides whether to use them or discard the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("batch stopped after {} identifiers: {source}", .partial.len())]
pub struct BatchError {
    /// Identifiers emitted before the error.
    pub partial: Vec<FlakeId>,
    /// What stopped the batch.
    #[source]
    pub source: Error,
}

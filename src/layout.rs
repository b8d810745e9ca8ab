//! Bit layout descriptors for partitioning the 63 usable identifier bits.
//!
//! A [`BitLayout`] decides the trade-off between lifespan (timestamp bits),
//! scale (worker bits) and per-worker throughput (sequence bits). All derived
//! shift and mask constants are computed once; the generator caches them at
//! construction so layouts cost nothing at emission time.

use std::fmt;
use std::time::Duration;

use crate::error::Error;

const MIN_TIMESTAMP_BITS: u8 = 38;
const MAX_TIMESTAMP_BITS: u8 = 42;
const MIN_WORKER_BITS: u8 = 8;
const MAX_WORKER_BITS: u8 = 18;
const MIN_SEQUENCE_BITS: u8 = 6;
const MAX_SEQUENCE_BITS: u8 = 14;

/// Number of usable bits in a signed 64-bit identifier (sign bit excluded).
pub const USABLE_BITS: u8 = 63;

/// How the 63 usable bits of an identifier are allocated.
///
/// Identifiers generated under different layouts are not interoperable:
/// decoding a word with the wrong layout yields nonsense components. There
/// is no self-describing envelope; pick a layout once per system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitLayout {
    /// Bits for the timestamp field. Range 38-42.
    pub timestamp_bits: u8,
    /// Bits for the worker identity. Range 8-18.
    pub worker_bits: u8,
    /// Bits for the per-time-unit sequence. Range 6-14.
    pub sequence_bits: u8,
    /// Timestamp quantization. Whole milliseconds, at least 1ms.
    pub time_unit: Duration,
}

impl BitLayout {
    /// Original Twitter-style layout: ~69 years, 1,024 workers,
    /// 4,096,000 ids/sec per worker.
    pub const DEFAULT: BitLayout = BitLayout::new(41, 10, 12, Duration::from_millis(1));

    /// Balanced scale: ~35 years, 16,384 workers, 512,000 ids/sec per worker.
    pub const SUPERIOR: BitLayout = BitLayout::new(40, 14, 9, Duration::from_millis(1));

    /// Maximum node count at 1ms precision: ~17 years, 131,072 workers,
    /// 128,000 ids/sec per worker.
    pub const EXTREME: BitLayout = BitLayout::new(39, 17, 7, Duration::from_millis(1));

    /// High scale with high throughput: ~17 years, 32,768 workers,
    /// 512,000 ids/sec per worker.
    pub const ULTRA: BitLayout = BitLayout::new(39, 15, 9, Duration::from_millis(1));

    /// Extended lifespan: ~139 years, 4,096 workers, 512,000 ids/sec per
    /// worker.
    pub const LONG_LIFE: BitLayout = BitLayout::new(42, 12, 9, Duration::from_millis(1));

    /// Sonyflake-compatible layout: ~174 years, 65,536 workers,
    /// 25,600 ids/sec per worker at 10ms precision.
    pub const SONYFLAKE: BitLayout = BitLayout::new(39, 16, 8, Duration::from_millis(10));

    /// Long-haul balance: ~348 years, 65,536 workers, 12,800 ids/sec per
    /// worker at 10ms precision.
    pub const ULTIMATE: BitLayout = BitLayout::new(40, 16, 7, Duration::from_millis(10));

    /// Maximum node count: ~348 years, 131,072 workers, 6,400 ids/sec per
    /// worker at 10ms precision.
    pub const MEGA_SCALE: BitLayout = BitLayout::new(40, 17, 6, Duration::from_millis(10));

    /// All named layouts, for capacity planning and tests.
    pub const PRESETS: [BitLayout; 8] = [
        BitLayout::DEFAULT,
        BitLayout::SUPERIOR,
        BitLayout::EXTREME,
        BitLayout::ULTRA,
        BitLayout::LONG_LIFE,
        BitLayout::SONYFLAKE,
        BitLayout::ULTIMATE,
        BitLayout::MEGA_SCALE,
    ];

    /// Create a layout from its four parameters. Validation happens in
    /// [`BitLayout::validate`], typically at generator construction.
    pub const fn new(
        timestamp_bits: u8,
        worker_bits: u8,
        sequence_bits: u8,
        time_unit: Duration,
    ) -> Self {
        Self {
            timestamp_bits,
            worker_bits,
            sequence_bits,
            time_unit,
        }
    }

    /// A layout whose bit fields are all zero stands for "use the default".
    pub(crate) const fn is_unset(&self) -> bool {
        self.timestamp_bits == 0 && self.worker_bits == 0 && self.sequence_bits == 0
    }

    /// Check the layout against the documented constraints.
    ///
    /// The three bit fields must sum to 63 and each must fall in its range
    /// (timestamp 38-42, worker 8-18, sequence 6-14). The time unit must be
    /// a whole, positive number of milliseconds.
    pub fn validate(&self) -> Result<(), Error> {
        let total = self.timestamp_bits as u32 + self.worker_bits as u32 + self.sequence_bits as u32;
        if total != USABLE_BITS as u32 {
            return Err(Error::Configuration {
                field: "layout",
                value: format!(
                    "{}+{}+{}",
                    self.timestamp_bits, self.worker_bits, self.sequence_bits
                ),
                reason: "bit fields must sum to 63",
                constraint: format!("got {total} bits"),
            });
        }
        if self.timestamp_bits < MIN_TIMESTAMP_BITS || self.timestamp_bits > MAX_TIMESTAMP_BITS {
            return Err(Error::Configuration {
                field: "timestamp_bits",
                value: self.timestamp_bits.to_string(),
                reason: "outside supported range",
                constraint: format!(
                    "must be between {MIN_TIMESTAMP_BITS} and {MAX_TIMESTAMP_BITS}"
                ),
            });
        }
        if self.worker_bits < MIN_WORKER_BITS || self.worker_bits > MAX_WORKER_BITS {
            return Err(Error::Configuration {
                field: "worker_bits",
                value: self.worker_bits.to_string(),
                reason: "outside supported range",
                constraint: format!("must be between {MIN_WORKER_BITS} and {MAX_WORKER_BITS}"),
            });
        }
        if self.sequence_bits < MIN_SEQUENCE_BITS || self.sequence_bits > MAX_SEQUENCE_BITS {
            return Err(Error::Configuration {
                field: "sequence_bits",
                value: self.sequence_bits.to_string(),
                reason: "outside supported range",
                constraint: format!("must be between {MIN_SEQUENCE_BITS} and {MAX_SEQUENCE_BITS}"),
            });
        }
        let ms = self.time_unit.as_millis();
        if ms == 0 || self.time_unit != Duration::from_millis(ms as u64) {
            return Err(Error::Configuration {
                field: "time_unit",
                value: format!("{:?}", self.time_unit),
                reason: "must be a whole positive number of milliseconds",
                constraint: "at least 1ms, millisecond granularity".to_string(),
            });
        }
        Ok(())
    }

    /// Check a worker identity against this layout's capacity.
    pub fn validate_worker_id(&self, worker_id: u32) -> Result<(), Error> {
        let max_worker = self.shifts().max_worker;
        if worker_id as i64 > max_worker {
            return Err(Error::Configuration {
                field: "worker_id",
                value: worker_id.to_string(),
                reason: "out of valid range for layout",
                constraint: format!(
                    "must be between 0 and {max_worker} ({} bits)",
                    self.worker_bits
                ),
            });
        }
        Ok(())
    }

    /// Derived shift amounts and masks. Cached by the generator; also used
    /// by the constant-folded default-layout extraction on identifiers.
    pub const fn shifts(&self) -> LayoutShifts {
        LayoutShifts {
            timestamp_shift: (self.worker_bits + self.sequence_bits) as u32,
            worker_shift: self.sequence_bits as u32,
            max_worker: (1i64 << self.worker_bits) - 1,
            max_sequence: (1i64 << self.sequence_bits) - 1,
        }
    }

    /// Right-shift amount converting milliseconds to time units, or `None`
    /// when the unit is not a power of two and division must be used.
    ///
    /// 1ms maps to `Some(0)`, 2ms to `Some(1)`, 8ms to `Some(3)`; 10ms maps
    /// to `None`.
    pub const fn time_unit_shift(&self) -> Option<u32> {
        let ms = self.time_unit.as_millis() as i64;
        if ms > 0 && ms & (ms - 1) == 0 {
            Some(ms.trailing_zeros())
        } else {
            None
        }
    }

    /// The time unit in whole milliseconds.
    pub(crate) const fn time_unit_ms(&self) -> i64 {
        self.time_unit.as_millis() as i64
    }

    /// Project the theoretical capacity of this layout.
    pub fn capacity(&self) -> LayoutCapacity {
        let max_workers = 1u64 << self.worker_bits;
        let max_sequence = 1u64 << self.sequence_bits;
        let max_timestamp = 1u64 << self.timestamp_bits;

        // Computed in floating-point seconds first: 2^42 time units of even
        // 1ms would overflow nanosecond arithmetic long before Duration does.
        let total_seconds = max_timestamp as f64 * self.time_unit.as_secs_f64();
        let lifespan = Duration::try_from_secs_f64(total_seconds).unwrap_or(Duration::MAX);

        let throughput_per_worker = (max_sequence as f64 / self.time_unit.as_secs_f64()) as u64;

        LayoutCapacity {
            max_workers,
            max_sequence,
            max_timestamp,
            lifespan,
            throughput_per_worker,
            total_throughput: throughput_per_worker * max_workers,
            time_unit: self.time_unit,
        }
    }
}

impl Default for BitLayout {
    fn default() -> Self {
        BitLayout::DEFAULT
    }
}

/// Pre-computed shift amounts and component masks for a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutShifts {
    /// Bits to shift the timestamp left (worker bits + sequence bits).
    pub timestamp_shift: u32,
    /// Bits to shift the worker identity left (sequence bits).
    pub worker_shift: u32,
    /// Mask for the worker field: `2^worker_bits - 1`.
    pub max_worker: i64,
    /// Mask for the sequence field: `2^sequence_bits - 1`.
    pub max_sequence: i64,
}

/// Theoretical capacity figures for a layout, for deployment planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutCapacity {
    /// Number of distinct worker identities.
    pub max_workers: u64,
    /// Identifiers per worker per time unit.
    pub max_sequence: u64,
    /// Time-unit count before the timestamp field overflows.
    pub max_timestamp: u64,
    /// Wall-clock span from epoch to timestamp overflow.
    pub lifespan: Duration,
    /// Identifiers per second a single worker can emit.
    pub throughput_per_worker: u64,
    /// Identifiers per second across all workers.
    pub total_throughput: u64,
    /// Echo of the layout's time unit.
    pub time_unit: Duration,
}

impl fmt::Display for LayoutCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let years = self.lifespan.as_secs() / (365 * 24 * 3600);
        write!(
            f,
            "MaxWorkers: {}, ThroughputPerWorker: {}/sec, Lifespan: {} years, TimeUnit: {:?}",
            self.max_workers, self.throughput_per_worker, years, self.time_unit
        )
    }
}

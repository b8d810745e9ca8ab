//! Layout validation, derived constants and capacity projection.

use std::time::Duration;

use crate::{BitLayout, Error};

#[test]
fn presets_validate() {
    for layout in BitLayout::PRESETS {
        layout.validate().unwrap();
        let total = layout.timestamp_bits + layout.worker_bits + layout.sequence_bits;
        assert_eq!(total, 63);
    }
}

#[test]
fn rejects_wrong_sum() {
    let layout = BitLayout::new(41, 10, 11, Duration::from_millis(1));
    match layout.validate() {
        Err(Error::Configuration { field, .. }) => assert_eq!(field, "layout"),
        other => panic!("expected configuration error, got {other:?}"),
    }

    // One bit over.
    let layout = BitLayout::new(41, 11, 12, Duration::from_millis(1));
    assert!(layout.validate().is_err());
}

#[test]
fn rejects_fields_outside_ranges() {
    // Each layout sums to 63 with the other two fields in range, isolating
    // the out-of-range field.
    let cases = [
        (BitLayout::new(37, 12, 14, Duration::from_millis(1)), "timestamp_bits"),
        (BitLayout::new(43, 14, 6, Duration::from_millis(1)), "timestamp_bits"),
        (BitLayout::new(42, 7, 14, Duration::from_millis(1)), "worker_bits"),
        (BitLayout::new(38, 19, 6, Duration::from_millis(1)), "worker_bits"),
        (BitLayout::new(40, 18, 5, Duration::from_millis(1)), "sequence_bits"),
        (BitLayout::new(38, 10, 15, Duration::from_millis(1)), "sequence_bits"),
    ];
    for (layout, expected_field) in cases {
        match layout.validate() {
            Err(Error::Configuration { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected {expected_field} rejection, got {other:?}"),
        }
    }
}

#[test]
fn rejects_bad_time_units() {
    let zero = BitLayout::new(41, 10, 12, Duration::ZERO);
    assert!(matches!(
        zero.validate(),
        Err(Error::Configuration { field: "time_unit", .. })
    ));

    let sub_ms = BitLayout::new(41, 10, 12, Duration::from_micros(500));
    assert!(sub_ms.validate().is_err());

    let fractional = BitLayout::new(41, 10, 12, Duration::from_micros(1_500));
    assert!(fractional.validate().is_err());
}

#[test]
fn shifts_for_default_layout() {
    let shifts = BitLayout::DEFAULT.shifts();
    assert_eq!(shifts.timestamp_shift, 22);
    assert_eq!(shifts.worker_shift, 12);
    assert_eq!(shifts.max_worker, 1023);
    assert_eq!(shifts.max_sequence, 4095);
}

#[test]
fn shifts_for_sonyflake_layout() {
    let shifts = BitLayout::SONYFLAKE.shifts();
    assert_eq!(shifts.timestamp_shift, 24);
    assert_eq!(shifts.worker_shift, 8);
    assert_eq!(shifts.max_worker, 65_535);
    assert_eq!(shifts.max_sequence, 255);
}

#[test]
fn time_unit_shift_powers_of_two() {
    let unit = |ms| BitLayout::new(41, 10, 12, Duration::from_millis(ms));
    assert_eq!(unit(1).time_unit_shift(), Some(0));
    assert_eq!(unit(2).time_unit_shift(), Some(1));
    assert_eq!(unit(4).time_unit_shift(), Some(2));
    assert_eq!(unit(8).time_unit_shift(), Some(3));
    assert_eq!(unit(10).time_unit_shift(), None);
}

#[test]
fn capacity_default_layout() {
    let capacity = BitLayout::DEFAULT.capacity();
    assert_eq!(capacity.max_workers, 1_024);
    assert_eq!(capacity.max_sequence, 4_096);
    assert_eq!(capacity.max_timestamp, 1 << 41);
    assert_eq!(capacity.throughput_per_worker, 4_096_000);
    assert_eq!(capacity.time_unit, Duration::from_millis(1));

    let years = capacity.lifespan.as_secs() / (365 * 24 * 3600);
    assert_eq!(years, 69);
}

#[test]
fn capacity_sonyflake_layout() {
    let capacity = BitLayout::SONYFLAKE.capacity();
    assert_eq!(capacity.max_workers, 65_536);
    assert_eq!(capacity.throughput_per_worker, 25_600);

    let years = capacity.lifespan.as_secs() / (365 * 24 * 3600);
    assert_eq!(years, 174);
}

#[test]
fn capacity_ultimate_layout() {
    let capacity = BitLayout::ULTIMATE.capacity();
    assert_eq!(capacity.max_workers, 65_536);
    assert_eq!(capacity.throughput_per_worker, 12_800);

    let years = capacity.lifespan.as_secs() / (365 * 24 * 3600);
    assert_eq!(years, 348);
}

#[test]
fn capacity_display_summary() {
    let summary = BitLayout::DEFAULT.capacity().to_string();
    assert!(summary.contains("MaxWorkers: 1024"));
    assert!(summary.contains("ThroughputPerWorker: 4096000/sec"));
    assert!(summary.contains("Lifespan: 69 years"));
}

#[test]
fn worker_id_bounds() {
    BitLayout::DEFAULT.validate_worker_id(0).unwrap();
    BitLayout::DEFAULT.validate_worker_id(1023).unwrap();
    assert!(matches!(
        BitLayout::DEFAULT.validate_worker_id(1024),
        Err(Error::Configuration { field: "worker_id", .. })
    ));

    BitLayout::SONYFLAKE.validate_worker_id(65_535).unwrap();
    assert!(BitLayout::SONYFLAKE.validate_worker_id(65_536).is_err());
}

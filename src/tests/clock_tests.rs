//! Clock-regression handling, cancellation, and sequence-overflow recovery.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::tests::test_utils::assert_unique_and_increasing;
use crate::{BitLayout, CancelToken, Config, Error, Generator};

/// Push `last_time_unit` ahead of the clock by `units`, simulating a clock
/// that moved backward after the last emission.
fn regress_clock(generator: &Generator, units: i64) -> i64 {
    let mut state = generator.state.lock().unwrap();
    state.last_time_unit += units;
    state.last_time_unit
}

#[test]
fn drift_within_tolerance_waits_and_recovers() {
    let config = Config::builder()
        .worker_id(1)
        .max_clock_backward(Duration::from_millis(100))
        .build();
    let generator = Generator::with_config(config).unwrap();

    let first = generator.generate().unwrap();
    regress_clock(&generator, 40);

    let start = Instant::now();
    let second = generator.generate().unwrap();
    let elapsed = start.elapsed();

    assert!(second > first);
    assert!(
        elapsed >= Duration::from_millis(25),
        "recovered too fast to have waited the drift out: {elapsed:?}"
    );

    let metrics = generator.metrics();
    assert!(metrics.clock_backward >= 1);
    assert_eq!(metrics.clock_backward_err, 0);
    assert!(metrics.wait_time_us > 0);
}

#[test]
fn drift_beyond_tolerance_fails() {
    let generator = Generator::new(5).unwrap();
    generator.generate().unwrap();
    regress_clock(&generator, 10_000);

    match generator.generate() {
        Err(Error::ClockRegressed {
            drift_ms,
            tolerance_ms,
            worker_id,
            recovered,
            current_ms,
            last_ms,
        }) => {
            assert!(drift_ms > 9_000 && drift_ms <= 10_000, "drift {drift_ms}");
            assert_eq!(tolerance_ms, 5);
            assert_eq!(worker_id, 5);
            assert!(!recovered);
            assert_eq!(last_ms - current_ms, drift_ms);
        }
        other => panic!("expected ClockRegressed, got {other:?}"),
    }

    let metrics = generator.metrics();
    assert!(metrics.clock_backward >= 1);
    assert!(metrics.clock_backward_err >= 1);
}

#[test]
fn cancellation_aborts_drift_wait() {
    let config = Config::builder()
        .worker_id(2)
        .max_clock_backward(Duration::from_secs(10))
        .build();
    let generator = Arc::new(Generator::with_config(config).unwrap());
    generator.generate().unwrap();
    let regressed_to = regress_clock(&generator, 5_000);

    let token = CancelToken::new();
    let canceller = {
        let token = token.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            token.cancel();
        })
    };

    let start = Instant::now();
    let result = generator.generate_with_cancel(&token);
    canceller.join().unwrap();

    assert_eq!(result, Err(Error::Canceled));
    assert!(
        start.elapsed() < Duration::from_secs(2),
        "cancellation was not prompt"
    );

    // A canceled wait must not have touched the emission state.
    assert_eq!(
        generator.state.lock().unwrap().last_time_unit,
        regressed_to
    );
}

#[test]
fn sequence_overflow_recovers_with_unique_identifiers() {
    // 6 sequence bits at 10ms: 64 identifiers per unit, so 200 emissions
    // overflow several times.
    let config = Config::builder()
        .worker_id(1)
        .layout(BitLayout::MEGA_SCALE)
        .build();
    let generator = Generator::with_config(config).unwrap();

    let ids: Vec<_> = (0..200).map(|_| generator.generate().unwrap()).collect();
    assert_unique_and_increasing(&ids, 200);

    let metrics = generator.metrics();
    assert!(metrics.sequence_overflow >= 1);
    assert!(metrics.wait_time_us > 0);
}

#[test]
fn lock_poisoning_surfaces_as_error() {
    let generator = Arc::new(Generator::new(8).unwrap());

    let poisoner = {
        let generator = Arc::clone(&generator);
        thread::spawn(move || {
            let _guard = generator.state.lock().unwrap();
            panic!("poison the emission lock");
        })
    };
    assert!(poisoner.join().is_err());

    assert_eq!(generator.generate(), Err(Error::LockPoisoned));
}

//! Configuration defaults, builder and validation.

use std::time::Duration;

use crate::{BitLayout, Config, Error, Generator, DEFAULT_EPOCH_MS, DEFAULT_MAX_CLOCK_BACKWARD};

#[test]
fn defaults() {
    let config = Config::new(5);
    assert_eq!(config.worker_id, 5);
    assert_eq!(config.epoch_ms, DEFAULT_EPOCH_MS);
    assert_eq!(config.max_clock_backward, DEFAULT_MAX_CLOCK_BACKWARD);
    assert!(config.enable_metrics);
    assert_eq!(config.layout, BitLayout::DEFAULT);
}

#[test]
fn builder_sets_every_field() {
    let config = Config::builder()
        .worker_id(12)
        .epoch(1_640_995_200_000)
        .max_clock_backward(Duration::from_millis(10))
        .enable_metrics(false)
        .layout(BitLayout::SUPERIOR)
        .build();

    assert_eq!(config.worker_id, 12);
    assert_eq!(config.epoch_ms, 1_640_995_200_000);
    assert_eq!(config.max_clock_backward, Duration::from_millis(10));
    assert!(!config.enable_metrics);
    assert_eq!(config.layout, BitLayout::SUPERIOR);
}

#[test]
fn rejects_worker_over_layout_capacity() {
    match Generator::new(1024) {
        Err(Error::Configuration { field, value, .. }) => {
            assert_eq!(field, "worker_id");
            assert_eq!(value, "1024");
        }
        other => panic!("expected worker_id rejection, got {other:?}"),
    }

    // A wider worker field admits the same identity.
    let config = Config::builder()
        .worker_id(1024)
        .layout(BitLayout::SUPERIOR)
        .build();
    assert!(Generator::with_config(config).is_ok());
}

#[test]
fn rejects_non_positive_epoch() {
    for epoch in [0i64, -1, -1_704_067_200_000] {
        let config = Config::builder().epoch(epoch).build();
        match Generator::with_config(config) {
            Err(Error::Configuration { field, .. }) => assert_eq!(field, "epoch_ms"),
            other => panic!("expected epoch rejection, got {other:?}"),
        }
    }
}

#[test]
fn rejects_future_epoch() {
    let far_future = DEFAULT_EPOCH_MS + 200 * 365 * 24 * 3600 * 1000;
    let config = Config::builder().epoch(far_future).build();
    match Generator::with_config(config) {
        Err(Error::Configuration { field, reason, .. }) => {
            assert_eq!(field, "epoch_ms");
            assert_eq!(reason, "ahead of current time");
        }
        other => panic!("expected future-epoch rejection, got {other:?}"),
    }
}

#[test]
fn zero_layout_resolves_to_default() {
    let config = Config {
        layout: BitLayout::new(0, 0, 0, Duration::ZERO),
        ..Config::new(7)
    };
    let generator = Generator::with_config(config).unwrap();
    assert_eq!(generator.layout(), BitLayout::DEFAULT);

    let id = generator.generate().unwrap();
    assert_eq!(id.worker(), 7);
}

#[test]
fn rejects_invalid_layout_through_config() {
    let config = Config::builder()
        .layout(BitLayout::new(41, 10, 11, Duration::from_millis(1)))
        .build();
    assert!(Generator::with_config(config).is_err());
}

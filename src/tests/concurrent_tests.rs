//! Uniqueness and disjointness under parallel emission.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use crate::tests::test_utils::{assert_strictly_increasing, assert_unique};
use crate::{FlakeId, Generator};

fn emit_from_threads(generator: Arc<Generator>, threads: usize, per_thread: usize) -> Vec<FlakeId> {
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let generator = Arc::clone(&generator);
            thread::spawn(move || {
                (0..per_thread)
                    .map(|_| generator.generate().unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut all = Vec::with_capacity(threads * per_thread);
    for handle in handles {
        all.extend(handle.join().unwrap());
    }
    all
}

#[test]
fn unique_single_thread() {
    let generator = Arc::new(Generator::new(1).unwrap());
    let ids = emit_from_threads(generator, 1, 100_000);
    assert_unique(&ids, 100_000);
}

#[test]
fn unique_ten_threads() {
    let generator = Arc::new(Generator::new(2).unwrap());
    let ids = emit_from_threads(generator, 10, 10_000);
    assert_unique(&ids, 100_000);
}

#[test]
fn unique_hundred_threads() {
    let generator = Arc::new(Generator::new(3).unwrap());
    let ids = emit_from_threads(generator, 100, 1_000);
    assert_unique(&ids, 100_000);
}

#[test]
fn per_thread_views_are_increasing() {
    let generator = Arc::new(Generator::new(4).unwrap());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let generator = Arc::clone(&generator);
            thread::spawn(move || {
                let ids: Vec<_> = (0..2_000).map(|_| generator.generate().unwrap()).collect();
                assert_strictly_increasing(&ids);
                ids
            })
        })
        .collect();

    let mut all = Vec::new();
    for handle in handles {
        all.extend(handle.join().unwrap());
    }
    assert_unique(&all, 16_000);
}

#[test]
fn distinct_workers_never_collide() {
    let workers = [10u32, 11, 12, 13];
    let handles: Vec<_> = workers
        .iter()
        .map(|&worker| {
            thread::spawn(move || {
                let generator = Generator::new(worker).unwrap();
                let ids: Vec<_> = (0..5_000).map(|_| generator.generate().unwrap()).collect();
                for id in &ids {
                    assert_eq!(id.worker(), worker);
                }
                ids
            })
        })
        .collect();

    let mut union = HashSet::new();
    let mut total = 0usize;
    for handle in handles {
        let ids = handle.join().unwrap();
        total += ids.len();
        union.extend(ids);
    }
    assert_eq!(union.len(), total, "cross-worker duplicate detected");
}

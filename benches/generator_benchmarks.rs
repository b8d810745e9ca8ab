use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use flakeid::{BitLayout, Config, Generator};

pub fn single_generation(c: &mut Criterion) {
    let generator = Generator::new(1).unwrap();
    c.bench_function("generate", |b| {
        b.iter(|| black_box(generator.generate().unwrap()));
    });
}

pub fn batch_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Batch Generation");
    for &size in &[100usize, 1_000, 4_096] {
        group.bench_function(format!("batch_{size}"), |b| {
            let generator = Generator::new(1).unwrap();
            b.iter(|| black_box(generator.generate_batch(size).unwrap()));
        });
    }
    group.finish();
}

pub fn layout_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("Layout Comparison");

    let layouts = [
        ("default_41_10_12", BitLayout::DEFAULT),
        ("superior_40_14_9", BitLayout::SUPERIOR),
        ("ultra_39_15_9", BitLayout::ULTRA),
        ("long_life_42_12_9", BitLayout::LONG_LIFE),
    ];

    for (name, layout) in layouts {
        let config = Config::builder().worker_id(1).layout(layout).build();
        let generator = Generator::with_config(config).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| black_box(generator.generate().unwrap()));
        });
    }
    group.finish();
}

pub fn metrics_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("Metrics Overhead");

    for (name, enabled) in [("metrics_on", true), ("metrics_off", false)] {
        let config = Config::builder().worker_id(1).enable_metrics(enabled).build();
        let generator = Generator::with_config(config).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| black_box(generator.generate().unwrap()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    single_generation,
    batch_generation,
    layout_comparison,
    metrics_overhead
);
criterion_main!(benches);

//! Criterion benchmarks for combogen hot paths.
//!
//! Benchmarks:
//! 1. cost_of — the allocation-free per-index evaluation
//! 2. decode — full combination materialization
//! 3. Full scan — spend-band filtered search over a mid-sized space

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use combogen_core::domain::Instrument;
use combogen_core::engine::{CombinationSearch, SearchSpace};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_space(prices: &[f64], cash_cents: u64) -> SearchSpace {
    let instruments = prices
        .iter()
        .enumerate()
        .map(|(i, &p)| Instrument::new(&format!("S{i}"), p).unwrap())
        .collect();
    SearchSpace::new(instruments, cash_cents).unwrap()
}

fn bench_cost_of(c: &mut Criterion) {
    // Four instruments, ~5M combinations.
    let space = make_space(&[12.5, 47.0, 93.25, 151.0], 250_000);
    let n = space.total_combinations();

    c.bench_function("cost_of_100k", |b| {
        b.iter(|| {
            let mut acc: u64 = 0;
            for id in 0..100_000u64.min(n) {
                acc = acc.wrapping_add(space.cost_of(black_box(id)));
            }
            acc
        })
    });
}

fn bench_decode(c: &mut Criterion) {
    let space = make_space(&[12.5, 47.0, 93.25, 151.0], 250_000);
    let n = space.total_combinations();

    c.bench_function("decode_10k", |b| {
        b.iter(|| {
            let mut total: u64 = 0;
            for id in 0..10_000u64.min(n) {
                total = total.wrapping_add(space.decode(black_box(id)).total_cost_cents());
            }
            total
        })
    });
}

fn bench_search(c: &mut Criterion) {
    // Three instruments, ~1M combinations, spend band keeps the output
    // small while the full range is still scanned.
    let space = make_space(&[99.0, 101.0, 103.0], 1_000_000);

    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    group.bench_function("parallel_1m", |b| {
        b.iter(|| CombinationSearch::new(black_box(&space)).run())
    });
    group.bench_function("serial_1m", |b| {
        b.iter(|| {
            CombinationSearch::new(black_box(&space))
                .with_parallelism(false)
                .run()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_cost_of, bench_decode, bench_search);
criterion_main!(benches);

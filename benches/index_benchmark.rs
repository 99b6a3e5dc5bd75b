//! Strategy comparison benchmarks.
//!
//! Measures the workloads the two strategies trade off against each other:
//! query-heavy scans after a single edit, interleaved edit/query loops, and
//! interior inserts.
//!
//! Run with: cargo bench --bench index_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use cumulative_index::index::{CumulativeIndex, Strategy};
use cumulative_index::model::{Sum, Weight};

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

/// Deterministic line-length-like weights, with some empty lines.
fn weights(n: usize) -> Vec<Weight> {
    (0..n)
        .map(|i| match i % 7 {
            0 => 0,
            k => (i as Weight).wrapping_mul(2_654_435_761) % 120 + k as Weight,
        })
        .collect()
}

/// Edit near the front, then scan `index_of` over the whole range.
fn bench_edit_then_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_then_scan");
    for &n in &SIZES {
        for strategy in Strategy::ALL {
            group.bench_with_input(BenchmarkId::new(strategy.name(), n), &n, |b, &n| {
                b.iter_batched(
                    || strategy.build(weights(n)),
                    |mut index| {
                        index.set_value(1, 99).ok();
                        let total = index.total_sum();
                        let step = (total / 256).max(1);
                        let mut sum: Sum = 0;
                        while sum < total {
                            black_box(index.index_of(sum).ok());
                            sum += step;
                        }
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }
    group.finish();
}

/// Alternate a point edit with a prefix query, walking front to back.
fn bench_interleaved_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("interleaved_edits");
    for &n in &SIZES {
        for strategy in Strategy::ALL {
            group.bench_with_input(BenchmarkId::new(strategy.name(), n), &n, |b, &n| {
                b.iter_batched(
                    || strategy.build(weights(n)),
                    |mut index| {
                        for i in (0..n).step_by((n / 128).max(1)) {
                            index.set_value(i, (i % 50) as Weight).ok();
                            black_box(index.prefix_sum(n - i).ok());
                        }
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }
    group.finish();
}

/// Insert blocks in the middle, querying the total after each.
fn bench_interior_inserts(c: &mut Criterion) {
    let mut group = c.benchmark_group("interior_inserts");
    let block: Vec<Weight> = weights(16);
    for &n in &SIZES {
        for strategy in Strategy::ALL {
            group.bench_with_input(BenchmarkId::new(strategy.name(), n), &n, |b, &n| {
                b.iter_batched(
                    || strategy.build(weights(n)),
                    |mut index: Box<dyn CumulativeIndex>| {
                        for _ in 0..32 {
                            let mid = index.len() / 2;
                            index.insert_values(mid, &block).ok();
                            black_box(index.total_sum());
                        }
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_edit_then_scan,
    bench_interleaved_edits,
    bench_interior_inserts
);
criterion_main!(benches);

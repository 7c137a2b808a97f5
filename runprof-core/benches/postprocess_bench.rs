//! Benchmarks for the alignment/aggregation pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use runprof_core::{postprocess, split_table, ColumnLayout, PostprocessConfig, RunRecord, Sample};

/// Synthetic run: geometric descent from 100 to below 1e-8 over `n` samples.
fn synthetic_run(n: usize, stride: f64) -> RunRecord {
    let samples = (0..n)
        .map(|i| Sample {
            evals: (i + 1) as f64 * stride,
            value: 100.0 * 10f64.powf(-10.0 * i as f64 / n as f64),
        })
        .collect();
    RunRecord::new(samples).expect("non-empty")
}

fn bench_postprocess(c: &mut Criterion) {
    let cfg = PostprocessConfig::default();
    c.bench_function("postprocess_15_runs_1000_samples", |b| {
        b.iter(|| {
            let runs: Vec<RunRecord> = (0..15)
                .map(|i| synthetic_run(1000, 3.0 + i as f64 * 0.25))
                .collect();
            postprocess(black_box(runs), 1e-8, 1e7, &cfg).unwrap()
        })
    });
}

fn bench_split(c: &mut Criterion) {
    // 20 restarts concatenated into one table.
    let mut table = Vec::new();
    for _ in 0..20 {
        for i in 0..500 {
            table.push(vec![(i + 1) as f64, 0.0, 100.0 / (i + 1) as f64]);
        }
    }
    c.bench_function("split_20_restarts_10k_rows", |b| {
        b.iter(|| split_table(black_box(&table), ColumnLayout::default(), "bench").unwrap())
    });
}

criterion_group!(benches, bench_postprocess, bench_split);
criterion_main!(benches);

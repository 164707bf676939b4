use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use quant_engine_core::{Engine, FracDiffParams};
use std::hint::black_box;

fn price_path(n: usize) -> Vec<f64> {
    let mut level = 100.0;
    (0..n)
        .map(|i| {
            level += (i as f64 * 0.37).sin();
            level
        })
        .collect()
}

fn bench_volatility(c: &mut Criterion) {
    let prices = price_path(1_000_000);
    let mut group = c.benchmark_group("rolling_volatility_1m_w100");
    for workers in [1usize, 4] {
        let engine = Engine::with_workers(workers).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(workers), &prices, |b, p| {
            b.iter(|| {
                let out = engine.rolling_volatility(p, 100).unwrap();
                black_box(out.len());
            })
        });
    }
    group.finish();
}

fn bench_frac_diff(c: &mut Criterion) {
    let prices = price_path(1_000_000);
    let params = FracDiffParams::new(0.4, 1e-4);
    let mut group = c.benchmark_group("fractional_diff_1m_d04");
    for workers in [1usize, 4] {
        let engine = Engine::with_workers(workers).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(workers), &prices, |b, p| {
            b.iter(|| {
                let out = engine.fractional_diff(p, &params).unwrap();
                black_box(out.len());
            })
        });
    }
    group.finish();
}

fn bench_weights(c: &mut Criterion) {
    let engine = Engine::default();
    c.bench_function("ffd_weights_d04_1e-5", |b| {
        b.iter(|| {
            let w = engine.ffd_weights(&FracDiffParams::new(0.4, 1e-5)).unwrap();
            black_box(w.len());
        })
    });
}

criterion_group!(benches, bench_volatility, bench_frac_diff, bench_weights);
criterion_main!(benches);

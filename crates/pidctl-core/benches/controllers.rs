//! Benchmarks for controllers and smoothers
//!
//! Run with: cargo bench --bench controllers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pidctl_core::control::{Pd, PdConfig, Pid, PidConfig, PidWindowed, PidWindowedConfig};
use pidctl_core::math::{MeanSmoother, MedianSmoother, Smoother};

/// Benchmark a single controller update
fn bench_controller_feedback(c: &mut Criterion) {
    let mut group = c.benchmark_group("Controller");

    group.bench_function("PD feedback", |b| {
        let mut pd = Pd::new(PdConfig::new(1.0, 10.0, 0.5));
        b.iter(|| black_box(pd.feedback(black_box(0.5))))
    });

    group.bench_function("PID feedback", |b| {
        let mut pid = Pid::new(PidConfig::new(1.0, 10.0, 0.5, 1.0));
        b.iter(|| black_box(pid.feedback(black_box(0.5))))
    });

    group.bench_function("PID feedback saturated", |b| {
        let config = PidConfig::new(1.0, 10.0, 0.5, 1.0).with_integral_limits(-50.0, 50.0);
        let mut pid = Pid::new(config);
        b.iter(|| black_box(pid.feedback(black_box(0.5))))
    });

    group.finish();
}

/// Benchmark the windowed integral for different window lengths
fn bench_windowed(c: &mut Criterion) {
    let mut group = c.benchmark_group("PID Windowed");

    for i_len in [10usize, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("feedback", i_len), i_len, |b, &i_len| {
            let config = PidWindowedConfig::new(1.0, 10.0, 0.5, 1.0).with_window(i_len);
            let mut pid = PidWindowed::new(config);
            // Fill the window so every iteration evicts
            for _ in 0..i_len {
                pid.feedback(0.5);
            }
            b.iter(|| black_box(pid.feedback(black_box(0.5))))
        });
    }

    group.finish();
}

/// Benchmark controller sequences with reset between episodes
fn bench_episode(c: &mut Criterion) {
    let mut group = c.benchmark_group("Episode");

    for n in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("updates", n), n, |b, &n| {
            let mut pid = Pid::new(PidConfig::new(1.0, 10.0, 0.5, 1.0));

            b.iter(|| {
                for i in 0..n {
                    // Simulate a measurement converging on the reference
                    let measurement = 1.0 - (-0.1 * i as f64).exp();
                    black_box(pid.feedback(measurement));
                }
                pid.reset();
            })
        });
    }

    group.finish();
}

/// Benchmark smoother updates
fn bench_smoothers(c: &mut Criterion) {
    let mut group = c.benchmark_group("Smoother");

    group.bench_function("mean feed", |b| {
        let mut mean = MeanSmoother::new(0.1);
        b.iter(|| black_box(mean.feed(black_box(1.0))))
    });

    for h in [5usize, 21, 101].iter() {
        group.bench_with_input(BenchmarkId::new("median feed", h), h, |b, &h| {
            let mut median = MedianSmoother::new(h);
            let mut x = 0.0f64;
            b.iter(|| {
                x += 0.37;
                black_box(median.feed(x.sin()))
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_controller_feedback,
    bench_windowed,
    bench_episode,
    bench_smoothers,
);
criterion_main!(benches);

//! Criterion benchmarks for the spectral energy pipeline
//!
//! Run with: cargo bench -p fastfft-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fastfft::{SpectrumConfig, SpectrumContext, WindowKind, FFT_SIZE};
use std::f32::consts::PI;

/// Two tones plus a little deterministic hash noise
fn generate_block() -> Vec<i16> {
    (0..FFT_SIZE)
        .map(|n| {
            let t = n as f32 / FFT_SIZE as f32;
            let tone = 9000.0 * (2.0 * PI * 17.0 * t).sin() + 4000.0 * (2.0 * PI * 83.0 * t).sin();
            let hash = ((n as u32).wrapping_mul(2_654_435_761) >> 22) as f32 - 512.0;
            (tone + hash) as i16
        })
        .collect()
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute");
    let block = generate_block();

    for window in [WindowKind::None, WindowKind::Hann, WindowKind::Hamming] {
        let mut ctx = SpectrumContext::new(SpectrumConfig::default()).unwrap();
        // Warm the plan and window cache so only the steady state is measured
        ctx.compute(&block, window).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{window:?}")),
            &block,
            |b, block| b.iter(|| ctx.compute(black_box(block), window).map(|out| out[1])),
        );
    }

    group.finish();
}

fn bench_first_call(c: &mut Criterion) {
    let block = generate_block();

    c.bench_function("first_call_hann", |b| {
        b.iter(|| {
            let mut ctx = SpectrumContext::new(SpectrumConfig::default()).unwrap();
            ctx.compute_owned(black_box(&block), WindowKind::Hann)
        })
    });
}

criterion_group!(benches, bench_compute, bench_first_call);
criterion_main!(benches);

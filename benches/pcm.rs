use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dsp_core::pcm::{f32_to_s16_dithered, float_to_s16, float_to_s32, s16_to_float};
use std::hint::black_box;

pub fn conversion_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("PCM Conversion");

    for &len in &[256usize, 1024, 4096, 16384] {
        group.bench_with_input(BenchmarkId::new("float_to_s16", len), &len, |b, &len| {
            let input: Vec<f32> = (0..len).map(|i| (i as f32 * 0.001).sin()).collect();
            let mut output = vec![0i16; len];
            b.iter(|| {
                float_to_s16(black_box(&input), &mut output);
            });
        });

        group.bench_with_input(BenchmarkId::new("s16_to_float", len), &len, |b, &len| {
            let input: Vec<i16> = (0..len).map(|i| ((i * 37) % 30000) as i16 - 15000).collect();
            let mut output = vec![0.0f32; len];
            b.iter(|| {
                s16_to_float(black_box(&input), &mut output);
            });
        });

        group.bench_with_input(BenchmarkId::new("float_to_s32", len), &len, |b, &len| {
            let input: Vec<f32> = (0..len).map(|i| (i as f32 * 0.001).cos()).collect();
            let mut output = vec![0i32; len];
            b.iter(|| {
                float_to_s32(black_box(&input), &mut output);
            });
        });
    }

    group.finish();
}

pub fn dithered_conversion_benchmark(c: &mut Criterion) {
    let len = 4096;
    let input: Vec<f32> = (0..len).map(|i| (i as f32 * 0.001).sin()).collect();
    let mut output = vec![0i16; len];

    c.bench_function("float_to_s16_dithered_4096", |b| {
        b.iter(|| {
            f32_to_s16_dithered(black_box(&input), &mut output, 12345);
        });
    });
}

criterion_group!(benches, conversion_benchmarks, dithered_conversion_benchmark);
criterion_main!(benches);

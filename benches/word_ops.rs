//! Word kernel benchmarks
//!
//! Compares every supported vector width against the scalar path, plus
//! Marvin throughput over the same buffer sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use unmanaged_core::hash::hash32;
use unmanaged_core::{SimdLevel, WordOps};

const LEVELS: [SimdLevel; 5] = [
    SimdLevel::Scalar,
    SimdLevel::Sse2,
    SimdLevel::Avx2,
    SimdLevel::Avx512,
    SimdLevel::Neon,
];

fn words(n: usize, seed: u32) -> Vec<u32> {
    (0..n as u32).map(|i| i.wrapping_mul(0x9E37_79B9) ^ seed).collect()
}

fn bench_binary_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("word_xor");

    for size in [7usize, 64, 1024, 16 * 1024] {
        group.throughput(Throughput::Bytes((size * 4) as u64));
        let src = words(size, 0xA5A5_A5A5);

        for level in LEVELS {
            let Ok(ops) = WordOps::with_level(level) else {
                continue;
            };
            group.bench_with_input(BenchmarkId::new(level.name(), size), &size, |b, &size| {
                let mut dst = words(size, 1);
                b.iter(|| {
                    ops.xor(black_box(&mut dst), black_box(&src));
                });
            });
        }
    }

    group.finish();
}

fn bench_pop_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("word_pop_count");

    for size in [64usize, 4096] {
        let data = words(size, 7);
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| WordOps::active().pop_count(black_box(data)));
        });
    }

    group.finish();
}

fn bench_marvin(c: &mut Criterion) {
    let mut group = c.benchmark_group("marvin32");

    for size in [8usize, 64, 1024] {
        group.throughput(Throughput::Bytes(size as u64));
        let data: Vec<u8> = (0..size).map(|i| i as u8).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| hash32(black_box(data), 0x004f_b61a_001b_dbcc));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_binary_ops, bench_pop_count, bench_marvin);
criterion_main!(benches);

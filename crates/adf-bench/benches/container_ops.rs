//! Criterion benchmarks for whole-container marshal, unmarshal and sizing.

use std::hint::black_box;

use adf_bench::{reference_profile, stress_profile};
use adf_format::Adf;
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_size_bytes(c: &mut Criterion) {
    let adf = reference_profile(42);
    c.bench_function("container_size_bytes", |b| {
        b.iter(|| black_box(adf.size_bytes()));
    });
}

fn bench_marshal(c: &mut Criterion) {
    let reference = reference_profile(42);
    let stress = stress_profile(42);

    c.bench_function("container_marshal_reference", |b| {
        b.iter(|| black_box(reference.marshal().unwrap()));
    });
    c.bench_function("container_marshal_stress", |b| {
        b.iter(|| black_box(stress.marshal().unwrap()));
    });
}

fn bench_unmarshal(c: &mut Criterion) {
    let bytes = stress_profile(42).marshal().unwrap();
    c.bench_function("container_unmarshal_stress", |b| {
        b.iter(|| black_box(Adf::unmarshal(&bytes).unwrap()));
    });
}

fn bench_update_period(c: &mut Criterion) {
    let adf = reference_profile(42);
    let replacement = adf.series()[0].clone();
    let mid = adf.coverage_secs() / 2;

    c.bench_function("container_update_period", |b| {
        b.iter(|| {
            let mut probe = adf.clone();
            probe.update_period(replacement.clone(), mid).unwrap();
            black_box(probe.series_count());
        });
    });
}

criterion_group!(
    benches,
    bench_size_bytes,
    bench_marshal,
    bench_unmarshal,
    bench_update_period
);
criterion_main!(benches);

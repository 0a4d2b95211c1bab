//! Benchmarks for the ROC sweep, kernels and the built-in backend

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use svm_session::{
    Backend, DenseFeatures, EvaluationReport, Kernel, LightBackend, LinearKernel, Matrix,
    RBFKernel, RocCurve,
};

/// Deterministic scores with interleaved labels
fn scored(n: usize) -> (Vec<f64>, Vec<i32>) {
    let scores = (0..n).map(|i| ((i * 7919) % 1000) as f64 / 500.0 - 1.0).collect();
    let labels = (0..n).map(|i| if (i * 31) % 3 == 0 { -1 } else { 1 }).collect();
    (scores, labels)
}

fn bench_roc_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("roc_sweep");

    for size in [100, 1_000, 10_000].iter() {
        let (scores, labels) = scored(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| RocCurve::compute(black_box(&scores), black_box(&labels)).unwrap());
        });
    }

    group.finish();
}

fn bench_report(c: &mut Criterion) {
    let (scores, labels) = scored(1_000);
    c.bench_function("evaluation_report_1000", |b| {
        b.iter(|| EvaluationReport::new(black_box(scores.clone()), black_box(labels.clone())).unwrap());
    });
}

fn bench_kernels(c: &mut Criterion) {
    let x: Vec<f64> = (0..256).map(|i| i as f64 / 256.0).collect();
    let y: Vec<f64> = (0..256).map(|i| 1.0 - i as f64 / 256.0).collect();
    let linear = LinearKernel::new();
    let rbf = RBFKernel::new(0.1);

    c.bench_function("linear_kernel_256", |b| {
        b.iter(|| linear.compute(black_box(&x), black_box(&y)))
    });
    c.bench_function("rbf_kernel_256", |b| {
        b.iter(|| rbf.compute(black_box(&x), black_box(&y)))
    });
}

fn bench_light_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("light_fit");

    for size in [20, 100].iter() {
        let rows = *size;
        let data: Vec<f64> = (0..rows * 2)
            .map(|i| {
                let sign = if (i / 2) % 2 == 0 { 1.0 } else { -1.0 };
                sign * (1.0 + (i % 5) as f64 / 5.0)
            })
            .collect();
        let labels: Vec<i32> = (0..rows).map(|i| if i % 2 == 0 { 1 } else { -1 }).collect();
        let features =
            DenseFeatures::new(Matrix::from_vec(rows, 2, data).unwrap(), labels).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut backend = LightBackend::new();
                backend.fit(black_box(&features)).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_roc_sweep, bench_report, bench_kernels, bench_light_fit);
criterion_main!(benches);

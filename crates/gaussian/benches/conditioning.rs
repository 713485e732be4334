use beambayes_gaussian::{condition, LinearObservation, MultivariateNormal};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};

fn prior(n: usize) -> MultivariateNormal<f64> {
    let x = Array1::linspace(0., 1., n);
    let mut cov = Array2::from_shape_fn((n, n), |(i, j)| {
        let r = (x[i] - x[j]) / 0.2;
        f64::exp(-0.5 * r * r)
    });
    cov.diag_mut().mapv_inplace(|v| v + 1e-8);
    MultivariateNormal::new(Array1::zeros(n), cov).expect("valid prior")
}

fn bench_condition(c: &mut Criterion) {
    let mut group = c.benchmark_group("condition");
    group.sample_size(20);

    for n in [50, 100, 200] {
        let mvn = prior(n);
        let m = n / 10;
        let h = Array2::from_shape_fn((m, n), |(i, j)| if j == i * 10 { 1. } else { 0. });
        let obs = LinearObservation::isotropic(h, Array1::ones(m), 1e-6).expect("valid obs");
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter(|| condition(&mvn, &obs));
        });
    }
    group.finish();
}

fn bench_load_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_sum");

    let n = 200;
    let mvn = prior(n);
    let obs = LinearObservation::scalar(Array1::ones(n), 1., 1e-7).expect("valid obs");
    group.bench_function(BenchmarkId::from_parameter(n), |b| {
        b.iter(|| condition(&mvn, &obs));
    });
    group.finish();
}

criterion_group!(benches, bench_condition, bench_load_sum);
criterion_main!(benches);

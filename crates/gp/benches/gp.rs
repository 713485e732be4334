use beambayes_gp::correlation_models::{Matern52Corr, SquaredExponentialCorr};
use beambayes_gp::mean_models::ZeroMean;
use beambayes_gp::GaussianProcessPrior;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array1;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

fn criterion_discretize(c: &mut Criterion) {
    let mut group = c.benchmark_group("discretize");
    group.sample_size(20);

    let gp = GaussianProcessPrior::<f64, ZeroMean, SquaredExponentialCorr>::params(
        ZeroMean(),
        SquaredExponentialCorr(),
    )
    .variance(101.)
    .lengthscale(0.2)
    .build()
    .expect("GP prior");
    for n in [100, 400, 800] {
        let nodes = Array1::linspace(0., 1., n);
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter(|| std::hint::black_box(gp.discretize_at(&nodes).expect("discretize")));
        });
    }
    group.finish();
}

fn criterion_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample");
    group.sample_size(10);

    let gp = GaussianProcessPrior::<f64, ZeroMean, Matern52Corr>::params(ZeroMean(), Matern52Corr())
        .lengthscale(0.2)
        .build()
        .expect("GP prior");
    let nodes = Array1::linspace(0., 1., 200).insert_axis(ndarray::Axis(1));
    let mut rng = Xoshiro256Plus::seed_from_u64(42);
    group.bench_function("matern52 200x10", |b| {
        b.iter(|| std::hint::black_box(gp.sample(&nodes, 10, &mut rng).expect("sample")));
    });
    group.finish();
}

criterion_group!(benches, criterion_discretize, criterion_sample);
criterion_main!(benches);

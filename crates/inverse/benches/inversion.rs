use beambayes_inverse::{BeamDataset, BeamInversion, InversionConfig};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};

// Clamped-free finite difference operator of the beam deflection
fn beam(n: usize) -> BeamDataset {
    let h = 1. / (n - 1) as f64;
    let k = Array2::from_shape_fn((n, n), |(i, j)| match i.abs_diff(j) {
        0 => 6. / h.powi(4),
        1 => -4. / h.powi(4),
        2 => 1. / h.powi(4),
        _ => 0.,
    });
    let observed: Vec<usize> = (1..n).step_by(n / 10).collect();
    let b = Array2::from_shape_fn((observed.len(), n), |(i, j)| {
        if observed[i] == j {
            1.
        } else {
            0.
        }
    });
    let y = Array1::from_elem(observed.len(), 1e-3);
    BeamDataset::new(Array1::linspace(0., 1., n), k, b, y, 1.).expect("beam data")
}

fn bench_inversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("inversion");
    group.sample_size(10);

    let inversion = BeamInversion::new(InversionConfig::default()).expect("config");
    for n in [51, 101, 201] {
        let data = beam(n);
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter(|| std::hint::black_box(inversion.run(&data).expect("inversion")));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_inversion);
criterion_main!(benches);

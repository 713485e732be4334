use beambayes_gp::{GaussianProcessPrior, Matern52Corr, SquaredExponentialCorr, ZeroMean};
use ndarray::{Array, Axis};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

fn main() {
    let nodes = Array::linspace(0., 1., 50).insert_axis(Axis(1));
    let mut rng = Xoshiro256Plus::seed_from_u64(42);

    let se = GaussianProcessPrior::<f64, ZeroMean, SquaredExponentialCorr>::params(
        ZeroMean(),
        SquaredExponentialCorr(),
    )
    .variance(101.)
    .lengthscale(0.2)
    .build()
    .expect("GP prior");
    let paths = se.sample(&nodes, 3, &mut rng).expect("GP sampling");
    println!("{se}\n{paths:.3}");

    let matern =
        GaussianProcessPrior::<f64, ZeroMean, Matern52Corr>::params(ZeroMean(), Matern52Corr())
            .variance(101.)
            .lengthscale(0.2)
            .build()
            .expect("GP prior");
    let paths = matern.sample(&nodes, 3, &mut rng).expect("GP sampling");
    println!("{matern}\n{paths:.3}");
}

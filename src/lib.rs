//! `beambayes` infers the distributed load acting on a cantilevered beam from a few
//! noisy deflection observations and a noisy observation of the total load.
//!
//! The problem is linear and gaussian: a Gaussian process prior over the load is
//! discretized at the nodes of a finite difference model of the beam, then conditioned
//! on the observations. The workspace is organized as follows:
//!
//! * [`gaussian`] (`beambayes-gaussian`): multivariate normal distributions, linear gaussian
//!   observations and conditioning,
//! * [`gp`] (`beambayes-gp`): Gaussian process priors, mean and correlation models,
//! * [`inverse`] (`beambayes-inverse`): beam data loading, forward operator and the inversion
//!   pipeline.
//!
//! # Example
//!
//! ```
//! use beambayes::inverse::{BeamDataset, BeamInversion, InversionConfig};
//! use ndarray::{array, Array1, Array2};
//!
//! let data = BeamDataset::new(
//!     Array1::linspace(0., 4., 5),
//!     Array2::eye(5),
//!     array![[0., 1., 0., 0., 0.], [0., 0., 0., 1., 0.]],
//!     array![0.1, -0.2],
//!     1.,
//! )
//! .expect("beam data");
//!
//! let config = InversionConfig::default().lengthscale(1.);
//! let result = BeamInversion::new(config)
//!     .expect("valid config")
//!     .run(&data)
//!     .expect("inversion");
//! println!("posterior mean: {}", result.posterior().mean());
//! ```
pub use beambayes_gaussian as gaussian;
pub use beambayes_gp as gp;
pub use beambayes_inverse as inverse;

pub use beambayes_inverse::{
    BeamDataset, BeamInversion, InversionConfig, InversionResult, KernelSpec, BEAMBAYES_LOG,
};

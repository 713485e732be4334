//! This library implements [Gaussian Process](https://en.wikipedia.org/wiki/Gaussian_process)
//! priors over functions, used as the prior knowledge of Bayesian inverse problems.
//!
//! A prior `GP(mu, sigma^2.k)` is specified by:
//! * a [mean model](mean_models) `mu(x)`,
//! * a stationary [correlation model](correlation_models) `k(x, x')` of the scaled distance
//!   `||(x - x') / l||`, `l` being the lengthscales,
//! * a process variance `sigma^2`.
//!
//! [GaussianProcessPrior] parameterized by [GpPriorParams] gives the mean and covariance of
//! the process at any set of points. Discretized on a finite set of nodes it gives a
//! [`MultivariateNormal`](beambayes_gaussian::MultivariateNormal) which can be conditioned
//! on linear observations.
//!
//! The smoothness of the correlation model is checked against a required
//! differentiability order of the sample paths (at least once differentiable by default).
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod algorithm;
pub mod correlation_models;
mod errors;
pub mod mean_models;

mod parameters;
mod utils;

pub use algorithm::*;
pub use correlation_models::*;
pub use errors::*;
pub use mean_models::*;
pub use parameters::*;
pub use utils::scaled_distances;

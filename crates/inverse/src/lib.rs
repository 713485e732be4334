//! Bayesian inference of the distributed load acting on a cantilevered beam.
//!
//! The deflection `u` of the beam under the load `m` is given by a finite difference
//! system `K.u = m`, and deflections are observed at a few nodes selected by `B`:
//!
//! ```text
//! y = B.K^-1.m + e,    e ~ N(0, sigma^2.I)
//! ```
//!
//! A Gaussian process prior over `m` is discretized at the nodes then conditioned
//! on the observed deflections `y` and on a noisy observation of the total load `1^T.m`.
//!
//! * [`BeamDataset`] loads the system matrix and the observations from an HDF5 file or a
//!   `.npz` archive,
//! * [`ForwardOperator`] computes the effective observation operator `C = B.K^-1`,
//! * [`BeamInversion`] runs the inference given an [`InversionConfig`],
//! * [`InversionResult`] holds the prior and posterior distributions and writes them
//!   as `.npy` files.
//!
//! Logging goes through the `log` facade, the `beambayes` binary initializes it from the
//! [`BEAMBAYES_LOG`] environment variable.
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod config;
mod dataset;
mod errors;
mod forward;
mod inversion;

pub use config::*;
pub use dataset::*;
pub use errors::*;
pub use forward::*;
pub use inversion::*;

/// Env variable to set the log level (e.g. `BEAMBAYES_LOG=debug`)
pub const BEAMBAYES_LOG: &str = "BEAMBAYES_LOG";

//! This library implements the finite dimensional gaussian machinery of linear
//! gaussian inverse problems:
//!
//! * [MultivariateNormal] distributions with marginals, linear transforms and sampling,
//! * [LinearObservation]s `z = H.x + e` with gaussian noise,
//! * gaussian conditioning ([condition]) of a prior on such observations,
//!   the update behind Kalman filtering and Bayesian linear regression.
//!
//! Linear algebra relies on the pure Rust [`linfa-linalg`](https://github.com/rust-ml/linfa-linalg)
//! backend: square systems are solved by QR factorization and symmetric positive
//! definite ones by Cholesky factorization with a jitter fallback ([JitterPolicy]).
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod conditioning;
mod distribution;
mod errors;
pub mod linalg;
mod observation;

pub use conditioning::*;
pub use distribution::*;
pub use errors::*;
pub use linalg::JitterPolicy;
pub use observation::*;

//! Gaussian conditioning of a [`MultivariateNormal`] prior on a [`LinearObservation`].
//!
//! Given a prior `N(mu, Sigma)` and an observation `z = H.x + e`, `e ~ N(0, Sigma_e)`,
//! the posterior is `N(mu', Sigma')` with:
//!
//! * innovation covariance `S = H.Sigma.H^T + Sigma_e`
//! * gain `G = Sigma.H^T.S^-1`
//! * `mu' = mu + G.(z - H.mu)`
//! * `Sigma' = Sigma - G.H.Sigma`
//!
//! `S` is factorized with Cholesky `S = L.L^T` and never inverted: with
//! `W = L^-1.H.Sigma` and `v = L^-1.(z - H.mu)` one gets
//! `mu' = mu + W^T.v` and `Sigma' = Sigma - W^T.W`.
//!
//! Conditioning sequentially on independent observations gives the same
//! posterior as conditioning once on the stacked observation
//! (see [`LinearObservation::stack`]).

use crate::distribution::MultivariateNormal;
use crate::errors::{GaussianError, Result};
use crate::linalg::{robust_cholesky, JitterPolicy};
use crate::observation::LinearObservation;
use linfa::Float;
use linfa_linalg::triangular::*;
use log::{debug, warn};
use ndarray::Axis;

/// Condition `prior` on `observation` using the default [`JitterPolicy`]
pub fn condition<F: Float>(
    prior: &MultivariateNormal<F>,
    observation: &LinearObservation<F>,
) -> Result<MultivariateNormal<F>> {
    condition_with(prior, observation, &JitterPolicy::default())
}

/// Condition `prior` on `observation`.
///
/// When the innovation covariance is not numerically positive definite
/// (typically noise free observations of nearly redundant quantities), the
/// Cholesky factorization is regularized according to `policy`.
/// [`GaussianError::NotPositiveDefinite`] is returned when it still fails.
pub fn condition_with<F: Float>(
    prior: &MultivariateNormal<F>,
    observation: &LinearObservation<F>,
    policy: &JitterPolicy<F>,
) -> Result<MultivariateNormal<F>> {
    if observation.state_dim() != prior.dim() {
        return Err(GaussianError::DimensionMismatch(format!(
            "observation operator has {} columns, prior dimension is {}",
            observation.state_dim(),
            prior.dim()
        )));
    }
    if observation.is_empty() {
        return Ok(prior.clone());
    }
    policy.validate()?;

    let h = observation.operator();
    let h_sigma = h.dot(prior.cov());
    let innovation_cov = h_sigma.dot(&h.t()) + observation.noise_cov();
    let (l, jitter) = robust_cholesky(&innovation_cov, policy)?;
    if jitter > F::zero() {
        warn!(
            "Innovation covariance regularized with jitter {:e} ({} observations)",
            jitter,
            observation.len()
        );
    }

    let w = l.solve_triangular(&h_sigma, UPLO::Lower)?;
    let residual = observation.residual(prior.mean()).insert_axis(Axis(1));
    let v = l.solve_triangular_into(residual, UPLO::Lower)?;

    let mean = prior.mean() + &w.t().dot(&v).remove_axis(Axis(1));
    let cov = prior.cov() - &w.t().dot(&w);
    debug!(
        "Conditioned {}-dim gaussian on {} observations",
        prior.dim(),
        observation.len()
    );
    Ok(MultivariateNormal::new_unchecked(mean, cov))
}

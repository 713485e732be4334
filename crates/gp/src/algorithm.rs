use crate::correlation_models::*;
use crate::errors::{GpError, Result};
use crate::mean_models::*;
use crate::parameters::{GpPriorParams, GpPriorValidParams};
use crate::utils::scaled_distances;

use beambayes_gaussian::MultivariateNormal;
use linfa::{Float, ParamGuard};
use log::debug;
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};
use ndarray_rand::rand::Rng;
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Gaussian process prior `f ~ GP(mu, sigma^2.k)` over functions of
/// `nx`-dimensional inputs, defined by a [mean model](MeanModel) and a
/// stationary [correlation model](CorrelationModel).
///
/// The prior is not fitted to data: it is discretized on a set of points
/// as a [`MultivariateNormal`] which can then be conditioned on observations.
///
/// # Example
///
/// ```
/// use beambayes_gp::{GaussianProcessPrior, SquaredExponentialCorr, ZeroMean};
/// use linfa::ParamGuard;
/// use ndarray::{Array1, Axis};
///
/// let gp = GaussianProcessPrior::<f64, ZeroMean, SquaredExponentialCorr>::params(
///     ZeroMean(),
///     SquaredExponentialCorr(),
/// )
/// .variance(101.)
/// .lengthscale(0.2)
/// .build()
/// .expect("GP prior");
///
/// let nodes = Array1::linspace(0., 1., 11).insert_axis(Axis(1));
/// let prior = gp.discretize(&nodes).expect("discretized prior");
/// assert_eq!(prior.dim(), 11);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(bound(
        serialize = "F: Serialize, Mean: Serialize, Corr: Serialize",
        deserialize = "F: Deserialize<'de>, Mean: Deserialize<'de>, Corr: Deserialize<'de>"
    ))
)]
pub struct GaussianProcessPrior<F: Float, Mean: MeanModel<F>, Corr: CorrelationModel<F>> {
    params: GpPriorValidParams<F, Mean, Corr>,
}

impl<F: Float, Mean: MeanModel<F>, Corr: CorrelationModel<F>> fmt::Display
    for GaussianProcessPrior<F, Mean, Corr>
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "GP(mean={}, corr={}, variance={}, lengthscales={})",
            self.params.mean, self.params.corr, self.params.variance, self.params.lengthscales,
        )
    }
}

impl<F: Float, Mean: MeanModel<F>, Corr: CorrelationModel<F>> GpPriorParams<F, Mean, Corr> {
    /// Validate parameters and build the corresponding GP prior
    pub fn build(self) -> Result<GaussianProcessPrior<F, Mean, Corr>> {
        let params = self.check()?;
        Ok(GaussianProcessPrior { params })
    }
}

impl<F: Float, Mean: MeanModel<F>, Corr: CorrelationModel<F>> GaussianProcessPrior<F, Mean, Corr> {
    /// Gp prior parameters contructor
    pub fn params<NewMean: MeanModel<F>, NewCorr: CorrelationModel<F>>(
        mean: NewMean,
        corr: NewCorr,
    ) -> GpPriorParams<F, NewMean, NewCorr> {
        GpPriorParams::new(mean, corr)
    }

    /// Validated parameters of the prior
    pub fn params_ref(&self) -> &GpPriorValidParams<F, Mean, Corr> {
        &self.params
    }

    /// Process variance
    pub fn variance(&self) -> F {
        self.params.variance
    }

    /// Correlation lengthscales
    pub fn lengthscales(&self) -> &Array1<F> {
        &self.params.lengthscales
    }

    /// Input dimension if constrained by the mean model or the lengthscales
    pub fn input_dim(&self) -> Option<usize> {
        if self.params.lengthscales.len() > 1 {
            Some(self.params.lengthscales.len())
        } else {
            self.params.mean.input_dim()
        }
    }

    fn check_input(&self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<()> {
        if x.ncols() == 0 {
            return Err(GpError::InputDimensionError(
                "points should have at least one component".to_string(),
            ));
        }
        if let Some(dim) = self.input_dim() {
            if x.ncols() != dim {
                return Err(GpError::InputDimensionError(format!(
                    "points have {} components, prior input dimension is {}",
                    x.ncols(),
                    dim
                )));
            }
        }
        Ok(())
    }

    /// Mean values at n given `x` points of nx components specified as a (n, nx) matrix.
    pub fn mean_value(&self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Array1<F>> {
        self.check_input(x)?;
        Ok(self.params.mean.value(x))
    }

    /// Mean values at n given scalar `x` points
    pub fn mean_at(&self, x: &ArrayBase<impl Data<Elem = F>, Ix1>) -> Result<Array1<F>> {
        self.mean_value(&x.view().insert_axis(Axis(1)))
    }

    /// Covariance matrix `sigma^2.k(x_i, y_j)` between two sets of points
    /// specified as (n, nx) and (m, nx) matrices.
    pub fn covariance(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix2>,
        y: &ArrayBase<impl Data<Elem = F>, Ix2>,
    ) -> Result<Array2<F>> {
        self.check_input(x)?;
        self.check_input(y)?;
        if x.ncols() != y.ncols() {
            return Err(GpError::InputDimensionError(format!(
                "points have {} and {} components",
                x.ncols(),
                y.ncols()
            )));
        }
        let r = scaled_distances(x, y, &self.params.lengthscales);
        let variance = self.params.variance;
        Ok(self.params.corr.value(&r).mapv(|k| variance * k))
    }

    /// Covariance matrix between two sets of scalar points
    pub fn covariance_at(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix1>,
        y: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> Result<Array2<F>> {
        self.covariance(
            &x.view().insert_axis(Axis(1)),
            &y.view().insert_axis(Axis(1)),
        )
    }

    /// Finite dimensional distribution of the process at the given (n, nx) points.
    ///
    /// The nugget scaled by the variance is added to the covariance diagonal.
    pub fn discretize(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    ) -> Result<MultivariateNormal<F>> {
        let mean = self.mean_value(x)?;
        let mut cov = self.covariance(x, x)?;
        let jitter = self.params.nugget * self.params.variance;
        cov.diag_mut().mapv_inplace(|v| v + jitter);
        debug!("Discretize {} on {} points", self, x.nrows());
        Ok(MultivariateNormal::new(mean, cov)?)
    }

    /// Finite dimensional distribution at scalar points
    pub fn discretize_at(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> Result<MultivariateNormal<F>> {
        self.discretize(&x.view().insert_axis(Axis(1)))
    }

    /// Draw `n_traj` sample paths of the prior at the given (n, nx) points,
    /// returned as columns of a (n, n_traj) matrix.
    pub fn sample<R: Rng>(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix2>,
        n_traj: usize,
        rng: &mut R,
    ) -> Result<Array2<F>> {
        Ok(self.discretize(x)?.sample(n_traj, rng)?)
    }
}

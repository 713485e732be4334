use crate::conditioning::{condition, condition_with};
use crate::errors::{GaussianError, Result};
use crate::linalg::{check_square, symmetrize, JitterPolicy};
use crate::observation::LinearObservation;
use linfa::Float;
use linfa_linalg::eigh::*;
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix2};
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative tolerance used to accept a covariance matrix as symmetric
const SYMMETRY_RTOL: f64 = 1e-8;
/// Eigenvalues below this fraction of the largest one are clamped to zero when sampling
const EIG_CLAMP_RTOL: f64 = 1e-9;

/// A finite dimensional gaussian distribution `N(mean, cov)`
///
/// The covariance matrix is kept symmetric: it is symmetrized at construction
/// and after every update.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(bound(deserialize = "F: Deserialize<'de>"))
)]
pub struct MultivariateNormal<F: Float> {
    /// Mean vector (n,)
    mean: Array1<F>,
    /// Covariance matrix (n, n)
    cov: Array2<F>,
}

impl<F: Float> MultivariateNormal<F> {
    /// Constructor given a mean vector (n,) and a covariance matrix (n, n).
    ///
    /// Fails when shapes are inconsistent, values are not finite or
    /// the covariance matrix is not symmetric.
    pub fn new(mean: Array1<F>, cov: Array2<F>) -> Result<Self> {
        let n = check_square(&cov, "covariance matrix")?;
        if mean.len() != n {
            return Err(GaussianError::DimensionMismatch(format!(
                "mean length {} does not match covariance size ({}, {})",
                mean.len(),
                n,
                n
            )));
        }
        if mean.iter().chain(cov.iter()).any(|v| !v.is_finite()) {
            return Err(GaussianError::InvalidValueError(
                "mean or covariance contains non finite values".to_string(),
            ));
        }
        let scale = cov.iter().fold(F::zero(), |acc, v| acc.max(v.abs()));
        let asym = (&cov - &cov.t())
            .iter()
            .fold(F::zero(), |acc, v| acc.max(v.abs()));
        if asym > F::cast(SYMMETRY_RTOL) * scale {
            return Err(GaussianError::InvalidValueError(format!(
                "covariance matrix is not symmetric (max |C - C^T| = {asym:e})"
            )));
        }
        if cov.diag().iter().any(|v| *v < F::zero()) {
            return Err(GaussianError::InvalidValueError(
                "covariance matrix has negative diagonal entries".to_string(),
            ));
        }
        Ok(MultivariateNormal {
            mean,
            cov: symmetrize(&cov),
        })
    }

    /// Standard normal distribution of dimension `n`
    pub fn standard(n: usize) -> Self {
        MultivariateNormal {
            mean: Array1::zeros(n),
            cov: Array2::eye(n),
        }
    }

    /// Constructor skipping validation, used for results of trusted computations
    pub(crate) fn new_unchecked(mean: Array1<F>, cov: Array2<F>) -> Self {
        MultivariateNormal {
            mean,
            cov: symmetrize(&cov),
        }
    }

    /// Dimension of the distribution
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Mean vector
    pub fn mean(&self) -> &Array1<F> {
        &self.mean
    }

    /// Covariance matrix
    pub fn cov(&self) -> &Array2<F> {
        &self.cov
    }

    /// Marginal variances, i.e. the diagonal of the covariance matrix
    pub fn variances(&self) -> Array1<F> {
        self.cov.diag().to_owned()
    }

    /// Marginal standard deviations.
    ///
    /// Diagonal entries slightly negative due to round-off are read as zero.
    pub fn std_devs(&self) -> Array1<F> {
        self.cov.diag().mapv(|v| v.max(F::zero()).sqrt())
    }

    /// Marginal distribution of the components at the given `indices`
    pub fn marginal(&self, indices: &[usize]) -> Result<Self> {
        if let Some(i) = indices.iter().find(|&&i| i >= self.dim()) {
            return Err(GaussianError::DimensionMismatch(format!(
                "index {} out of bounds for distribution of dimension {}",
                i,
                self.dim()
            )));
        }
        let mean = self.mean.select(Axis(0), indices);
        let cov = self
            .cov
            .select(Axis(0), indices)
            .select(Axis(1), indices);
        Ok(MultivariateNormal::new_unchecked(mean, cov))
    }

    /// Distribution of `A.X` where `X` follows this distribution: `N(A.mean, A.cov.A^T)`
    pub fn linear_transform(&self, a: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Self> {
        if a.ncols() != self.dim() {
            return Err(GaussianError::DimensionMismatch(format!(
                "operator with {} columns cannot apply to distribution of dimension {}",
                a.ncols(),
                self.dim()
            )));
        }
        let mean = a.dot(&self.mean);
        let cov = a.dot(&self.cov).dot(&a.t());
        Ok(MultivariateNormal::new_unchecked(mean, cov))
    }

    /// Condition the distribution on a linear gaussian observation.
    ///
    /// See [`condition`].
    pub fn condition(&self, observation: &LinearObservation<F>) -> Result<Self> {
        condition(self, observation)
    }

    /// Condition the distribution using the given regularization policy.
    ///
    /// See [`condition_with`].
    pub fn condition_with(
        &self,
        observation: &LinearObservation<F>,
        policy: &JitterPolicy<F>,
    ) -> Result<Self> {
        condition_with(self, observation, policy)
    }

    /// Draw `n_traj` samples returned as columns of a (n, n_traj) matrix.
    ///
    /// The covariance square root is computed with an eigenvalues decomposition,
    /// which unlike Cholesky copes with the rank deficient covariance matrices
    /// obtained after conditioning on precise observations.
    pub fn sample<R: Rng>(&self, n_traj: usize, rng: &mut R) -> Result<Array2<F>> {
        let n = self.dim();
        if n == 0 {
            return Ok(Array2::zeros((0, n_traj)));
        }
        let (v, w) = self.cov.to_owned().eigh_into()?;
        let vmax = v.fold(F::zero(), |acc, &x| acc.max(x));
        let threshold = F::cast(EIG_CLAMP_RTOL) * vmax;
        let v = v.mapv(|x| if x < threshold { F::zero() } else { x.sqrt() });
        let c = w.dot(&Array2::from_diag(&v));
        let ary = Array2::<f64>::random_using((n, n_traj), StandardNormal, rng).mapv(F::cast);
        Ok(self.mean.to_owned().insert_axis(Axis(1)) + c.dot(&ary))
    }
}

impl<F: Float> fmt::Display for MultivariateNormal<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MultivariateNormal(dim={})", self.dim())
    }
}

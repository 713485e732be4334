use crate::errors::{GaussianError, Result};
use crate::linalg::check_square;
use linfa::Float;
use ndarray::{concatenate, s, Array1, Array2, ArrayBase, Axis, Data, Ix1};
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// A linear gaussian observation `z = H.x + e` with `e ~ N(0, noise_cov)`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(bound(deserialize = "F: Deserialize<'de>"))
)]
pub struct LinearObservation<F: Float> {
    /// Observation operator H (m, n)
    operator: Array2<F>,
    /// Observed values z (m,)
    data: Array1<F>,
    /// Noise covariance (m, m)
    noise_cov: Array2<F>,
}

impl<F: Float> LinearObservation<F> {
    /// Constructor given the operator `H` (m, n), the observed data `z` (m,)
    /// and the noise covariance matrix (m, m).
    ///
    /// The noise covariance has to be symmetric with a non negative diagonal,
    /// a zero matrix stands for noise free observations.
    pub fn new(operator: Array2<F>, data: Array1<F>, noise_cov: Array2<F>) -> Result<Self> {
        let m = operator.nrows();
        if data.len() != m {
            return Err(GaussianError::DimensionMismatch(format!(
                "observed data length {} does not match operator rows {}",
                data.len(),
                m
            )));
        }
        if check_square(&noise_cov, "noise covariance")? != m {
            return Err(GaussianError::DimensionMismatch(format!(
                "noise covariance size {} does not match operator rows {}",
                noise_cov.nrows(),
                m
            )));
        }
        if operator
            .iter()
            .chain(data.iter())
            .chain(noise_cov.iter())
            .any(|v| !v.is_finite())
        {
            return Err(GaussianError::InvalidValueError(
                "observation contains non finite values".to_string(),
            ));
        }
        if noise_cov.diag().iter().any(|v| *v < F::zero()) {
            return Err(GaussianError::InvalidValueError(
                "noise covariance has negative diagonal entries".to_string(),
            ));
        }
        if noise_cov != noise_cov.t() {
            return Err(GaussianError::InvalidValueError(
                "noise covariance is not symmetric".to_string(),
            ));
        }
        Ok(LinearObservation {
            operator,
            data,
            noise_cov,
        })
    }

    /// Observation with independent noise of equal variance `noise_variance` on each component
    pub fn isotropic(operator: Array2<F>, data: Array1<F>, noise_variance: F) -> Result<Self> {
        if !(noise_variance.is_finite() && noise_variance >= F::zero()) {
            return Err(GaussianError::InvalidValueError(format!(
                "noise variance should be non negative, got {}",
                noise_variance
            )));
        }
        let m = operator.nrows();
        let noise_cov = Array2::eye(m).mapv(|v: F| v * noise_variance);
        Self::new(operator, data, noise_cov)
    }

    /// Observation of a single linear functional `w.x` (a (1, n) operator)
    pub fn scalar(weights: Array1<F>, value: F, noise_variance: F) -> Result<Self> {
        Self::isotropic(
            weights.insert_axis(Axis(0)),
            Array1::from_elem(1, value),
            noise_variance,
        )
    }

    /// Number of observed values
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing is observed
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Dimension of the observed state
    pub fn state_dim(&self) -> usize {
        self.operator.ncols()
    }

    /// Observation operator H
    pub fn operator(&self) -> &Array2<F> {
        &self.operator
    }

    /// Observed values z
    pub fn data(&self) -> &Array1<F> {
        &self.data
    }

    /// Noise covariance matrix
    pub fn noise_cov(&self) -> &Array2<F> {
        &self.noise_cov
    }

    /// Innovation `z - H.x`
    pub fn residual(&self, x: &ArrayBase<impl Data<Elem = F>, Ix1>) -> Array1<F> {
        &self.data - &self.operator.dot(x)
    }

    /// Stack two observations of the same state assuming independent noises:
    /// operators and data are concatenated, noise covariance is block diagonal.
    pub fn stack(&self, other: &LinearObservation<F>) -> Result<Self> {
        if self.state_dim() != other.state_dim() {
            return Err(GaussianError::DimensionMismatch(format!(
                "cannot stack observations of states of dimension {} and {}",
                self.state_dim(),
                other.state_dim()
            )));
        }
        let (m1, m2) = (self.len(), other.len());
        let operator = concatenate![Axis(0), self.operator, other.operator];
        let data = concatenate![Axis(0), self.data, other.data];
        let mut noise_cov = Array2::zeros((m1 + m2, m1 + m2));
        noise_cov.slice_mut(s![..m1, ..m1]).assign(&self.noise_cov);
        noise_cov.slice_mut(s![m1.., m1..]).assign(&other.noise_cov);
        Ok(LinearObservation {
            operator,
            data,
            noise_cov,
        })
    }
}

use crate::correlation_models::CorrelationModel;
use crate::errors::{GpError, Result};
use crate::mean_models::MeanModel;
use linfa::{Float, ParamGuard};

use ndarray::{array, Array1};
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Default minimal differentiability order required from the correlation model
pub const GP_MIN_DIFFERENTIABILITY: usize = 1;

/// A set of validated GP prior parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(bound(
        serialize = "F: Serialize, Mean: Serialize, Corr: Serialize",
        deserialize = "F: Deserialize<'de>, Mean: Deserialize<'de>, Corr: Deserialize<'de>"
    ))
)]
pub struct GpPriorValidParams<F: Float, Mean: MeanModel<F>, Corr: CorrelationModel<F>> {
    /// Mean model mu(x)
    pub(crate) mean: Mean,
    /// Correlation model k(x, x') / variance
    pub(crate) corr: Corr,
    /// Process variance sigma^2
    pub(crate) variance: F,
    /// Correlation lengthscales, either one value or one per input component
    pub(crate) lengthscales: Array1<F>,
    /// Relative diagonal regularization of discretized covariance matrices
    pub(crate) nugget: F,
    /// Minimal mean square differentiability order of sample paths
    pub(crate) min_differentiability: usize,
}

impl<F: Float, Mean: MeanModel<F>, Corr: CorrelationModel<F>> GpPriorValidParams<F, Mean, Corr> {
    /// Get mean model
    pub fn mean(&self) -> &Mean {
        &self.mean
    }

    /// Get correlation model
    pub fn corr(&self) -> &Corr {
        &self.corr
    }

    /// Get process variance
    pub fn variance(&self) -> F {
        self.variance
    }

    /// Get lengthscales
    pub fn lengthscales(&self) -> &Array1<F> {
        &self.lengthscales
    }

    /// Get nugget
    pub fn nugget(&self) -> F {
        self.nugget
    }

    /// Get required differentiability order
    pub fn min_differentiability(&self) -> usize {
        self.min_differentiability
    }
}

#[derive(Clone, Debug)]
/// The set of parameters that can be specified to build a
/// [GP prior](struct.GaussianProcessPrior.html).
pub struct GpPriorParams<F: Float, Mean: MeanModel<F>, Corr: CorrelationModel<F>>(
    GpPriorValidParams<F, Mean, Corr>,
);

impl<F: Float, Mean: MeanModel<F>, Corr: CorrelationModel<F>> GpPriorParams<F, Mean, Corr> {
    /// A constructor for GP prior parameters given mean and correlation models.
    ///
    /// Defaults to unit variance and lengthscale.
    pub fn new(mean: Mean, corr: Corr) -> GpPriorParams<F, Mean, Corr> {
        Self(GpPriorValidParams {
            mean,
            corr,
            variance: F::one(),
            lengthscales: array![F::one()],
            nugget: F::cast(100.0) * F::epsilon(),
            min_differentiability: GP_MIN_DIFFERENTIABILITY,
        })
    }

    /// Set mean model.
    pub fn mean(mut self, mean: Mean) -> Self {
        self.0.mean = mean;
        self
    }

    /// Set correlation model.
    pub fn corr(mut self, corr: Corr) -> Self {
        self.0.corr = corr;
        self
    }

    /// Set process variance.
    pub fn variance(mut self, variance: F) -> Self {
        self.0.variance = variance;
        self
    }

    /// Set the same lengthscale for every input component.
    pub fn lengthscale(mut self, lengthscale: F) -> Self {
        self.0.lengthscales = array![lengthscale];
        self
    }

    /// Set one lengthscale per input component.
    pub fn lengthscales(mut self, lengthscales: Array1<F>) -> Self {
        self.0.lengthscales = lengthscales;
        self
    }

    /// Set nugget.
    ///
    /// Nugget is added to the diagonal of discretized correlation matrices
    /// to improve numerical stability.
    pub fn nugget(mut self, nugget: F) -> Self {
        self.0.nugget = nugget;
        self
    }

    /// Set the minimal differentiability order required from the correlation model.
    pub fn min_differentiability(mut self, order: usize) -> Self {
        self.0.min_differentiability = order;
        self
    }
}

impl<F: Float, Mean: MeanModel<F>, Corr: CorrelationModel<F>> ParamGuard
    for GpPriorParams<F, Mean, Corr>
{
    type Checked = GpPriorValidParams<F, Mean, Corr>;
    type Error = GpError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        let p = &self.0;
        if !(p.variance.is_finite() && p.variance > F::zero()) {
            return Err(GpError::InvalidValueError(format!(
                "`variance` should be strictly positive, got {}",
                p.variance
            )));
        }
        if p.lengthscales.is_empty() {
            return Err(GpError::InvalidValueError(
                "`lengthscales` cannot be empty!".to_string(),
            ));
        }
        if p
            .lengthscales
            .iter()
            .any(|l| !(l.is_finite() && *l > F::zero()))
        {
            return Err(GpError::InvalidValueError(format!(
                "`lengthscales` should be strictly positive, got {}",
                p.lengthscales
            )));
        }
        if !(p.nugget.is_finite() && p.nugget >= F::zero()) {
            return Err(GpError::InvalidValueError(format!(
                "`nugget` should be non negative, got {}",
                p.nugget
            )));
        }
        let order = p.corr.differentiability();
        if order < p.min_differentiability {
            return Err(GpError::InvalidValueError(format!(
                "{} correlation gives {}-differentiable sample paths, at least {} required",
                p.corr, order, p.min_differentiability
            )));
        }
        if let Some(dim) = p.mean.input_dim() {
            if p.lengthscales.len() > 1 && p.lengthscales.len() != dim {
                return Err(GpError::InputDimensionError(format!(
                    "{} lengthscales given for mean model of input dimension {}",
                    p.lengthscales.len(),
                    dim
                )));
            }
        }
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation_models::*;
    use crate::mean_models::*;

    #[test]
    fn test_default_params() {
        let params = GpPriorParams::<f64, _, _>::new(ZeroMean(), SquaredExponentialCorr())
            .check()
            .unwrap();
        assert_eq!(params.variance(), 1.);
        assert_eq!(params.lengthscales(), &array![1.]);
        assert_eq!(params.min_differentiability(), GP_MIN_DIFFERENTIABILITY);
        assert!(params.nugget() > 0.);
    }

    #[test]
    fn test_invalid_values() {
        let base = GpPriorParams::<f64, _, _>::new(ZeroMean(), Matern52Corr());
        assert!(base.clone().variance(0.).check().is_err());
        assert!(base.clone().variance(f64::NAN).check().is_err());
        assert!(base.clone().lengthscale(-1.).check().is_err());
        assert!(base.clone().lengthscales(Array1::zeros(0)).check().is_err());
        assert!(base.clone().nugget(-1e-3).check().is_err());
        assert!(base.variance(2.).lengthscale(0.5).check().is_ok());
    }

    #[test]
    fn test_differentiability_requirement() {
        let params = GpPriorParams::<f64, _, _>::new(ZeroMean(), AbsoluteExponentialCorr());
        assert!(matches!(
            params.clone().check_ref(),
            Err(GpError::InvalidValueError(_))
        ));
        assert!(params.min_differentiability(0).check().is_ok());

        let params = GpPriorParams::<f64, _, _>::new(ZeroMean(), Matern32Corr());
        assert!(params.clone().check().is_ok());
        assert!(params.min_differentiability(2).check().is_err());
    }

    #[test]
    fn test_lengthscales_vs_mean_dim() {
        let mean = LinearMean::new(0., array![1., 2.]);
        let params = GpPriorParams::new(mean, SquaredExponentialCorr());
        assert!(params.clone().lengthscales(array![1., 2.]).check().is_ok());
        assert!(matches!(
            params.lengthscales(array![1., 2., 3.]).check(),
            Err(GpError::InputDimensionError(_))
        ));
    }
}

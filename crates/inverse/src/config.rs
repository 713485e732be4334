//! Beam load inversion configuration.
use crate::errors::{InverseError, Result};
use beambayes_gaussian::JitterPolicy;
use beambayes_gp::GP_MIN_DIFFERENTIABILITY;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Correlation kernel of the load prior
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelSpec {
    /// Infinitely differentiable sample paths
    #[default]
    SquaredExponential,
    /// Once differentiable sample paths
    Matern32,
    /// Twice differentiable sample paths
    Matern52,
    /// Continuous but not differentiable sample paths
    AbsoluteExponential,
}

impl fmt::Display for KernelSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            KernelSpec::SquaredExponential => "SquaredExponential",
            KernelSpec::Matern32 => "Matern32",
            KernelSpec::Matern52 => "Matern52",
            KernelSpec::AbsoluteExponential => "AbsoluteExponential",
        };
        write!(f, "{name}")
    }
}

/// Beam load inversion configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InversionConfig {
    /// Correlation kernel of the GP prior
    pub(crate) kernel: KernelSpec,
    /// Variance of the GP prior
    pub(crate) prior_variance: f64,
    /// Lengthscale of the GP prior correlation
    pub(crate) lengthscale: f64,
    /// Constant mean of the GP prior
    pub(crate) mean_offset: f64,
    /// Relative diagonal regularization of the discretized prior covariance
    pub(crate) nugget: f64,
    /// Required differentiability order of the prior sample paths
    pub(crate) min_smoothness: usize,
    /// Noise variance of each observed deflection
    pub(crate) observation_noise_variance: f64,
    /// Noise variance of the observed total load
    pub(crate) load_sum_noise_variance: f64,
    /// Number of posterior sample paths to draw
    pub(crate) n_samples: usize,
    /// Random generator seed used for sampling
    pub(crate) seed: u64,
    /// Regularization of ill conditioned innovation covariances
    pub(crate) jitter: JitterPolicy<f64>,
}

impl Default for InversionConfig {
    fn default() -> Self {
        InversionConfig {
            kernel: KernelSpec::default(),
            prior_variance: 101.,
            lengthscale: 0.2,
            mean_offset: 0.,
            nugget: 100. * f64::EPSILON,
            min_smoothness: GP_MIN_DIFFERENTIABILITY,
            observation_noise_variance: 1e-8,
            load_sum_noise_variance: 1e-7,
            n_samples: 0,
            seed: 42,
            jitter: JitterPolicy::default(),
        }
    }
}

impl InversionConfig {
    /// Load a configuration from a json file, unspecified fields take default values
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: InversionConfig = serde_json::from_reader(BufReader::new(file))?;
        config.check()
    }

    /// Sets the prior correlation kernel
    pub fn kernel(mut self, kernel: KernelSpec) -> Self {
        self.kernel = kernel;
        self
    }

    /// Sets the prior variance
    pub fn prior_variance(mut self, variance: f64) -> Self {
        self.prior_variance = variance;
        self
    }

    /// Sets the prior correlation lengthscale
    pub fn lengthscale(mut self, lengthscale: f64) -> Self {
        self.lengthscale = lengthscale;
        self
    }

    /// Sets the prior constant mean
    pub fn mean_offset(mut self, offset: f64) -> Self {
        self.mean_offset = offset;
        self
    }

    /// Sets the nugget added to the prior covariance diagonal (relative to the prior variance)
    pub fn nugget(mut self, nugget: f64) -> Self {
        self.nugget = nugget;
        self
    }

    /// Sets the required differentiability order of prior sample paths
    pub fn min_smoothness(mut self, order: usize) -> Self {
        self.min_smoothness = order;
        self
    }

    /// Sets the noise variance of observed deflections
    pub fn observation_noise_variance(mut self, variance: f64) -> Self {
        self.observation_noise_variance = variance;
        self
    }

    /// Sets the noise variance of the observed total load
    pub fn load_sum_noise_variance(mut self, variance: f64) -> Self {
        self.load_sum_noise_variance = variance;
        self
    }

    /// Sets the number of posterior sample paths
    pub fn n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    /// Sets the random generator seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the jitter policy used when conditioning
    pub fn jitter(mut self, jitter: JitterPolicy<f64>) -> Self {
        self.jitter = jitter;
        self
    }

    /// Prior correlation kernel
    pub fn kernel_spec(&self) -> KernelSpec {
        self.kernel
    }

    /// Number of posterior sample paths
    pub fn samples(&self) -> usize {
        self.n_samples
    }

    /// Check configuration values
    pub fn check(self) -> Result<Self> {
        let positive = [
            ("prior_variance", self.prior_variance),
            ("lengthscale", self.lengthscale),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.) {
                return Err(InverseError::InvalidConfigError(format!(
                    "`{name}` should be strictly positive, got {value}"
                )));
            }
        }
        let non_negative = [
            ("nugget", self.nugget),
            ("observation_noise_variance", self.observation_noise_variance),
            ("load_sum_noise_variance", self.load_sum_noise_variance),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.) {
                return Err(InverseError::InvalidConfigError(format!(
                    "`{name}` should be non negative, got {value}"
                )));
            }
        }
        if !self.mean_offset.is_finite() {
            return Err(InverseError::InvalidConfigError(
                "`mean_offset` should be finite".to_string(),
            ));
        }
        self.jitter
            .validate()
            .map_err(|err| InverseError::InvalidConfigError(format!("`jitter`: {err}")))?;
        Ok(self)
    }
}

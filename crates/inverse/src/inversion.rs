use crate::config::{InversionConfig, KernelSpec};
use crate::dataset::BeamDataset;
use crate::errors::Result;
use crate::forward::{load_sum_observation, ForwardOperator};

use beambayes_gaussian::MultivariateNormal;
use beambayes_gp::correlation_models::*;
use beambayes_gp::mean_models::ConstantMean;
use beambayes_gp::GaussianProcessPrior;

use log::{debug, info};
use ndarray::{Array1, Array2};
use ndarray_npy::write_npy;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use std::path::Path;
use std::time::Instant;

/// Output file names written by [`InversionResult::save`]
pub const NODES_FILENAME: &str = "nodes.npy";
/// Prior mean file name
pub const PRIOR_MEAN_FILENAME: &str = "prior_mean.npy";
/// Prior marginal standard deviations file name
pub const PRIOR_STD_FILENAME: &str = "prior_std.npy";
/// Mean after conditioning on deflections file name
pub const DISPLACEMENT_MEAN_FILENAME: &str = "displacement_posterior_mean.npy";
/// Standard deviations after conditioning on deflections file name
pub const DISPLACEMENT_STD_FILENAME: &str = "displacement_posterior_std.npy";
/// Posterior mean file name
pub const POSTERIOR_MEAN_FILENAME: &str = "posterior_mean.npy";
/// Posterior marginal standard deviations file name
pub const POSTERIOR_STD_FILENAME: &str = "posterior_std.npy";
/// Posterior covariance file name
pub const POSTERIOR_COV_FILENAME: &str = "posterior_cov.npy";
/// Posterior sample paths file name
pub const POSTERIOR_SAMPLES_FILENAME: &str = "posterior_samples.npy";

/// Bayesian inference of the load acting on a beam.
///
/// A GP prior over the load is discretized at the finite difference nodes,
/// conditioned on the observed deflections and then on the observed total load.
///
/// ```no_run
/// use beambayes_inverse::{BeamDataset, BeamInversion, InversionConfig, KernelSpec};
///
/// let data = BeamDataset::from_npz("beam.npz").expect("beam data");
/// let config = InversionConfig::default().kernel(KernelSpec::Matern52).n_samples(5);
/// let result = BeamInversion::new(config)
///     .expect("valid config")
///     .run(&data)
///     .expect("inversion");
/// result.save("out").expect("saved results");
/// ```
#[derive(Clone, Debug)]
pub struct BeamInversion {
    config: InversionConfig,
}

impl BeamInversion {
    /// Constructor checking the given configuration
    pub fn new(config: InversionConfig) -> Result<Self> {
        Ok(BeamInversion {
            config: config.check()?,
        })
    }

    /// Inversion configuration
    pub fn config(&self) -> &InversionConfig {
        &self.config
    }

    /// Load prior discretized at the given node locations
    pub fn prior(&self, nodes: &Array1<f64>) -> Result<MultivariateNormal<f64>> {
        match self.config.kernel {
            KernelSpec::SquaredExponential => {
                discretize_prior(SquaredExponentialCorr(), &self.config, nodes)
            }
            KernelSpec::Matern32 => discretize_prior(Matern32Corr(), &self.config, nodes),
            KernelSpec::Matern52 => discretize_prior(Matern52Corr(), &self.config, nodes),
            KernelSpec::AbsoluteExponential => {
                discretize_prior(AbsoluteExponentialCorr(), &self.config, nodes)
            }
        }
    }

    /// Run the two conditioning steps on the given beam data
    pub fn run(&self, dataset: &BeamDataset) -> Result<InversionResult> {
        let now = Instant::now();
        let forward = ForwardOperator::new(
            dataset.system_matrix().to_owned(),
            dataset.observation_matrix().to_owned(),
        )?;
        let prior = self.prior(dataset.nodes())?;

        let observation = forward.observation(
            dataset.observation_data().to_owned(),
            self.config.observation_noise_variance,
        )?;
        let displacement_posterior = prior.condition_with(&observation, &self.config.jitter)?;
        let misfit = &forward.observe(displacement_posterior.mean())? - dataset.observation_data();
        info!(
            "Conditioned on {} deflections (max misfit {:e})",
            forward.n_observations(),
            misfit.iter().fold(0., |acc: f64, v| acc.max(v.abs()))
        );

        let load_sum = load_sum_observation(
            dataset.n_nodes(),
            dataset.load_sum(),
            self.config.load_sum_noise_variance,
        )?;
        let posterior = displacement_posterior.condition_with(&load_sum, &self.config.jitter)?;
        info!(
            "Conditioned on load sum {} (posterior mean sum {})",
            dataset.load_sum(),
            posterior.mean().sum()
        );

        let samples = if self.config.n_samples > 0 {
            let mut rng = Xoshiro256Plus::seed_from_u64(self.config.seed);
            let samples = posterior.sample(self.config.n_samples, &mut rng)?;
            debug!("Drew {:?} posterior samples", samples.dim());
            Some(samples)
        } else {
            None
        };
        info!("Inversion done in {:.3}s", now.elapsed().as_secs_f64());

        Ok(InversionResult {
            nodes: dataset.nodes().to_owned(),
            prior,
            displacement_posterior,
            posterior,
            samples,
        })
    }
}

fn discretize_prior<Corr: CorrelationModel<f64>>(
    corr: Corr,
    config: &InversionConfig,
    nodes: &Array1<f64>,
) -> Result<MultivariateNormal<f64>> {
    let gp = GaussianProcessPrior::<f64, ConstantMean<f64>, Corr>::params(
        ConstantMean::new(config.mean_offset),
        corr,
    )
    .variance(config.prior_variance)
    .lengthscale(config.lengthscale)
    .nugget(config.nugget)
    .min_differentiability(config.min_smoothness)
    .build()?;
    info!("Load prior {}", gp);
    Ok(gp.discretize_at(nodes)?)
}

/// Distributions of the load computed by [`BeamInversion::run`]
#[derive(Clone, Debug)]
pub struct InversionResult {
    nodes: Array1<f64>,
    prior: MultivariateNormal<f64>,
    displacement_posterior: MultivariateNormal<f64>,
    posterior: MultivariateNormal<f64>,
    samples: Option<Array2<f64>>,
}

impl InversionResult {
    /// Node locations
    pub fn nodes(&self) -> &Array1<f64> {
        &self.nodes
    }

    /// Discretized load prior
    pub fn prior(&self) -> &MultivariateNormal<f64> {
        &self.prior
    }

    /// Load distribution given the observed deflections
    pub fn displacement_posterior(&self) -> &MultivariateNormal<f64> {
        &self.displacement_posterior
    }

    /// Load distribution given the observed deflections and total load
    pub fn posterior(&self) -> &MultivariateNormal<f64> {
        &self.posterior
    }

    /// Posterior sample paths as columns of a (N, n_samples) matrix, if drawn
    pub fn samples(&self) -> Option<&Array2<f64>> {
        self.samples.as_ref()
    }

    /// Write result arrays as `.npy` files in `outdir`, created if needed
    pub fn save<P: AsRef<Path>>(&self, outdir: P) -> Result<()> {
        let outdir = outdir.as_ref();
        std::fs::create_dir_all(outdir)?;
        write_npy(outdir.join(NODES_FILENAME), &self.nodes)?;
        write_npy(outdir.join(PRIOR_MEAN_FILENAME), self.prior.mean())?;
        write_npy(outdir.join(PRIOR_STD_FILENAME), &self.prior.std_devs())?;
        write_npy(
            outdir.join(DISPLACEMENT_MEAN_FILENAME),
            self.displacement_posterior.mean(),
        )?;
        write_npy(
            outdir.join(DISPLACEMENT_STD_FILENAME),
            &self.displacement_posterior.std_devs(),
        )?;
        write_npy(outdir.join(POSTERIOR_MEAN_FILENAME), self.posterior.mean())?;
        write_npy(
            outdir.join(POSTERIOR_STD_FILENAME),
            &self.posterior.std_devs(),
        )?;
        write_npy(outdir.join(POSTERIOR_COV_FILENAME), self.posterior.cov())?;
        if let Some(samples) = &self.samples {
            write_npy(outdir.join(POSTERIOR_SAMPLES_FILENAME), samples)?;
        }
        info!("Results saved in {}", outdir.display());
        Ok(())
    }
}

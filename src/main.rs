use beambayes::{BeamDataset, BeamInversion, InversionConfig, BEAMBAYES_LOG};
use clap::Parser;
use env_logger::{Builder, Env};
use log::info;
use std::path::PathBuf;

/// Infer the load acting on a beam from deflection observations
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Beam data as an HDF5 file (.h5, .hdf5) or a .npz archive
    data: PathBuf,
    /// Inversion configuration as a json file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory where result arrays are written
    #[arg(short, long, default_value = "./beambayes_out")]
    outdir: PathBuf,
    /// Number of posterior sample paths to draw (overrides configuration)
    #[arg(short, long)]
    samples: Option<usize>,
    /// Random generator seed (overrides configuration)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let env = Env::new().filter_or(BEAMBAYES_LOG, "info");
    let mut builder = Builder::from_env(env);
    let builder = builder.target(env_logger::Target::Stdout);
    builder.try_init().ok();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => InversionConfig::from_json_file(path)?,
        None => InversionConfig::default(),
    };
    if let Some(samples) = args.samples {
        config = config.n_samples(samples);
    }
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }
    info!("Configuration: {}", serde_json::to_string(&config)?);

    let data = BeamDataset::from_file(&args.data)?;
    let result = BeamInversion::new(config)?.run(&data)?;
    result.save(&args.outdir)?;
    Ok(())
}

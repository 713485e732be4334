use thiserror::Error;

/// A result type for beam load inversion
pub type Result<T> = std::result::Result<T, InverseError>;

/// An error for beam load inversion
#[derive(Error, Debug)]
pub enum InverseError {
    /// When a named dataset is absent from the data container
    #[error("Missing dataset: {0}")]
    MissingDataset(String),
    /// When the data container format is not recognized or not enabled
    #[error("Unsupported data format: {0}")]
    UnsupportedFormat(String),
    /// When a dataset has an unexpected shape or values
    #[error("Invalid dataset {name}: {reason}")]
    InvalidDataset {
        /// Dataset name
        name: String,
        /// What is wrong with it
        reason: String,
    },
    /// When configuration is invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfigError(String),
    /// When gaussian computation fails
    #[error(transparent)]
    GaussianError(#[from] beambayes_gaussian::GaussianError),
    /// When GP prior construction fails
    #[error(transparent)]
    GpError(#[from] beambayes_gp::GpError),
    /// When IO fails
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    /// When numpy archive read fails
    #[error("IO error")]
    ReadNpzError(#[from] ndarray_npy::ReadNpzError),
    /// When numpy archive write fails
    #[error("IO error")]
    WriteNpzError(#[from] ndarray_npy::WriteNpzError),
    /// When numpy array write fails
    #[error("IO error")]
    WriteNpyError(#[from] ndarray_npy::WriteNpyError),
    /// When HDF5 file access fails
    #[cfg(feature = "hdf5")]
    #[error("HDF5 error")]
    Hdf5Error(#[from] hdf5::Error),
    /// When json (de)serialization fails
    #[error("Json error")]
    JsonError(#[from] serde_json::Error),
}

impl InverseError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        InverseError::InvalidDataset {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

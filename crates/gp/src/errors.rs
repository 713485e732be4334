use thiserror::Error;

/// A result type for GP prior algorithm
pub type Result<T> = std::result::Result<T, GpError>;

/// An error when using [`GaussianProcessPrior`](crate::GaussianProcessPrior)
#[derive(Error, Debug)]
pub enum GpError {
    /// When gaussian distribution computation fails
    #[error(transparent)]
    GaussianError(#[from] beambayes_gaussian::GaussianError),
    /// When evaluation points do not match the input dimension of the prior
    #[error("Input dimension error: {0}")]
    InputDimensionError(String),
    /// When error dur to a bad value
    #[error("InvalidValue error: {0}")]
    InvalidValueError(String),
}

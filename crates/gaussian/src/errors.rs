use thiserror::Error;

/// A result type for gaussian distribution computations
pub type Result<T> = std::result::Result<T, GaussianError>;

/// An error when manipulating a [`MultivariateNormal`](crate::MultivariateNormal)
/// or conditioning it on a [`LinearObservation`](crate::LinearObservation)
#[derive(Error, Debug)]
pub enum GaussianError {
    /// When linear algebra computation fails
    #[error(transparent)]
    LinalgError(#[from] linfa_linalg::LinalgError),
    /// When array shapes are not consistent
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),
    /// When a matrix to be solved against is singular
    #[error("Singular matrix: {0}")]
    SingularMatrix(String),
    /// When a matrix expected to be positive definite is not, even after regularization
    #[error("Matrix not positive definite: {0}")]
    NotPositiveDefinite(String),
    /// When error due to a bad value
    #[error("InvalidValue error: {0}")]
    InvalidValueError(String),
}

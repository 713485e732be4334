//! A module for mean models `mu(x)` of the GP prior.
//!
//! The following models are implemented:
//! * zero,
//! * constant offset,
//! * affine

use linfa::Float;
use ndarray::{Array1, ArrayBase, Data, Ix2};
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// A trait for mean models of the GP prior
pub trait MeanModel<F: Float>: Clone + fmt::Display + Sync {
    /// Compute mean values at the given `x` data points specified as (n, nx) matrix.
    ///
    /// `x` column count is expected to match [`input_dim()`](MeanModel::input_dim) when specified.
    fn value(&self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array1<F>;

    /// Input dimension required by the model, if any
    fn input_dim(&self) -> Option<usize> {
        None
    }
}

/// A null function as mean of the GP
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct ZeroMean();

impl<F: Float> MeanModel<F> for ZeroMean {
    /// mu(x) = 0
    fn value(&self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array1<F> {
        Array1::zeros(x.nrows())
    }
}

impl fmt::Display for ZeroMean {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ZeroMean")
    }
}

/// A constant function as mean of the GP
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct ConstantMean<F: Float> {
    /// Constant value of the mean
    pub offset: F,
}

impl<F: Float> ConstantMean<F> {
    /// Constructor
    pub fn new(offset: F) -> Self {
        ConstantMean { offset }
    }
}

impl<F: Float> MeanModel<F> for ConstantMean<F> {
    /// mu(x) = offset
    fn value(&self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array1<F> {
        Array1::from_elem(x.nrows(), self.offset)
    }
}

impl<F: Float> fmt::Display for ConstantMean<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ConstantMean({})", self.offset)
    }
}

/// An affine function as mean of the GP
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(bound(deserialize = "F: Deserialize<'de>"))
)]
pub struct LinearMean<F: Float> {
    /// Value at the origin
    pub intercept: F,
    /// Slope along each input component (nx,)
    pub slopes: Array1<F>,
}

impl<F: Float> LinearMean<F> {
    /// Constructor
    pub fn new(intercept: F, slopes: Array1<F>) -> Self {
        LinearMean { intercept, slopes }
    }
}

impl<F: Float> MeanModel<F> for LinearMean<F> {
    /// mu(x) = intercept + x.slopes
    fn value(&self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array1<F> {
        x.dot(&self.slopes).mapv(|v| v + self.intercept)
    }

    fn input_dim(&self) -> Option<usize> {
        Some(self.slopes.len())
    }
}

impl<F: Float> fmt::Display for LinearMean<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LinearMean({}, {})", self.intercept, self.slopes)
    }
}

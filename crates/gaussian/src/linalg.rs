//! Linear algebra helpers built on the pure Rust `linfa-linalg` backend.
//!
//! Matrices are never inverted explicitly: square systems are solved through
//! a QR factorization, symmetric positive definite ones through Cholesky
//! factorization with an optional diagonal jitter fallback.

use crate::errors::{GaussianError, Result};
use linfa::Float;
use linfa_linalg::{cholesky::*, qr::*, triangular::*};
use log::{debug, warn};
use ndarray::{Array2, ArrayBase, Data, Ix2};
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Regularization policy used when a Cholesky factorization fails.
///
/// The diagonal jitter added at attempt `k` (starting from 0) is
/// `initial * growth^k * mean(diag(A))`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct JitterPolicy<F: Float> {
    /// Relative jitter of the first regularized attempt
    pub initial: F,
    /// Multiplicative factor applied between attempts
    pub growth: F,
    /// Number of regularized attempts after the plain factorization failed
    pub max_tries: usize,
}

impl<F: Float> Default for JitterPolicy<F> {
    fn default() -> Self {
        JitterPolicy {
            initial: F::cast(1e-12),
            growth: F::cast(10.),
            max_tries: 6,
        }
    }
}

impl<F: Float> JitterPolicy<F> {
    /// A policy which never regularizes: factorization failures are reported as is.
    pub fn none() -> Self {
        JitterPolicy {
            max_tries: 0,
            ..Default::default()
        }
    }

    /// Check policy values
    pub fn validate(&self) -> Result<()> {
        if !(self.initial.is_finite() && self.initial > F::zero()) {
            return Err(GaussianError::InvalidValueError(format!(
                "jitter initial value should be positive, got {}",
                self.initial
            )));
        }
        if !(self.growth.is_finite() && self.growth >= F::one()) {
            return Err(GaussianError::InvalidValueError(format!(
                "jitter growth factor should be >= 1, got {}",
                self.growth
            )));
        }
        Ok(())
    }
}

pub(crate) fn check_square<F: Float>(
    a: &ArrayBase<impl Data<Elem = F>, Ix2>,
    name: &str,
) -> Result<usize> {
    if a.nrows() != a.ncols() {
        return Err(GaussianError::DimensionMismatch(format!(
            "{} should be square, got ({}, {})",
            name,
            a.nrows(),
            a.ncols()
        )));
    }
    Ok(a.nrows())
}

/// Returns `(A + A^T) / 2`
pub fn symmetrize<F: Float>(a: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array2<F> {
    (a.to_owned() + a.t()).mapv(|v| v * F::cast(0.5))
}

/// Lower triangular Cholesky factor `L` of the symmetric matrix `a` (`a = L.L^T`).
///
/// When the plain factorization fails, a diagonal jitter is added following
/// `policy` until it succeeds. Returns the factor and the absolute jitter
/// actually added (zero when none was needed).
pub fn robust_cholesky<F: Float>(
    a: &ArrayBase<impl Data<Elem = F>, Ix2>,
    policy: &JitterPolicy<F>,
) -> Result<(Array2<F>, F)> {
    let n = check_square(a, "matrix to factorize")?;
    if n == 0 {
        return Ok((Array2::zeros((0, 0)), F::zero()));
    }
    let a = a.to_owned();
    if let Some(l) = try_cholesky(&a) {
        return Ok((l, F::zero()));
    }

    let mut scale = a.diag().mapv(|v| v.abs()).sum() / F::cast(n);
    if scale == F::zero() || !scale.is_finite() {
        scale = F::one();
    }
    let mut tau = policy.initial;
    for attempt in 0..policy.max_tries {
        let jitter = tau * scale;
        warn!(
            "Cholesky factorization failed, retry {}/{} with diagonal jitter {:e}",
            attempt + 1,
            policy.max_tries,
            jitter
        );
        let mut regularized = a.to_owned();
        regularized.diag_mut().mapv_inplace(|v| v + jitter);
        if let Some(l) = try_cholesky(&regularized) {
            debug!("Cholesky factorization succeeded with jitter {:e}", jitter);
            return Ok((l, jitter));
        }
        tau *= policy.growth;
    }
    Err(GaussianError::NotPositiveDefinite(format!(
        "Cholesky factorization of ({n}, {n}) matrix failed after {} regularized attempts",
        policy.max_tries
    )))
}

fn try_cholesky<F: Float>(a: &Array2<F>) -> Option<Array2<F>> {
    match a.cholesky() {
        Ok(l) if l.iter().all(|v| v.is_finite()) => Some(l),
        Ok(_) => None,
        Err(err) => {
            debug!("Cholesky factorization error: {}", err);
            None
        }
    }
}

/// Solve the square system `A.X = B` using a QR factorization of `A`.
///
/// `A` is declared singular when a diagonal entry of its `R` factor is below
/// `n * epsilon * max|R_ii|`, and [`GaussianError::SingularMatrix`] is returned.
pub fn solve_square<F: Float>(
    a: &ArrayBase<impl Data<Elem = F>, Ix2>,
    b: &ArrayBase<impl Data<Elem = F>, Ix2>,
) -> Result<Array2<F>> {
    let n = check_square(a, "system matrix")?;
    if b.nrows() != n {
        return Err(GaussianError::DimensionMismatch(format!(
            "right hand side should have {} rows, got {}",
            n,
            b.nrows()
        )));
    }
    if n == 0 {
        return Ok(Array2::zeros((0, b.ncols())));
    }
    if a.iter().any(|v| !v.is_finite()) {
        return Err(GaussianError::InvalidValueError(
            "system matrix contains non finite values".to_string(),
        ));
    }
    let (q, r) = a.as_standard_layout().into_owned().qr()?.into_decomp();

    let diag = r.diag().mapv(|v| v.abs());
    let rmax = diag.fold(F::zero(), |acc, &v| if v > acc { v } else { acc });
    let tol = F::cast(n) * F::epsilon() * rmax;
    if let Some((i, v)) = diag.iter().enumerate().find(|(_, v)| **v <= tol) {
        return Err(GaussianError::SingularMatrix(format!(
            "|R[{i}, {i}]| = {v:e} is below tolerance {tol:e} (max |R_ii| = {rmax:e})"
        )));
    }
    let qtb = q.t().dot(b);
    Ok(r.solve_triangular_into(qtb, UPLO::Upper)?)
}

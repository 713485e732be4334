//! A module for stationary correlation models `k(x, x') / sigma^2` of the GP prior.
//!
//! Correlations are expressed as functions of the scaled distance
//! `r = ||(x - x') / l||` where `l` are the lengthscales.
//!
//! The following correlation models are implemented:
//! * squared exponential,
//! * absolute exponential,
//! * matern 3/2,
//! * matern 5/2.
//!
//! The smoothness of a correlation model at `r = 0` drives the regularity of the
//! GP sample paths which is reported by [`CorrelationModel::differentiability()`].

use linfa::Float;
use ndarray::{Array2, ArrayBase, Data, Ix2};
use paste::paste;
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Differentiability order of infinitely smooth sample paths
pub const INFINITELY_DIFFERENTIABLE: usize = usize::MAX;

/// A trait for using a correlation model in a GP prior
pub trait CorrelationModel<F: Float>: Clone + Copy + Default + fmt::Display + Sync {
    /// Compute correlation values given scaled distances `r` (n, m)
    fn value(&self, r: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array2<F>;

    /// Number of times sample paths of a GP governed by this correlation
    /// are mean square differentiable
    fn differentiability(&self) -> usize;
}

/// Squared exponential correlation model
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(into = "String"),
    serde(try_from = "String")
)]
pub struct SquaredExponentialCorr();

impl<F: Float> CorrelationModel<F> for SquaredExponentialCorr {
    /// exp( - r^2 / 2 )
    fn value(&self, r: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array2<F> {
        r.mapv(|v| F::exp(F::cast(-0.5) * v * v))
    }

    fn differentiability(&self) -> usize {
        INFINITELY_DIFFERENTIABLE
    }
}

/// Absolute exponential correlation model (aka Matern 1/2 or Ornstein-Uhlenbeck).
///
/// Sample paths are continuous but nowhere differentiable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(into = "String"),
    serde(try_from = "String")
)]
pub struct AbsoluteExponentialCorr();

impl<F: Float> CorrelationModel<F> for AbsoluteExponentialCorr {
    /// exp( - r )
    fn value(&self, r: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array2<F> {
        r.mapv(|v| F::exp(-v))
    }

    fn differentiability(&self) -> usize {
        0
    }
}

/// Matern 3/2 correlation model
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(into = "String"),
    serde(try_from = "String")
)]
pub struct Matern32Corr();

impl<F: Float> CorrelationModel<F> for Matern32Corr {
    /// (1 + sqrt(3) * r) exp( - sqrt(3) * r )
    fn value(&self, r: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array2<F> {
        let sqrt3 = F::cast(3.).sqrt();
        r.mapv(|v| {
            let a = sqrt3 * v;
            (F::one() + a) * F::exp(-a)
        })
    }

    fn differentiability(&self) -> usize {
        1
    }
}

/// Matern 5/2 correlation model
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(into = "String"),
    serde(try_from = "String")
)]
pub struct Matern52Corr();

impl<F: Float> CorrelationModel<F> for Matern52Corr {
    /// (1 + sqrt(5) * r + 5 * r^2 / 3) exp( - sqrt(5) * r )
    fn value(&self, r: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array2<F> {
        let sqrt5 = F::cast(5.).sqrt();
        r.mapv(|v| {
            let a = sqrt5 * v;
            (F::one() + a + a * a / F::cast(3.)) * F::exp(-a)
        })
    }

    fn differentiability(&self) -> usize {
        2
    }
}

macro_rules! declare_corr_util_impls {
    ($corr:ident) => {
        paste! {
            impl fmt::Display for [<$corr Corr>] {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    write!(f, stringify!($corr))
                }
            }

            impl From<[<$corr Corr>]> for String {
                fn from(_item: [<$corr Corr>]) -> Self {
                    stringify!($corr).to_string()
                }
            }

            impl TryFrom<String> for [<$corr Corr>] {
                type Error = &'static str;
                fn try_from(s: String) -> Result<Self, Self::Error> {
                    if s == stringify!($corr) {
                        Ok(Self::default())
                    } else {
                        Err(concat!(
                            "Bad string value for ",
                            stringify!([<$corr Corr>]),
                            ", should be '",
                            stringify!($corr),
                            "'"
                        ))
                    }
                }
            }
        }
    };
}

declare_corr_util_impls!(SquaredExponential);
declare_corr_util_impls!(AbsoluteExponential);
declare_corr_util_impls!(Matern32);
declare_corr_util_impls!(Matern52);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::scaled_distances;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};
    use paste::paste;

    #[test]
    fn test_squared_exponential() {
        let xt = array![[4.5], [1.2], [2.0], [3.0], [4.0]];
        let r = scaled_distances(&xt, &xt, &array![f64::sqrt(5.)]);
        let res = SquaredExponentialCorr::default().value(&r);
        // exp(-0.1 * d^2)
        let expected = array![
            [1., 0.336552878364737, 0.5352614285189903, 0.7985162187593771, 0.9753099120283326],
            [0.336552878364737, 1., 0.9380049995307295, 0.7232502423798424, 0.4565760496233148],
            [0.5352614285189903, 0.9380049995307295, 1., 0.9048374180359595, 0.6703200460356393],
            [0.7985162187593771, 0.7232502423798424, 0.9048374180359595, 1., 0.9048374180359595],
            [0.9753099120283326, 0.4565760496233148, 0.6703200460356393, 0.9048374180359595, 1.]
        ];
        assert_abs_diff_eq!(res, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_matern_values() {
        let r = array![[0., 1.]];
        let m32 = Matern32Corr::default().value(&r);
        let s3 = f64::sqrt(3.);
        assert_abs_diff_eq!(m32, array![[1., (1. + s3) * f64::exp(-s3)]], epsilon = 1e-12);
        let m52 = Matern52Corr::default().value(&r);
        let s5 = f64::sqrt(5.);
        assert_abs_diff_eq!(
            m52,
            array![[1., (1. + s5 + 5. / 3.) * f64::exp(-s5)]],
            epsilon = 1e-12
        );
        let abs = AbsoluteExponentialCorr::default().value(&r);
        assert_abs_diff_eq!(abs, array![[1., f64::exp(-1.)]], epsilon = 1e-12);
    }

    macro_rules! test_correlation {
        ($corr:ident, $order:expr) => {
            paste! {
                #[test]
                fn [<test_corr_ $corr:snake>]() {
                    let corr = [<$corr Corr>]::default();
                    assert_eq!(CorrelationModel::<f64>::differentiability(&corr), $order);

                    let r = Array1::linspace(0., 5., 51).insert_axis(ndarray::Axis(0));
                    let values = CorrelationModel::<f64>::value(&corr, &r);
                    // unit at zero distance and decreasing with distance
                    assert_abs_diff_eq!(values[[0, 0]], 1., epsilon = 1e-15);
                    for w in values.row(0).to_vec().windows(2) {
                        assert!(w[1] < w[0]);
                        assert!(w[1] > 0.);
                    }

                    assert_eq!(stringify!($corr), corr.to_string());
                    let s: String = corr.into();
                    assert_eq!(corr, [<$corr Corr>]::try_from(s).unwrap());
                    assert!([<$corr Corr>]::try_from("Foo".to_string()).is_err());
                }
            }
        };
    }

    test_correlation!(SquaredExponential, INFINITELY_DIFFERENTIABLE);
    test_correlation!(AbsoluteExponential, 0);
    test_correlation!(Matern32, 1);
    test_correlation!(Matern52, 2);
}

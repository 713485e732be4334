use crate::errors::{InverseError, Result};
use beambayes_gaussian::linalg::solve_square;
use beambayes_gaussian::{LinearObservation, MultivariateNormal};
use log::debug;
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix1};

/// Linear map from the beam load `m` to the observed deflections `y = B.K^-1.m`
/// where `K` is the finite difference system matrix and `B` selects observed nodes.
///
/// The effective operator `C = B.K^-1` is computed once by solving `K^T.C^T = B^T`,
/// `K` is never inverted.
#[derive(Clone, Debug)]
pub struct ForwardOperator {
    system_matrix: Array2<f64>,
    observation_matrix: Array2<f64>,
    operator: Array2<f64>,
}

impl ForwardOperator {
    /// Constructor given the system matrix `K` (N, N) and the selection matrix `B` (M, N).
    ///
    /// Fails with [`SingularMatrix`](beambayes_gaussian::GaussianError::SingularMatrix) when `K`
    /// is numerically singular.
    pub fn new(system_matrix: Array2<f64>, observation_matrix: Array2<f64>) -> Result<Self> {
        let n = system_matrix.nrows();
        if observation_matrix.ncols() != n {
            return Err(InverseError::InvalidDataset {
                name: "observation matrix".to_string(),
                reason: format!(
                    "{} columns for a system of size {}",
                    observation_matrix.ncols(),
                    n
                ),
            });
        }
        let operator = solve_square(&system_matrix.t(), &observation_matrix.t())?.reversed_axes();
        debug!(
            "Forward operator {:?}, |C|_max = {:e}",
            operator.dim(),
            operator.iter().fold(0., |acc: f64, v| acc.max(v.abs()))
        );
        Ok(ForwardOperator {
            system_matrix,
            observation_matrix,
            operator,
        })
    }

    /// Effective observation operator `C = B.K^-1` (M, N)
    pub fn operator(&self) -> &Array2<f64> {
        &self.operator
    }

    /// System matrix K
    pub fn system_matrix(&self) -> &Array2<f64> {
        &self.system_matrix
    }

    /// Selection matrix B
    pub fn observation_matrix(&self) -> &Array2<f64> {
        &self.observation_matrix
    }

    /// Number of unknown load values N
    pub fn n_nodes(&self) -> usize {
        self.operator.ncols()
    }

    /// Number of observed deflections M
    pub fn n_observations(&self) -> usize {
        self.operator.nrows()
    }

    /// Observed deflections `C.m` predicted for the load `m`
    pub fn observe(&self, load: &ArrayBase<impl Data<Elem = f64>, Ix1>) -> Result<Array1<f64>> {
        self.check_load(load)?;
        Ok(self.operator.dot(load))
    }

    /// Full deflection field `K^-1.m` for the load `m`
    pub fn deflection(&self, load: &ArrayBase<impl Data<Elem = f64>, Ix1>) -> Result<Array1<f64>> {
        self.check_load(load)?;
        let rhs = load.to_owned().insert_axis(Axis(1));
        Ok(solve_square(&self.system_matrix, &rhs)?.remove_axis(Axis(1)))
    }

    /// Gaussian observation of the deflections `data` (M,) with independent noise
    /// of variance `noise_variance`
    pub fn observation(
        &self,
        data: Array1<f64>,
        noise_variance: f64,
    ) -> Result<LinearObservation<f64>> {
        if data.len() != self.n_observations() {
            return Err(InverseError::InvalidDataset {
                name: "observation data".to_string(),
                reason: format!(
                    "{} values for {} observed nodes",
                    data.len(),
                    self.n_observations()
                ),
            });
        }
        Ok(LinearObservation::isotropic(
            self.operator.to_owned(),
            data,
            noise_variance,
        )?)
    }

    /// Distribution of the observed deflections given a load distribution
    pub fn predictive(&self, load: &MultivariateNormal<f64>) -> Result<MultivariateNormal<f64>> {
        Ok(load.linear_transform(&self.operator)?)
    }

    fn check_load(&self, load: &ArrayBase<impl Data<Elem = f64>, Ix1>) -> Result<()> {
        if load.len() != self.n_nodes() {
            return Err(InverseError::InvalidDataset {
                name: "load".to_string(),
                reason: format!("{} values for {} nodes", load.len(), self.n_nodes()),
            });
        }
        Ok(())
    }
}

/// Gaussian observation of the total load `1^T.m = load_sum` over `n` nodes
/// with noise variance `noise_variance`
pub fn load_sum_observation(
    n: usize,
    load_sum: f64,
    noise_variance: f64,
) -> Result<LinearObservation<f64>> {
    Ok(LinearObservation::scalar(
        Array1::ones(n),
        load_sum,
        noise_variance,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use beambayes_gaussian::GaussianError;
    use ndarray::array;

    fn selection() -> Array2<f64> {
        array![[0., 1., 0., 0.], [0., 0., 0., 1.]]
    }

    #[test]
    fn test_operator_non_symmetric() {
        let k = array![
            [4., 1., 0., 0.],
            [2., 5., 1., 0.],
            [0., 3., 6., 1.],
            [0., 0., 1., 3.]
        ];
        let fwd = ForwardOperator::new(k.clone(), selection()).unwrap();
        // C.K = B
        assert_abs_diff_eq!(fwd.operator().dot(&k), selection(), epsilon = 1e-12);

        let m = array![1., -2., 0.5, 3.];
        let u = fwd.deflection(&m).unwrap();
        assert_abs_diff_eq!(k.dot(&u), m, epsilon = 1e-12);
        assert_abs_diff_eq!(fwd.observe(&m).unwrap(), array![u[1], u[3]], epsilon = 1e-12);
    }

    #[test]
    fn test_singular_system() {
        // free end equation missing
        let k = array![
            [2., -1., 0., 0.],
            [-1., 2., -1., 0.],
            [0., -1., 2., -1.],
            [0., 0., 0., 0.]
        ];
        assert!(matches!(
            ForwardOperator::new(k, selection()),
            Err(InverseError::GaussianError(GaussianError::SingularMatrix(_)))
        ));
    }

    #[test]
    fn test_observations() {
        let fwd = ForwardOperator::new(Array2::eye(4), selection()).unwrap();
        assert_eq!(fwd.n_nodes(), 4);
        assert_eq!(fwd.n_observations(), 2);
        let obs = fwd.observation(array![0.1, -0.2], 1e-6).unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs.noise_cov(), &(Array2::<f64>::eye(2) * 1e-6));
        assert!(fwd.observation(array![0.1], 1e-6).is_err());
        assert!(fwd.observe(&array![1., 2.]).is_err());

        let sum = load_sum_observation(4, 2., 1e-7).unwrap();
        assert_eq!(sum.operator(), &array![[1., 1., 1., 1.]]);
        assert_eq!(sum.data(), &array![2.]);
    }

    #[test]
    fn test_predictive() {
        let fwd = ForwardOperator::new(Array2::<f64>::eye(4) * 2., selection()).unwrap();
        let load = MultivariateNormal::new(array![2., 4., 6., 8.], Array2::eye(4)).unwrap();
        let pred = fwd.predictive(&load).unwrap();
        assert_abs_diff_eq!(pred.mean(), &array![2., 4.], epsilon = 1e-12);
        assert_abs_diff_eq!(pred.cov(), &(Array2::<f64>::eye(2) * 0.25), epsilon = 1e-12);
    }
}

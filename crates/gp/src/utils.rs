use linfa::Float;
use ndarray::{Array1, Array2, ArrayBase, Data, Ix2, Zip};

/// Computes scaled euclidean distances `r_ij = ||(x_i - y_j) / lengthscales||`
/// between each row of x and each row of y,
/// resulting in a 2d array of shape (nrows(x), nrows(y)).
///
/// `lengthscales` has either one value used for every input component
/// or as many values as x and y columns.
///
/// *Panics* if x, y and lengthscales dimensions are not consistent
pub fn scaled_distances<F: Float>(
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    y: &ArrayBase<impl Data<Elem = F>, Ix2>,
    lengthscales: &Array1<F>,
) -> Array2<F> {
    assert!(x.ncols() == y.ncols());
    let scales = if lengthscales.len() == 1 {
        Array1::from_elem(x.ncols(), lengthscales[0])
    } else {
        assert!(lengthscales.len() == x.ncols());
        lengthscales.to_owned()
    };

    let y = y.view();
    let mut r = Array2::zeros((x.nrows(), y.nrows()));
    Zip::from(r.rows_mut())
        .and(x.rows())
        .par_for_each(|mut r_i, x_i| {
            for (r_ij, y_j) in r_i.iter_mut().zip(y.rows()) {
                let d = (&x_i - &y_j) / &scales;
                *r_ij = d.dot(&d).sqrt();
            }
        });
    r
}

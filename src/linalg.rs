use ndarray::{Array1, Array2};

use crate::error::{Result, SurvivalError};

const PIVOT_EPS: f64 = 1e-12;

/// solve `a x = b` by gaussian elimination w/ partial pivoting
pub(crate) fn solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return Err(SurvivalError::invalid_dimensions("matrix dimensions mismatch"));
    }

    let mut lu = a.clone();
    let mut rhs = b.clone();

    // forward elimination
    for i in 0..n {
        let mut max_row = i;
        for k in i + 1..n {
            if lu[[k, i]].abs() > lu[[max_row, i]].abs() {
                max_row = k;
            }
        }

        if lu[[max_row, i]].abs() < PIVOT_EPS || !lu[[max_row, i]].is_finite() {
            return Err(SurvivalError::numerical_error("matrix is singular"));
        }

        if max_row != i {
            for j in 0..n {
                lu.swap([i, j], [max_row, j]);
            }
            rhs.swap(i, max_row);
        }

        for k in i + 1..n {
            let factor = lu[[k, i]] / lu[[i, i]];
            for j in i..n {
                lu[[k, j]] -= factor * lu[[i, j]];
            }
            rhs[k] -= factor * rhs[i];
        }
    }

    // back substitution
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        x[i] = rhs[i];
        for j in i + 1..n {
            x[i] -= lu[[i, j]] * x[j];
        }
        x[i] /= lu[[i, i]];
    }

    Ok(x)
}

/// inverse of a square matrix, one solve per column
pub(crate) fn invert(a: &Array2<f64>) -> Result<Array2<f64>> {
    let n = a.nrows();
    let mut inv = Array2::zeros((n, n));
    for j in 0..n {
        let mut e = Array1::zeros(n);
        e[j] = 1.0;
        inv.column_mut(j).assign(&solve(a, &e)?);
    }
    Ok(inv)
}

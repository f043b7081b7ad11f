use log::warn;
use nalgebra::{DMatrix, DVector};
/// A system of linear equations is said to be poorly conditioned if the solution is sensitive to small
/// changes in the input data. The condition number of a matrix is the ratio of its largest singular value
/// to the smallest one; for a singular matrix it is infinite.
pub fn condition_number(A: &DMatrix<f64>) -> f64 {
    if A.is_empty() {
        return 1.0;
    }
    let singular_values = A.singular_values();
    let max_sigma = singular_values.max();
    let min_sigma = singular_values.min();
    if min_sigma <= 0.0 || !min_sigma.is_finite() {
        f64::INFINITY
    } else {
        max_sigma / min_sigma
    }
}

pub fn poorly_conditioned(A: &DMatrix<f64>, threshold: f64) -> bool {
    let condition_number = condition_number(A);
    let poorly_conditioned = condition_number > threshold;
    if poorly_conditioned {
        warn!(
            "The system of linear equations is poorly conditioned. Condition number = {:.3e}",
            condition_number
        );
    }
    poorly_conditioned
}

/// true if any entry of the matrix or right hand side is NaN or infinite
pub fn has_non_finite(A: &DMatrix<f64>, b: &DVector<f64>) -> bool {
    A.iter().chain(b.iter()).any(|v| !v.is_finite())
}

/// famous example of ill-conditioned matrix
#[cfg(test)]
fn hilbert_matrix(n: usize) -> DMatrix<f64> {
    DMatrix::from_fn(n, n, |i, j| 1.0 / (i as f64 + j as f64 + 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_perfectly_conditioned() {
        let A = DMatrix::<f64>::identity(4, 4);
        assert!((condition_number(&A) - 1.0).abs() < 1e-12);
        assert!(!poorly_conditioned(&A, 1e3));
    }

    #[test]
    fn test_hilbert_is_poorly_conditioned() {
        let A = hilbert_matrix(12);
        assert!(poorly_conditioned(&A, 1e10));
    }

    #[test]
    fn test_singular_matrix_has_infinite_condition() {
        let A = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        assert!(condition_number(&A) > 1e15);
    }

    #[test]
    fn test_non_finite_detection() {
        let A = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, f64::NAN]);
        let b = DVector::from_vec(vec![1.0, 1.0]);
        assert!(has_non_finite(&A, &b));
    }
}

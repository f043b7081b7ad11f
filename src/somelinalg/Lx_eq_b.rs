//! Dense solve of a square linear system `A*w = b`, used for the normal equations of the fitters.
//!
//! Failures (singular or severely ill-conditioned matrices, non-finite data) are returned as
//! `SculptError::SingularSystem` so the caller can decide to regularize and retry.
use crate::errors::SculptError;
use crate::somelinalg::linear_sys_diagnostics::{condition_number, has_non_finite};
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

/// above this condition number the solve is refused
pub const SEVERE_CONDITION: f64 = 1e15;
/// above this condition number the solve goes on but a warning is logged
pub const WARN_CONDITION: f64 = 1e10;

/// LU with partial pivoting. Shape mismatch is a programming error and panics.
pub fn solve_dense(A: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>, SculptError> {
    let (n, m) = A.shape();
    assert_eq!(n, m, "matrix must be square");
    assert_eq!(n, b.len(), "right hand side length must match the matrix");
    if n == 0 {
        return Ok(DVector::zeros(0));
    }
    if has_non_finite(A, b) {
        return Err(SculptError::SingularSystem(
            "matrix or right hand side contains NaN/inf".to_string(),
        ));
    }
    let cond = condition_number(A);
    if cond > SEVERE_CONDITION {
        return Err(SculptError::SingularSystem(format!(
            "matrix is singular or severely ill-conditioned (condition number {:.3e})",
            cond
        )));
    }
    if cond > WARN_CONDITION {
        warn!("poorly conditioned {}x{} system, condition number = {:.3e}", n, n, cond);
    }
    let lu = A.clone().lu();
    let solution = lu.solve(b).ok_or_else(|| {
        SculptError::SingularSystem("LU decomposition met a zero pivot".to_string())
    })?;
    if solution.iter().any(|v| !v.is_finite()) {
        return Err(SculptError::SingularSystem(
            "solution is not finite".to_string(),
        ));
    }
    debug!("solved {}x{} system, condition number = {:.3e}", n, n, cond);
    Ok(solution)
}

/// Tikhonov regularized solve of `(A + lambda*I) w = b`
pub fn solve_regularized(
    A: &DMatrix<f64>,
    b: &DVector<f64>,
    lambda: f64,
) -> Result<DVector<f64>, SculptError> {
    let n = A.nrows();
    let regularized = A + DMatrix::<f64>::identity(n, n) * lambda;
    solve_dense(&regularized, b)
}

//! Least-squares fit of a polynomial surface z = f(x, y).
//!
//! Unlike the 1-D fitter there is no silent degree reduction: with fewer points than basis
//! functions the fit is refused with `SculptError::UnderdeterminedFit`.
use crate::errors::SculptError;
use crate::numerical::geometry::Point3;
use crate::numerical::optimization::fit_quality::{FitQuality, fit_report_table};
use crate::numerical::optimization::poly_fitting::{format_terms, format_terms_exact, monomial};
use crate::somelinalg::Lx_eq_b::solve_regularized;
use itertools::Itertools;
use log::{info, warn};
use nalgebra::{DMatrix, DVector};
use std::cmp::Reverse;

pub const MIN_SURFACE_DEGREE: usize = 1;
pub const MAX_SURFACE_DEGREE: usize = 6;
/// ridge added to the normal equations
pub const SURFACE_RIDGE: f64 = 1e-8;

/// exponent pairs `(i, j)` of `x^i*y^j` with `i + j <= degree`,
/// ordered by total degree, then by descending `i`
pub fn surface_basis(degree: usize) -> Vec<(usize, usize)> {
    (0..=degree)
        .flat_map(|total| (0..=total).rev().map(move |i| (i, total - i)))
        .collect()
}

/// `(d+1)(d+2)/2`
pub fn basis_size(degree: usize) -> usize {
    (degree + 1) * (degree + 2) / 2
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceFit {
    pub basis: Vec<(usize, usize)>,
    pub weights: Vec<f64>,
    pub degree: usize,
    pub quality: FitQuality,
}

impl SurfaceFit {
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        self.basis
            .iter()
            .zip(&self.weights)
            .map(|(&(i, j), w)| w * x.powi(i as i32) * y.powi(j as i32))
            .sum()
    }

    pub fn to_expression_string(&self) -> String {
        format_surface(&self.basis, &self.weights)
    }

    /// full-precision text, compiles back to exactly `evaluate`
    pub fn to_exact_expression_string(&self) -> String {
        format_surface_exact(&self.basis, &self.weights)
    }

    pub fn report(&self) -> String {
        fit_report_table("polynomial 2D", &self.to_expression_string(), self.degree, &self.quality)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialFitter2D {
    degree: usize,
    ridge: f64,
}

impl PolynomialFitter2D {
    /// degree is clamped to `[MIN_SURFACE_DEGREE, MAX_SURFACE_DEGREE]`
    pub fn new(degree: usize) -> Self {
        PolynomialFitter2D {
            degree: degree.clamp(MIN_SURFACE_DEGREE, MAX_SURFACE_DEGREE),
            ridge: SURFACE_RIDGE,
        }
    }

    pub fn with_ridge(mut self, ridge: f64) -> Self {
        assert!(ridge >= 0.0, "ridge must be non-negative");
        self.ridge = ridge;
        self
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn ridge(&self) -> f64 {
        self.ridge
    }

    /// fits `z = f(x, y)` to the finite points in `points`
    pub fn fit(&self, points: &[Point3]) -> Result<SurfaceFit, SculptError> {
        let finite = points.iter().filter(|p| p.is_finite()).collect_vec();
        if finite.len() < points.len() {
            warn!("ignored {} non-finite points", points.len() - finite.len());
        }
        let basis = surface_basis(self.degree);
        let (n, m) = (finite.len(), basis.len());
        if n < m {
            let error = SculptError::UnderdeterminedFit { got: n, required: m };
            warn!("surface fit of degree {}: {}", self.degree, error);
            return Err(error);
        }
        let A = DMatrix::from_fn(n, m, |row, col| {
            let (i, j) = basis[col];
            finite[row].x.powi(i as i32) * finite[row].y.powi(j as i32)
        });
        let z = DVector::from_iterator(n, finite.iter().map(|p| p.z));
        let At = A.transpose();
        let weights = solve_regularized(&(&At * &A), &(&At * &z), self.ridge).inspect_err(|e| {
            warn!("surface fit of degree {} failed: {}", self.degree, e);
        })?;

        let predicted = (&A * &weights).as_slice().to_vec();
        let quality = FitQuality::from_residuals(z.as_slice(), &predicted);
        info!(
            "fitted degree {} surface to {} points, R^2 = {:.6}",
            self.degree, n, quality.r_squared
        );
        Ok(SurfaceFit {
            basis,
            weights: weights.as_slice().to_vec(),
            degree: self.degree,
            quality,
        })
    }
}

/// renders `Σ w * x^i*y^j`, highest total degree first, with the 1-D rounding rules
pub fn format_surface(basis: &[(usize, usize)], weights: &[f64]) -> String {
    format_terms(surface_terms(basis, weights))
}

/// same ordering as `format_surface` with the weights written at full precision
pub fn format_surface_exact(basis: &[(usize, usize)], weights: &[f64]) -> String {
    format_terms_exact(surface_terms(basis, weights))
}

fn surface_terms(basis: &[(usize, usize)], weights: &[f64]) -> Vec<(f64, String)> {
    assert_eq!(basis.len(), weights.len());
    basis
        .iter()
        .zip(weights)
        .sorted_by_key(|((i, j), _)| (Reverse(i + j), Reverse(*i)))
        .map(|(&(i, j), &w)| {
            let factors = [monomial("x", i), monomial("y", j)]
                .into_iter()
                .filter(|f| !f.is_empty())
                .join("*");
            (w, factors)
        })
        .collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::expression::{ExpressionCompiler, FailureValue};
    use crate::symbolic::utils::linspace;
    use approx::assert_relative_eq;

    fn grid(f: impl Fn(f64, f64) -> f64, n: usize) -> Vec<Point3> {
        let axis = linspace(-2.0, 2.0, n);
        axis.iter()
            .flat_map(|&x| axis.iter().map(move |&y| (x, y)))
            .map(|(x, y)| Point3::new(x, y, f(x, y)))
            .collect()
    }

    #[test]
    fn test_basis_order_and_size() {
        assert_eq!(
            surface_basis(2),
            vec![(0, 0), (1, 0), (0, 1), (2, 0), (1, 1), (0, 2)]
        );
        for d in 1..=6 {
            assert_eq!(surface_basis(d).len(), basis_size(d));
        }
    }

    #[test]
    fn test_too_few_points_is_explicit_failure() {
        let points = grid(|x, y| x + y, 3).into_iter().take(5).collect_vec();
        let res = PolynomialFitter2D::new(2).fit(&points);
        let err = res.unwrap_err();
        assert_eq!(err, SculptError::UnderdeterminedFit { got: 5, required: 6 });
        let reason = err.to_string();
        assert!(reason.contains('5') && reason.contains('6'), "{}", reason);
    }

    #[test]
    fn test_recovers_quadratic_surface() {
        let points = grid(|x, y| 1.0 + 2.0 * x - y + 0.5 * x * y - 3.0 * y * y, 5);
        let fit = PolynomialFitter2D::new(2).fit(&points).unwrap();
        let expected = [1.0, 2.0, -1.0, 0.0, 0.5, -3.0];
        for (w, e) in fit.weights.iter().zip(expected) {
            assert_relative_eq!(*w, e, epsilon = 1e-6);
        }
        assert_relative_eq!(fit.evaluate(1.5, -0.5), 1.0 + 3.0 + 0.5 - 0.375 - 0.75, epsilon = 1e-6);
        assert!(fit.quality.r_squared > 0.999999);
    }

    #[test]
    fn test_degree_is_clamped_to_range() {
        assert_eq!(PolynomialFitter2D::new(0).degree(), 1);
        assert_eq!(PolynomialFitter2D::new(9).degree(), 6);
    }

    #[test]
    fn test_non_finite_points_are_ignored() {
        let mut points = grid(|x, y| x - y, 3);
        points.push(Point3::new(f64::NAN, 0.0, 1.0));
        let fit = PolynomialFitter2D::new(1).fit(&points).unwrap();
        assert_eq!(fit.quality.n_points, 9);
    }

    #[test]
    fn test_format_surface() {
        let basis = surface_basis(2);
        assert_eq!(
            format_surface(&basis, &[1.0, 0.0, -1.0, 0.0, 0.5, -3.0]),
            "0.5*x*y - 3*y^2 - y + 1"
        );
        assert_eq!(format_surface(&basis, &[0.0, 1e-13, 0.0, 1.0, 0.0, 0.0]), "x^2");
        assert_eq!(format_surface(&basis, &[0.0; 6]), "0");
    }

    #[test]
    fn test_synthesized_surface_text_matches_fit() {
        let points = grid(|x, y| (x * y).sin(), 6);
        let fit = PolynomialFitter2D::new(3).fit(&points).unwrap();
        let e = ExpressionCompiler::new(&["x", "y"], FailureValue::Undefined)
            .compile(&fit.to_expression_string());
        assert!(e.is_ok());
        for (x, y) in [(0.3, -0.7), (1.1, 0.4), (-1.9, 1.2)] {
            assert_relative_eq!(e.eval(&[x, y]), fit.evaluate(x, y), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_exact_text_matches_fit_far_from_origin() {
        let points: Vec<Point3> = linspace(-5.0, 5.0, 12)
            .into_iter()
            .flat_map(|x| {
                linspace(-5.0, 5.0, 12)
                    .into_iter()
                    .map(move |y| Point3::new(x, y, (0.37 * x).sin() * (0.21 * y).cos() + 1.0 / 3.0))
            })
            .collect();
        let fit = PolynomialFitter2D::new(6).fit(&points).unwrap();
        let e = ExpressionCompiler::new(&["x", "y"], FailureValue::Undefined)
            .compile(&fit.to_exact_expression_string());
        assert!(e.is_ok());
        for (x, y) in [(5.0, 5.0), (-4.7, 4.9), (4.2, -5.0), (0.0, 0.0)] {
            assert_relative_eq!(e.eval(&[x, y]), fit.evaluate(x, y), epsilon = 1e-7);
        }
    }
}

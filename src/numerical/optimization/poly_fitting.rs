//! Least-squares fit of a polynomial y = f(x) to scattered points.
//!
//! The Vandermonde matrix `V[n][k] = x_n^k` is built for `k = 0..d_eff` with
//! `d_eff = min(d, n - 1)`, so a fit is never attempted with fewer points than coefficients.
//! The normal equations `VᵗV c = Vᵗy` are solved densely; coefficients are ordered from
//! the constant term up.
//!
//! # Example
//! ```
//! use RustedSculpt::numerical::optimization::poly_fitting::PolynomialFitter1D;
//! let x = vec![0.0, 1.0, 2.0, 3.0];
//! let y: Vec<f64> = x.iter().map(|x| 1.0 + 2.0 * x * x).collect();
//! let fit = PolynomialFitter1D::new(2).fit(&x, &y).unwrap();
//! assert_eq!(fit.to_expression_string("x"), "2*x^2 + 1");
//! ```
use crate::errors::SculptError;
use crate::numerical::optimization::fit_quality::{FitQuality, fit_report_table};
use crate::somelinalg::Lx_eq_b::solve_dense;
use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};

pub const MIN_CURVE_DEGREE: usize = 1;
pub const MAX_CURVE_DEGREE: usize = 8;
/// coefficients below this magnitude are noise and never printed
pub const DROP_THRESHOLD: f64 = 1e-12;
/// coefficients are rounded to this many decimals for display
pub const DISPLAY_DECIMALS: i32 = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct PolyFit1D {
    /// low to high power
    pub coefficients: Vec<f64>,
    /// effective degree after clamping to the number of points
    pub degree: usize,
    pub requested_degree: usize,
    pub quality: FitQuality,
}

impl PolyFit1D {
    /// Horner evaluation
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    pub fn to_expression_string(&self, var: &str) -> String {
        format_polynomial(&self.coefficients, var)
    }

    pub fn report(&self, var: &str) -> String {
        fit_report_table("polynomial 1D", &self.to_expression_string(var), self.degree, &self.quality)
    }
}

/// Stateless fitter; the only configuration is the requested degree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialFitter1D {
    degree: usize,
}

impl PolynomialFitter1D {
    /// degree is clamped to `[MIN_CURVE_DEGREE, MAX_CURVE_DEGREE]`
    pub fn new(degree: usize) -> Self {
        PolynomialFitter1D {
            degree: degree.clamp(MIN_CURVE_DEGREE, MAX_CURVE_DEGREE),
        }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// `x` and `y` must have equal length (panics otherwise). Points with a non-finite
    /// coordinate are skipped.
    pub fn fit(&self, x: &[f64], y: &[f64]) -> Result<PolyFit1D, SculptError> {
        assert_eq!(x.len(), y.len(), "x and y must have the same length");
        let (xs, ys): (Vec<f64>, Vec<f64>) = x
            .iter()
            .zip(y)
            .filter(|(a, b)| a.is_finite() && b.is_finite())
            .map(|(a, b)| (*a, *b))
            .unzip();
        if xs.is_empty() {
            return Err(if x.is_empty() {
                SculptError::UnderdeterminedFit { got: 0, required: 1 }
            } else {
                SculptError::NonFiniteData("no finite points to fit".to_string())
            });
        }
        if xs.len() < x.len() {
            warn!("skipped {} non-finite points", x.len() - xs.len());
        }
        let n = xs.len();
        let degree = self.degree.min(n - 1);
        if degree < self.degree {
            debug!(
                "degree {} clamped to {} for {} points",
                self.degree, degree, n
            );
        }
        let V = vandermonde(&xs, degree);
        let Vt = V.transpose();
        let A = &Vt * &V;
        let b = &Vt * DVector::from_column_slice(&ys);
        let coefficients = solve_dense(&A, &b).inspect_err(|e| {
            warn!("polynomial fit of degree {} failed: {}", degree, e);
        })?;

        let mut fit = PolyFit1D {
            coefficients: coefficients.as_slice().to_vec(),
            degree,
            requested_degree: self.degree,
            quality: FitQuality::from_residuals(&[], &[]),
        };
        let predicted: Vec<f64> = xs.iter().map(|&x| fit.evaluate(x)).collect();
        fit.quality = FitQuality::from_residuals(&ys, &predicted);
        info!(
            "fitted degree {} polynomial to {} points, R^2 = {:.6}",
            degree, n, fit.quality.r_squared
        );
        Ok(fit)
    }
}

/// `V[n][k] = x_n^k`, `k = 0..=degree`
pub fn vandermonde(x: &[f64], degree: usize) -> DMatrix<f64> {
    DMatrix::from_fn(x.len(), degree + 1, |n, k| x[n].powi(k as i32))
}

/// rounding applied before printing so that 1.00000000001 prints as 1
pub fn round_for_display(c: f64) -> f64 {
    let scale = 10f64.powi(DISPLAY_DECIMALS);
    (c * scale).round() / scale
}

/// Joins `(coefficient, monomial)` pairs into a sum; an empty monomial is the constant term.
/// Near-zero coefficients are dropped and a unit coefficient is not written as a factor.
pub fn format_terms<I>(terms: I) -> String
where
    I: IntoIterator<Item = (f64, String)>,
{
    join_terms(terms, round_for_display)
}

/// `format_terms` without display rounding, for text that is compiled back and stored
pub fn format_terms_exact<I>(terms: I) -> String
where
    I: IntoIterator<Item = (f64, String)>,
{
    join_terms(terms, |c| c)
}

fn join_terms<I>(terms: I, round: impl Fn(f64) -> f64) -> String
where
    I: IntoIterator<Item = (f64, String)>,
{
    let mut out = String::new();
    for (c, monomial) in terms {
        if !(c.abs() >= DROP_THRESHOLD) {
            continue;
        }
        let rounded = round(c);
        if rounded == 0.0 {
            continue;
        }
        let magnitude = rounded.abs();
        let body = if monomial.is_empty() {
            format!("{}", magnitude)
        } else if magnitude == 1.0 {
            monomial
        } else {
            format!("{}*{}", magnitude, monomial)
        };
        if out.is_empty() {
            if rounded < 0.0 {
                out.push('-');
            }
        } else {
            out.push_str(if rounded < 0.0 { " - " } else { " + " });
        }
        out.push_str(&body);
    }
    if out.is_empty() { "0".to_string() } else { out }
}

/// `x`, `x^2`, ...; empty for the zeroth power
pub fn monomial(var: &str, power: usize) -> String {
    match power {
        0 => String::new(),
        1 => var.to_string(),
        p => format!("{}^{}", var, p),
    }
}

/// human-readable polynomial, highest power first; coefficients are given low to high
pub fn format_polynomial(coefficients: &[f64], var: &str) -> String {
    format_terms(
        coefficients
            .iter()
            .enumerate()
            .rev()
            .map(|(k, &c)| (c, monomial(var, k))),
    )
}

//! Sampling of compiled expressions on a domain, for plotting and for refits.
use crate::errors::SculptError;
use crate::numerical::deformation::kernel_deformer::{DeformationField, ParametricCurve};
use crate::numerical::geometry::{Point2, Point3};
use crate::symbolic::expression::Expression;
use crate::symbolic::utils;
use log::debug;

/// plotted curves need more than this many samples
pub const MIN_CURVE_SAMPLES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub fn new(min: f64, max: f64) -> Result<Self, SculptError> {
        if !(min.is_finite() && max.is_finite() && max > min) {
            return Err(SculptError::InvalidConfig(format!(
                "domain needs finite bounds with max > min, got [{}, {}]",
                min, max
            )));
        }
        Ok(Domain { min, max })
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// `n` evenly spaced values including both bounds
pub fn linspace(domain: &Domain, n: usize) -> Vec<f64> {
    utils::linspace(domain.min, domain.max, n)
}

fn check_samples(n: usize) -> Result<(), SculptError> {
    if n <= MIN_CURVE_SAMPLES {
        return Err(SculptError::InvalidConfig(format!(
            "curve plotting needs more than {} samples, got {}",
            MIN_CURVE_SAMPLES, n
        )));
    }
    Ok(())
}

/// Samples `y = f(x)`; points where `f` fails carry the expression's failure value as `y`
/// (NaN for plotted curves).
pub fn sample_explicit(
    expression: &Expression,
    domain: &Domain,
    n: usize,
) -> Result<Vec<Point2>, SculptError> {
    check_samples(n)?;
    Ok(linspace(domain, n)
        .into_iter()
        .map(|x| Point2::new(x, expression.eval(&[x])))
        .collect())
}

/// contiguous runs of finite points; a broken curve becomes several polylines
pub fn split_segments(points: &[Point2]) -> Vec<Vec<Point2>> {
    let segments: Vec<Vec<Point2>> = points
        .split(|p| !p.is_finite())
        .filter(|run| !run.is_empty())
        .map(|run| run.to_vec())
        .collect();
    if segments.len() > 1 {
        debug!("curve breaks into {} segments", segments.len());
    }
    segments
}

/// samples `base(t) + Δ(t)`, or just `base(t)` without an active field
pub fn sample_parametric(
    curve: &ParametricCurve,
    field: Option<&DeformationField>,
    domain: &Domain,
    n: usize,
) -> Result<Vec<Point3>, SculptError> {
    check_samples(n)?;
    Ok(linspace(domain, n)
        .into_iter()
        .map(|t| match field {
            Some(field) => field.deformed(curve, t),
            None => curve.eval(t),
        })
        .collect())
}

/// `n × n` grid of `z = f(x, y)`, row-major with `y` constant along a row
pub fn sample_surface(
    expression: &Expression,
    x_domain: &Domain,
    y_domain: &Domain,
    n: usize,
) -> Result<Vec<Point3>, SculptError> {
    if n < 2 {
        return Err(SculptError::InvalidConfig(format!(
            "surface grid needs at least 2 points per side, got {}",
            n
        )));
    }
    let xs = linspace(x_domain, n);
    Ok(linspace(y_domain, n)
        .into_iter()
        .flat_map(|y| xs.iter().map(move |&x| Point3::new(x, y, expression.eval(&[x, y]))))
        .collect())
}

/// finite `(x, f(x))` samples to feed a refit
pub fn fitting_data_from_expression(
    expression: &Expression,
    domain: &Domain,
    n: usize,
) -> (Vec<f64>, Vec<f64>) {
    linspace(domain, n)
        .into_iter()
        .filter_map(|x| expression.try_eval(&[x]).map(|y| (x, y)))
        .unzip()
}

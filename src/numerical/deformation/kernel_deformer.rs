//! Gaussian kernel deformation of a parametric curve from sparse markers.
//!
//! For every axis the residuals `δ_i = target_i − base(t_i)` are blended as
//!
//! `Δ(t) = Σ δ_i w_i(t) / (Σ w_i(t) + ε)`,  `w_i(t) = exp(−((t − t_i)/σ)²)`
//!
//! and the deformed curve is `base(t) + Δ(t)`. For σ → 0⁺ the field interpolates the
//! residuals at the markers; between widely spaced markers it may overshoot.
use crate::errors::SculptError;
use crate::numerical::geometry::{Axis, Marker, Point3};
use crate::symbolic::expression::{Expression, ExpressionCompiler, FailureValue};
use log::debug;
use strum::IntoEnumIterator;

/// keeps the field finite far away from every marker
pub const DEFAULT_KERNEL_EPSILON: f64 = 1e-9;

/// Base curve `(x(t), y(t), z(t))`, each axis an `Expression` over the same parameter.
#[derive(Debug, Clone)]
pub struct ParametricCurve {
    param: String,
    x: Expression,
    y: Expression,
    z: Expression,
}

impl ParametricCurve {
    /// Deformation baselines use `FailureValue::Zero` so the arithmetic stays finite.
    pub fn new(param: &str, x: &str, y: &str, z: &str) -> Self {
        Self::with_failure(param, x, y, z, FailureValue::Zero)
    }

    pub fn with_failure(param: &str, x: &str, y: &str, z: &str, failure: FailureValue) -> Self {
        let compiler = ExpressionCompiler::new(&[param], failure);
        ParametricCurve {
            param: param.to_string(),
            x: compiler.compile(x),
            y: compiler.compile(y),
            z: compiler.compile(z),
        }
    }

    /// the explicit curve `y = f(var)` seen as `(var, f(var), 0)`
    pub fn explicit(var: &str, f: &str) -> Self {
        ParametricCurve::new(var, var, f, "0")
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    pub fn axis(&self, axis: Axis) -> &Expression {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    pub fn eval(&self, t: f64) -> Point3 {
        Point3::from_axes(|axis| self.axis(axis).eval(&[t]))
    }

    /// the same texts compiled with another failure policy
    pub fn recompiled(&self, failure: FailureValue) -> ParametricCurve {
        ParametricCurve {
            param: self.param.clone(),
            x: self.x.with_failure(failure),
            y: self.y.with_failure(failure),
            z: self.z.with_failure(failure),
        }
    }

    /// parse errors of the axes that failed to compile
    pub fn errors(&self) -> Vec<&SculptError> {
        Axis::iter().filter_map(|axis| self.axis(axis).error()).collect()
    }
}

/// Field of one axis; `nodes` are `(t_i, δ_i)`.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisField {
    nodes: Vec<(f64, f64)>,
    sigma: f64,
    epsilon: f64,
}

impl AxisField {
    pub fn new(nodes: Vec<(f64, f64)>, sigma: f64, epsilon: f64) -> Self {
        assert!(sigma > 0.0, "kernel bandwidth must be positive");
        AxisField { nodes, sigma, epsilon }
    }

    pub fn nodes(&self) -> &[(f64, f64)] {
        &self.nodes
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        let (num, den) = self.nodes.iter().fold((0.0, 0.0), |(num, den), &(ti, delta)| {
            let w = gaussian_weight(t, ti, self.sigma);
            (num + delta * w, den + w)
        });
        num / (den + self.epsilon)
    }
}

/// `exp(−((t − ti)/σ)²)`
pub fn gaussian_weight(t: f64, ti: f64, sigma: f64) -> f64 {
    (-((t - ti) / sigma).powi(2)).exp()
}

/// Displacement field of a curve. Built per call and never stored by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct DeformationField {
    x: AxisField,
    y: AxisField,
    z: AxisField,
}

impl DeformationField {
    pub fn axis(&self, axis: Axis) -> &AxisField {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    pub fn displacement(&self, t: f64) -> Point3 {
        Point3::from_axes(|axis| self.axis(axis).evaluate(t))
    }

    pub fn deformed(&self, curve: &ParametricCurve, t: f64) -> Point3 {
        curve.eval(t) + self.displacement(t)
    }

    pub fn sigma(&self) -> f64 {
        self.x.sigma
    }

    pub fn epsilon(&self) -> f64 {
        self.x.epsilon
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelDeformer {
    sigma: f64,
    epsilon: f64,
}

impl KernelDeformer {
    pub fn new(sigma: f64, epsilon: f64) -> Result<Self, SculptError> {
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(SculptError::InvalidConfig(format!(
                "kernel bandwidth must be positive, got {}",
                sigma
            )));
        }
        if !(epsilon >= 0.0 && epsilon.is_finite()) {
            return Err(SculptError::InvalidConfig(format!(
                "kernel epsilon must be non-negative, got {}",
                epsilon
            )));
        }
        Ok(KernelDeformer { sigma, epsilon })
    }

    pub fn with_sigma(sigma: f64) -> Result<Self, SculptError> {
        KernelDeformer::new(sigma, DEFAULT_KERNEL_EPSILON)
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// field of a single axis from `(t_i, δ_i)` pairs
    pub fn axis_field(&self, nodes: Vec<(f64, f64)>) -> AxisField {
        AxisField::new(nodes, self.sigma, self.epsilon)
    }

    /// Residual field of `markers` against `base`. `None` means the deformer is inactive
    /// (fewer than two markers with a usable `t`) and the caller should evaluate its
    /// current expression directly.
    pub fn build_field(&self, base: &ParametricCurve, markers: &[Marker]) -> Option<DeformationField> {
        let active: Vec<(f64, Point3)> = markers
            .iter()
            .filter(|m| m.position.is_finite())
            .filter_map(|m| m.parameter().map(|t| (t, m.position)))
            .collect();
        if active.len() < 2 {
            return None;
        }
        let residuals: Vec<(f64, Point3)> = active
            .into_iter()
            .map(|(t, target)| (t, target - base.eval(t)))
            .collect();
        debug!("deformation field from {} markers, sigma = {}", residuals.len(), self.sigma);
        let nodes = |axis: Axis| residuals.iter().map(|(t, d)| (*t, d.get(axis))).collect();
        Some(DeformationField {
            x: self.axis_field(nodes(Axis::X)),
            y: self.axis_field(nodes(Axis::Y)),
            z: self.axis_field(nodes(Axis::Z)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::geometry::MarkerId;
    use approx::assert_relative_eq;

    #[test]
    fn test_kernel_interpolates_at_markers() {
        let deformer = KernelDeformer::with_sigma(0.1).unwrap();
        let field = deformer.axis_field(vec![(0.0, 1.0), (2.0, -1.0)]);
        assert_relative_eq!(field.evaluate(0.0), 1.0, epsilon = 1e-3);
        assert_relative_eq!(field.evaluate(2.0), -1.0, epsilon = 1e-3);
        let mid = field.evaluate(1.0);
        assert!(mid > -1.0 && mid < 1.0, "{}", mid);
    }

    #[test]
    fn test_field_vanishes_far_from_markers() {
        let deformer = KernelDeformer::with_sigma(0.1).unwrap();
        let field = deformer.axis_field(vec![(0.0, 1.0), (0.5, 1.0)]);
        assert_eq!(field.evaluate(50.0), 0.0);
    }

    #[test]
    fn test_invalid_bandwidth_is_rejected() {
        assert!(KernelDeformer::new(0.0, 1e-9).is_err());
        assert!(KernelDeformer::new(-1.0, 1e-9).is_err());
        assert!(KernelDeformer::new(f64::NAN, 1e-9).is_err());
        assert!(KernelDeformer::new(0.5, -1.0).is_err());
    }

    #[test]
    fn test_inactive_with_fewer_than_two_parametrized_markers() {
        let curve = ParametricCurve::explicit("t", "t^2");
        let deformer = KernelDeformer::with_sigma(0.3).unwrap();
        let markers = [
            Marker::new(MarkerId(0), Point3::new(0.0, 1.0, 0.0), Some(0.0)),
            Marker::new(MarkerId(1), Point3::new(1.0, 2.0, 0.0), None),
            Marker::new(MarkerId(2), Point3::new(1.0, 2.0, 0.0), Some(f64::NAN)),
        ];
        assert!(deformer.build_field(&curve, &markers).is_none());
    }

    #[test]
    fn test_residuals_are_taken_against_base() {
        let curve = ParametricCurve::explicit("t", "t^2");
        let deformer = KernelDeformer::with_sigma(0.05).unwrap();
        let markers = [
            Marker::new(MarkerId(0), Point3::new(0.0, 0.5, 0.0), Some(0.0)),
            Marker::new(MarkerId(1), Point3::new(1.0, 1.0, 0.25), Some(1.0)),
        ];
        let field = deformer.build_field(&curve, &markers).unwrap();
        assert_eq!(field.axis(Axis::Y).nodes(), &[(0.0, 0.5), (1.0, 0.0)]);
        let p = field.deformed(&curve, 1.0);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, 0.25, epsilon = 1e-6);
        let p = field.deformed(&curve, 0.0);
        assert_relative_eq!(p.y, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_broken_base_axis_evaluates_to_zero() {
        let curve = ParametricCurve::new("t", "cos(t)", "sin(t", "t");
        assert_eq!(curve.errors().len(), 1);
        let p = curve.eval(0.0);
        assert_eq!(p, Point3::new(1.0, 0.0, 0.0));
    }
}

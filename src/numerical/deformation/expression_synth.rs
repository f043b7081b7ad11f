//! Turns a deformation field into plain expression text.
//!
//! The kernel correction of every axis is written out as an explicit ratio of sums,
//! `(base) + ((num)/(den))`, with the same residuals, bandwidth and ε as the live field.
//! Numbers use Rust's shortest round-trip formatting, so compiling the text gives back
//! the values of the closure and the result can be stored without the marker list.
use crate::errors::SculptError;
use crate::numerical::deformation::kernel_deformer::{
    DeformationField, KernelDeformer, ParametricCurve,
};
use crate::numerical::geometry::Axis;
use crate::symbolic::expression::FailureValue;
use itertools::Itertools;
use log::info;

/// residuals below this magnitude are dropped from the numerator
pub const RESIDUAL_THRESHOLD: f64 = 1e-12;

/// committed curve as text, ready to be persisted or compiled again
#[derive(Debug, Clone, PartialEq)]
pub struct ParametricCurveText {
    pub param: String,
    pub x: String,
    pub y: String,
    pub z: String,
}

impl ParametricCurveText {
    pub fn axis(&self, axis: Axis) -> &str {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    pub fn compile(&self, failure: FailureValue) -> ParametricCurve {
        ParametricCurve::with_failure(&self.param, &self.x, &self.y, &self.z, failure)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpressionSynthesizer {
    sigma: f64,
    epsilon: f64,
}

impl From<&KernelDeformer> for ExpressionSynthesizer {
    fn from(deformer: &KernelDeformer) -> Self {
        ExpressionSynthesizer {
            sigma: deformer.sigma(),
            epsilon: deformer.epsilon(),
        }
    }
}

impl ExpressionSynthesizer {
    pub fn new(sigma: f64, epsilon: f64) -> Result<Self, SculptError> {
        KernelDeformer::new(sigma, epsilon).map(|deformer| ExpressionSynthesizer::from(&deformer))
    }

    /// `exp(-(((t)-(t_i))/σ)^2)`
    fn weight_term(&self, param: &str, ti: f64) -> String {
        format!("exp(-((({})-({}))/{})^2)", param, ti, self.sigma)
    }

    /// `(base) + ((num)/(den))` for residuals `(t_i, δ_i)`
    pub fn synthesize_axis(&self, base: &str, param: &str, residuals: &[(f64, f64)]) -> String {
        let numerator = residuals
            .iter()
            .filter(|(_, delta)| delta.abs() >= RESIDUAL_THRESHOLD)
            .map(|&(ti, delta)| format!("({})*{}", delta, self.weight_term(param, ti)))
            .join(" + ");
        let numerator = if numerator.is_empty() { "0".to_string() } else { numerator };
        let denominator = residuals
            .iter()
            .map(|&(ti, _)| self.weight_term(param, ti))
            .chain(std::iter::once(format!("{}", self.epsilon)))
            .join(" + ");
        format!("({}) + (({})/({}))", base, numerator, denominator)
    }

    /// All three axes of `curve` with the corrections of `field`. An axis whose base failed
    /// to compile contributes `0`, which is what it evaluated to as a baseline.
    pub fn synthesize_curve(
        &self,
        curve: &ParametricCurve,
        field: &DeformationField,
    ) -> ParametricCurveText {
        let param = curve.param();
        let axis_text = |axis: Axis| {
            let base = curve.axis(axis);
            let base_text = if base.is_ok() { base.rhs().trim() } else { "0" };
            self.synthesize_axis(base_text, param, field.axis(axis).nodes())
        };
        let text = ParametricCurveText {
            param: param.to_string(),
            x: axis_text(Axis::X),
            y: axis_text(Axis::Y),
            z: axis_text(Axis::Z),
        };
        info!(
            "synthesized curve from {} markers",
            field.axis(Axis::X).nodes().len()
        );
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::expression::ExpressionCompiler;

    #[test]
    fn test_axis_text_shape() {
        let synth = ExpressionSynthesizer::new(0.5, 1e-9).unwrap();
        let text = synth.synthesize_axis("t^2", "t", &[(0.0, 1.0), (1.5, 0.0)]);
        assert_eq!(
            text,
            "(t^2) + (((1)*exp(-(((t)-(0))/0.5)^2))/(exp(-(((t)-(0))/0.5)^2) + exp(-(((t)-(1.5))/0.5)^2) + 0.000000001))"
        );
    }

    #[test]
    fn test_no_surviving_residual_gives_zero_numerator() {
        let synth = ExpressionSynthesizer::new(0.5, 1e-9).unwrap();
        let text = synth.synthesize_axis("sin(t)", "t", &[(0.0, 1e-13), (1.0, -1e-14)]);
        assert!(text.starts_with("(sin(t)) + ((0)/("), "{}", text);
        let e = ExpressionCompiler::new(&["t"], FailureValue::Undefined).compile(&text);
        assert_eq!(e.eval(&[0.7]), 0.7f64.sin());
    }

    #[test]
    fn test_negative_parameters_are_bracketed() {
        let synth = ExpressionSynthesizer::new(0.25, 0.0).unwrap();
        let text = synth.synthesize_axis("0", "s", &[(-1.0, -2.0), (1.0, 3.0)]);
        let e = ExpressionCompiler::new(&["s"], FailureValue::Undefined).compile(&text);
        assert!(e.is_ok(), "{:?}", e.error());
    }
}

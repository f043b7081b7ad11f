//! Numeric configuration of the engine, read from TOML.
//!
//! ```toml
//! [fit]
//! curve_degree = 3
//! surface_degree = 2
//! ridge_lambda = 1e-8
//!
//! [kernel]
//! sigma = 0.3
//! epsilon = 1e-9
//!
//! [interaction]
//! max_delta = 1.0
//!
//! [sampling]
//! curve_samples = 200
//! surface_grid = 30
//! domain_min = -5.0
//! domain_max = 5.0
//!
//! [log]
//! level = "info"
//! ```
//! Missing keys keep their defaults, unknown keys are ignored.
use crate::errors::SculptError;
use crate::numerical::deformation::displacement_clamp::DisplacementClamp;
use crate::numerical::deformation::expression_synth::ExpressionSynthesizer;
use crate::numerical::deformation::kernel_deformer::KernelDeformer;
use crate::numerical::optimization::poly_fitting::PolynomialFitter1D;
use crate::numerical::optimization::surface_fitting::PolynomialFitter2D;
use crate::numerical::sampling::{Domain, MIN_CURVE_SAMPLES};
use std::path::Path;
use std::str::FromStr;
use strum_macros::{Display, EnumString};
use toml::{Table, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SculptConfig {
    pub curve_degree: usize,
    pub surface_degree: usize,
    pub ridge_lambda: f64,
    pub kernel_sigma: f64,
    pub kernel_epsilon: f64,
    pub max_delta: f64,
    pub curve_samples: usize,
    pub surface_grid: usize,
    pub domain_min: f64,
    pub domain_max: f64,
    pub log_level: LogLevel,
}

impl Default for SculptConfig {
    fn default() -> Self {
        SculptConfig {
            curve_degree: 3,
            surface_degree: 2,
            ridge_lambda: 1e-8,
            kernel_sigma: 0.3,
            kernel_epsilon: 1e-9,
            max_delta: 1.0,
            curve_samples: 200,
            surface_grid: 30,
            domain_min: -5.0,
            domain_max: 5.0,
            log_level: LogLevel::Info,
        }
    }
}

fn invalid(message: String) -> SculptError {
    SculptError::InvalidConfig(message)
}

fn section<'a>(table: &'a Table, name: &str) -> Result<Option<&'a Table>, SculptError> {
    match table.get(name) {
        None => Ok(None),
        Some(Value::Table(t)) => Ok(Some(t)),
        Some(_) => Err(invalid(format!("[{}] must be a table", name))),
    }
}

fn read_float(table: Option<&Table>, key: &str, target: &mut f64) -> Result<(), SculptError> {
    match table.and_then(|t| t.get(key)) {
        None => Ok(()),
        Some(Value::Float(v)) => {
            *target = *v;
            Ok(())
        }
        Some(Value::Integer(v)) => {
            *target = *v as f64;
            Ok(())
        }
        Some(other) => Err(invalid(format!("'{}' must be a number, got {}", key, other))),
    }
}

fn read_count(table: Option<&Table>, key: &str, target: &mut usize) -> Result<(), SculptError> {
    match table.and_then(|t| t.get(key)) {
        None => Ok(()),
        Some(Value::Integer(v)) => {
            *target = usize::try_from(*v)
                .map_err(|_| invalid(format!("'{}' must be non-negative, got {}", key, v)))?;
            Ok(())
        }
        Some(other) => Err(invalid(format!("'{}' must be an integer, got {}", key, other))),
    }
}

impl SculptConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, SculptError> {
        let table = text
            .parse::<Table>()
            .map_err(|e| invalid(e.to_string()))?;
        let mut config = SculptConfig::default();

        let fit = section(&table, "fit")?;
        read_count(fit, "curve_degree", &mut config.curve_degree)?;
        read_count(fit, "surface_degree", &mut config.surface_degree)?;
        read_float(fit, "ridge_lambda", &mut config.ridge_lambda)?;

        let kernel = section(&table, "kernel")?;
        read_float(kernel, "sigma", &mut config.kernel_sigma)?;
        read_float(kernel, "epsilon", &mut config.kernel_epsilon)?;

        let interaction = section(&table, "interaction")?;
        read_float(interaction, "max_delta", &mut config.max_delta)?;

        let sampling = section(&table, "sampling")?;
        read_count(sampling, "curve_samples", &mut config.curve_samples)?;
        read_count(sampling, "surface_grid", &mut config.surface_grid)?;
        read_float(sampling, "domain_min", &mut config.domain_min)?;
        read_float(sampling, "domain_max", &mut config.domain_max)?;

        if let Some(level) = section(&table, "log")?.and_then(|t| t.get("level")) {
            let name = level
                .as_str()
                .ok_or_else(|| invalid(format!("log level must be a string, got {}", level)))?;
            config.log_level = LogLevel::from_str(name)
                .map_err(|_| invalid(format!("unknown log level '{}'", name)))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, SculptError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| invalid(format!("cannot read {}: {}", path.display(), e)))?;
        SculptConfig::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> String {
        let mut fit = Table::new();
        fit.insert("curve_degree".into(), Value::Integer(self.curve_degree as i64));
        fit.insert("surface_degree".into(), Value::Integer(self.surface_degree as i64));
        fit.insert("ridge_lambda".into(), Value::Float(self.ridge_lambda));
        let mut kernel = Table::new();
        kernel.insert("sigma".into(), Value::Float(self.kernel_sigma));
        kernel.insert("epsilon".into(), Value::Float(self.kernel_epsilon));
        let mut interaction = Table::new();
        interaction.insert("max_delta".into(), Value::Float(self.max_delta));
        let mut sampling = Table::new();
        sampling.insert("curve_samples".into(), Value::Integer(self.curve_samples as i64));
        sampling.insert("surface_grid".into(), Value::Integer(self.surface_grid as i64));
        sampling.insert("domain_min".into(), Value::Float(self.domain_min));
        sampling.insert("domain_max".into(), Value::Float(self.domain_max));
        let mut log = Table::new();
        log.insert("level".into(), Value::String(self.log_level.to_string()));

        let mut root = Table::new();
        root.insert("fit".into(), Value::Table(fit));
        root.insert("kernel".into(), Value::Table(kernel));
        root.insert("interaction".into(), Value::Table(interaction));
        root.insert("sampling".into(), Value::Table(sampling));
        root.insert("log".into(), Value::Table(log));
        root.to_string()
    }

    /// Degrees outside their range are clamped later by the fitters and are not an error here.
    pub fn validate(&self) -> Result<(), SculptError> {
        self.deformer()?;
        self.clamp()?;
        self.domain()?;
        if !(self.ridge_lambda >= 0.0 && self.ridge_lambda.is_finite()) {
            return Err(invalid(format!(
                "ridge_lambda must be non-negative, got {}",
                self.ridge_lambda
            )));
        }
        if self.curve_samples <= MIN_CURVE_SAMPLES {
            return Err(invalid(format!(
                "curve_samples must be greater than {}, got {}",
                MIN_CURVE_SAMPLES, self.curve_samples
            )));
        }
        if self.surface_grid < 2 {
            return Err(invalid(format!(
                "surface_grid must be at least 2, got {}",
                self.surface_grid
            )));
        }
        Ok(())
    }

    pub fn deformer(&self) -> Result<KernelDeformer, SculptError> {
        KernelDeformer::new(self.kernel_sigma, self.kernel_epsilon)
    }

    pub fn synthesizer(&self) -> Result<ExpressionSynthesizer, SculptError> {
        ExpressionSynthesizer::new(self.kernel_sigma, self.kernel_epsilon)
    }

    pub fn clamp(&self) -> Result<DisplacementClamp, SculptError> {
        DisplacementClamp::new(self.max_delta)
    }

    pub fn domain(&self) -> Result<Domain, SculptError> {
        Domain::new(self.domain_min, self.domain_max)
    }

    pub fn curve_fitter(&self) -> PolynomialFitter1D {
        PolynomialFitter1D::new(self.curve_degree)
    }

    pub fn surface_fitter(&self) -> PolynomialFitter2D {
        PolynomialFitter2D::new(self.surface_degree).with_ridge(self.ridge_lambda)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = SculptConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(SculptConfig::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn test_partial_document_overrides_defaults() {
        let text = r#"
            [fit]
            curve_degree = 5
            [kernel]
            sigma = 1
            [log]
            level = "DEBUG"
            [extra]
            ignored = true
        "#;
        let config = SculptConfig::from_toml_str(text).unwrap();
        assert_eq!(config.curve_degree, 5);
        assert_eq!(config.kernel_sigma, 1.0);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.surface_degree, 2);
        assert_eq!(config.curve_fitter().degree(), 5);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = SculptConfig {
            curve_degree: 7,
            kernel_sigma: 0.05,
            max_delta: 2.5,
            domain_min: -1.0,
            domain_max: 4.0,
            log_level: LogLevel::Warn,
            ..SculptConfig::default()
        };
        let text = config.to_toml_string();
        assert_eq!(SculptConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for text in [
            "[kernel]\nsigma = 0.0",
            "[kernel]\nsigma = -0.2",
            "[interaction]\nmax_delta = 0",
            "[sampling]\ndomain_min = 3.0\ndomain_max = 1.0",
            "[sampling]\ncurve_samples = 10",
            "[fit]\ncurve_degree = -1",
            "[fit]\ncurve_degree = \"three\"",
            "[log]\nlevel = \"loud\"",
            "kernel = 3",
            "[kernel\nsigma = 1",
        ] {
            let res = SculptConfig::from_toml_str(text);
            assert!(
                matches!(res, Err(SculptError::InvalidConfig(_))),
                "accepted {:?}",
                text
            );
        }
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[interaction]\nmax_delta = 0.75").unwrap();
        let config = SculptConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_delta, 0.75);
        assert_eq!(config.clamp().unwrap().max_delta(), 0.75);
    }
}

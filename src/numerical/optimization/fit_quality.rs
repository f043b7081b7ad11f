use itertools::Itertools;
use tabled::{builder::Builder, settings::Style};

/// goodness of fit statistics of a least-squares fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitQuality {
    /// coefficient of determination; 1.0 when the data has no variance and is matched exactly
    pub r_squared: f64,
    /// root mean square of the residuals
    pub rmse: f64,
    /// largest absolute residual
    pub max_residual: f64,
    pub n_points: usize,
}

impl FitQuality {
    pub fn from_residuals(observed: &[f64], predicted: &[f64]) -> Self {
        assert_eq!(observed.len(), predicted.len());
        let n = observed.len();
        if n == 0 {
            return FitQuality {
                r_squared: f64::NAN,
                rmse: f64::NAN,
                max_residual: f64::NAN,
                n_points: 0,
            };
        }
        let mean = observed.iter().sum::<f64>() / n as f64;
        let ss_tot: f64 = observed.iter().map(|y| (y - mean).powi(2)).sum();
        let residuals = observed.iter().zip(predicted).map(|(y, p)| y - p).collect_vec();
        let ss_res: f64 = residuals.iter().map(|r| r * r).sum();
        let r_squared = if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else if ss_res <= f64::EPSILON {
            1.0
        } else {
            0.0
        };
        FitQuality {
            r_squared,
            rmse: (ss_res / n as f64).sqrt(),
            max_residual: residuals.iter().fold(0.0, |acc: f64, r| acc.max(r.abs())),
            n_points: n,
        }
    }
}

/// pretty table of a fit for logging
pub fn fit_report_table(title: &str, expression: &str, degree: usize, quality: &FitQuality) -> String {
    let mut builder = Builder::default();
    builder.push_record(["fit", title]);
    builder.push_record(["expression".to_string(), expression.to_string()]);
    builder.push_record(["degree".to_string(), degree.to_string()]);
    builder.push_record(["points".to_string(), quality.n_points.to_string()]);
    builder.push_record(["R^2".to_string(), format!("{:.6}", quality.r_squared)]);
    builder.push_record(["RMSE".to_string(), format!("{:.3e}", quality.rmse)]);
    builder.push_record(["max |residual|".to_string(), format!("{:.3e}", quality.max_residual)]);
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perfect_fit() {
        let q = FitQuality::from_residuals(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert_relative_eq!(q.r_squared, 1.0);
        assert_relative_eq!(q.rmse, 0.0);
        assert_eq!(q.n_points, 3);
    }

    #[test]
    fn test_mean_prediction_has_zero_r_squared() {
        let q = FitQuality::from_residuals(&[1.0, 2.0, 3.0], &[2.0, 2.0, 2.0]);
        assert_relative_eq!(q.r_squared, 0.0, epsilon = 1e-12);
        assert_relative_eq!(q.max_residual, 1.0);
        assert_relative_eq!(q.rmse, (2.0f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_report_mentions_expression() {
        let q = FitQuality::from_residuals(&[0.0, 1.0], &[0.0, 1.0]);
        let table = fit_report_table("curve", "x", 1, &q);
        assert!(table.contains("expression"));
        assert!(table.contains("R^2"));
    }
}

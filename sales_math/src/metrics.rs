//! Regression metrics for scoring a holdout set

use crate::stats::round_to;
use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.len() != predicted.len() || actual.is_empty() {
        return Err(MathError::InvalidInput(format!(
            "Actual ({}) and predicted ({}) values must have the same non-zero length",
            actual.len(),
            predicted.len()
        )));
    }
    Ok(())
}

/// Mean Absolute Error
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Mean Squared Error
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Root Mean Squared Error
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    Ok(mean_squared_error(actual, predicted)?.sqrt())
}

/// Coefficient of determination.
///
/// NaN for fewer than two samples. A constant `actual` series scores 1.0 on
/// a perfect fit and 0.0 otherwise instead of dividing by zero.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    if actual.len() < 2 {
        return Ok(f64::NAN);
    }

    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_total: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_residual: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    if ss_total == 0.0 {
        return Ok(if ss_residual == 0.0 { 1.0 } else { 0.0 });
    }

    Ok(1.0 - ss_residual / ss_total)
}

/// Holdout accuracy, each figure rounded to two decimals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Coefficient of determination
    pub r2: f64,
}

impl RegressionMetrics {
    /// Score `predicted` against `actual`
    pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Result<Self> {
        Ok(Self {
            mae: round_to(mean_absolute_error(actual, predicted)?, 2),
            rmse: round_to(root_mean_squared_error(actual, predicted)?, 2),
            r2: round_to(r2_score(actual, predicted)?, 2),
        })
    }
}

impl std::fmt::Display for RegressionMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Holdout Accuracy:")?;
        writeln!(f, "  MAE:  {:.2}", self.mae)?;
        writeln!(f, "  RMSE: {:.2}", self.rmse)?;
        writeln!(f, "  R2:   {:.2}", self.r2)?;
        Ok(())
    }
}

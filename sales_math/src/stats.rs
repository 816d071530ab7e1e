//! Small statistics helpers shared by the report and evaluation code

use crate::{MathError, Result};

/// Arithmetic mean of `values`
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the mean of an empty slice".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Round to `decimals` places, ties to even. NaN passes through.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}

/// Percentage change from `previous` to `current`.
///
/// Returns `None` when `previous` is zero; the change is undefined there
/// and must not be reported as zero.
pub fn percentage_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }

    Some((current - previous) / previous * 100.0)
}

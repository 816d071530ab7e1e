//! # Sales Math
//!
//! Numeric building blocks for the demand forecasting pipeline.
//! This crate provides the trailing averages used for lag features, the
//! rounding and percentage helpers used by the stock report, and the
//! regression metrics used to score a holdout set.

use thiserror::Error;

pub mod metrics;
pub mod moving_averages;
pub mod stats;

pub use metrics::RegressionMetrics;
pub use moving_averages::SimpleMovingAverage;

/// Errors that can occur in sales calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for sales math operations
pub type Result<T> = std::result::Result<T, MathError>;

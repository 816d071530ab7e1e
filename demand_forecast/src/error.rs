//! Error types for the demand_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the demand_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// One or more required columns are absent from the input dataset
    #[error("Missing required columns: {missing:?}")]
    SchemaError { missing: Vec<String> },

    /// Every row was discarded while cleaning
    #[error("No valid data after cleaning dates")]
    EmptyDatasetError,

    /// The feature matrix could not be used to fit a model
    #[error("Training error: {0}")]
    TrainingError(String),

    /// A caller asked for a product that is not in the report
    #[error("Product ID '{0}' not found in the dataset")]
    UnknownProductError(String),

    /// The requested forecast month could not be understood
    #[error("Invalid month format: {input}. Expected format: '{expected}'")]
    InvalidTargetMonth {
        input: String,
        expected: &'static str,
    },

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from the numeric helpers
    #[error("Math error: {0}")]
    MathError(#[from] sales_math::MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error while writing CSV output
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error while loading a configuration file
    #[error("Config error: {0}")]
    ConfigError(String),
}

impl ForecastError {
    /// Whether the failure is caused by the caller's data or request rather
    /// than the environment. Retrying these with the same input cannot succeed.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            ForecastError::SchemaError { .. }
                | ForecastError::EmptyDatasetError
                | ForecastError::TrainingError(_)
                | ForecastError::UnknownProductError(_)
                | ForecastError::InvalidTargetMonth { .. }
                | ForecastError::InvalidParameter(_)
        )
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

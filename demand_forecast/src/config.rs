//! Pipeline configuration
//!
//! Every field has a default, so a JSON file only needs to name the values it
//! overrides:
//!
//! ```json
//! { "forest": { "n_trees": 50 }, "split_strategy": "temporal" }
//! ```

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How the feature rows are divided into training and holdout sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitStrategy {
    /// Trailing rows in product/time order form the holdout
    #[default]
    Positional,
    /// Rows are stably ordered by (year, month) first, so the holdout is
    /// the most recent slice across all products
    Temporal,
}

/// Random forest settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees in the ensemble
    pub n_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: u16,
    /// Seed for bootstrap sampling
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 200,
            max_depth: 10,
            seed: 42,
        }
    }
}

/// Settings for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub forest: ForestConfig,
    /// Share of feature rows held out for evaluation
    pub test_ratio: f64,
    pub split_strategy: SplitStrategy,
    /// Weight for rows in the same calendar month as the target
    pub same_month_weight: f64,
    /// Weight for every other row
    pub other_month_weight: f64,
    /// A product needs at least this multiple of the mean forecast to be
    /// flagged for high stock
    pub high_stock_multiplier: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            forest: ForestConfig::default(),
            test_ratio: 0.2,
            split_strategy: SplitStrategy::Positional,
            same_month_weight: 0.8,
            other_month_weight: 0.2,
            high_stock_multiplier: 1.2,
        }
    }
}

impl PipelineConfig {
    /// Load and validate a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents).map_err(|e| match e {
            ForecastError::ConfigError(msg) => {
                ForecastError::ConfigError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse and validate a configuration from a JSON string
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(contents)
            .map_err(|e| ForecastError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every setting is usable
    pub fn validate(&self) -> Result<()> {
        if self.forest.n_trees == 0 {
            return Err(ForecastError::InvalidParameter(
                "n_trees must be positive".to_string(),
            ));
        }
        if self.forest.max_depth == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_depth must be positive".to_string(),
            ));
        }
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "test_ratio must be between 0 and 1 (exclusive), got {}",
                self.test_ratio
            )));
        }
        if !self.same_month_weight.is_finite() || !self.other_month_weight.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "month weights must be finite".to_string(),
            ));
        }
        if !(self.high_stock_multiplier.is_finite() && self.high_stock_multiplier > 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "high_stock_multiplier must be positive, got {}",
                self.high_stock_multiplier
            )));
        }
        Ok(())
    }
}

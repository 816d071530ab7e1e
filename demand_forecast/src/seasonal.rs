//! Seasonal weighting relative to the forecast month

use crate::config::PipelineConfig;

/// Tags rows that fall in the same calendar month as the forecast target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalWeighter {
    target_month: u32,
    same_month_weight: f64,
    other_month_weight: f64,
}

impl SeasonalWeighter {
    pub fn new(target_month: u32, same_month_weight: f64, other_month_weight: f64) -> Self {
        Self {
            target_month,
            same_month_weight,
            other_month_weight,
        }
    }

    /// Weighter using the configured weights
    pub fn from_config(target_month: u32, config: &PipelineConfig) -> Self {
        Self::new(
            target_month,
            config.same_month_weight,
            config.other_month_weight,
        )
    }

    /// Weight for a row observed in `month`
    pub fn weight_for(&self, month: u32) -> f64 {
        if month == self.target_month {
            self.same_month_weight
        } else {
            self.other_month_weight
        }
    }
}

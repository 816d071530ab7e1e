//! Lag feature construction and feature matrix assembly

use crate::aggregation::MonthlySales;
use crate::error::{ForecastError, Result};
use crate::product::{ProductId, ProductIdMap};
use crate::seasonal::SeasonalWeighter;
use sales_math::SimpleMovingAverage;

/// Window of the trailing average feature
pub const LAG_AVERAGE_WINDOW: usize = 3;

/// Number of model inputs per row
pub const FEATURE_COUNT: usize = 6;

/// Names of the model inputs, in [`FeatureRow::to_vector`] order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "product_id_mapped",
    "month",
    "year",
    "lag_1",
    "lag_3_avg",
    "month_weight",
];

/// One model input row
pub type FeatureVector = [f64; FEATURE_COUNT];

/// A monthly aggregate with a complete lag history
#[derive(Debug, Clone, PartialEq)]
pub struct LaggedSales {
    pub sales: MonthlySales,
    /// Quantity of the previous observed month
    pub lag_1: f64,
    /// Mean quantity of the three observed months ending with `lag_1`'s month
    pub lag_3_avg: f64,
}

/// Lag features for every monthly row that has enough history.
///
/// Rows are grouped by product in their existing order. For the i-th
/// observation of a product, `lag_1` is observation i-1 and `lag_3_avg`
/// averages observations i-3..=i-1. The first three observations of each
/// product are dropped, so a product with k months contributes
/// `k.saturating_sub(3)` rows.
pub fn build_lag_features(monthly: &[MonthlySales]) -> Result<Vec<LaggedSales>> {
    let mut lagged = Vec::with_capacity(monthly.len());
    let mut current: Option<&ProductId> = None;
    let mut previous: Option<f64> = None;
    let mut window = SimpleMovingAverage::new(LAG_AVERAGE_WINDOW)?;

    for row in monthly {
        if current != Some(&row.product_id) {
            current = Some(&row.product_id);
            previous = None;
            window.reset();
        }

        // The window holds the shifted series, so it lags one row behind
        if let Some(lag_1) = previous {
            window.update(lag_1);
            if let Ok(lag_3_avg) = window.value() {
                lagged.push(LaggedSales {
                    sales: row.clone(),
                    lag_1,
                    lag_3_avg,
                });
            }
        }

        previous = Some(row.quantity_sum);
    }

    Ok(lagged)
}

/// A fully annotated training or scoring row
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub product_id_mapped: usize,
    pub product_category: String,
    pub year: i32,
    pub month: u32,
    pub lag_1: f64,
    pub lag_3_avg: f64,
    pub month_weight: f64,
    /// Target value: the month's total quantity
    pub quantity_sum: f64,
}

impl FeatureRow {
    /// Model inputs in [`FEATURE_NAMES`] order
    pub fn to_vector(&self) -> FeatureVector {
        [
            self.product_id_mapped as f64,
            self.month as f64,
            self.year as f64,
            self.lag_1,
            self.lag_3_avg,
            self.month_weight,
        ]
    }
}

/// Encode product ids and attach seasonal weights
pub fn assemble_feature_rows(
    lagged: &[LaggedSales],
    product_map: &ProductIdMap,
    weighter: &SeasonalWeighter,
) -> Result<Vec<FeatureRow>> {
    lagged
        .iter()
        .map(|row| {
            let product_id_mapped = product_map.encode(&row.sales.product_id).ok_or_else(|| {
                ForecastError::InvalidParameter(format!(
                    "Product '{}' is missing from the identifier map",
                    row.sales.product_id
                ))
            })?;

            Ok(FeatureRow {
                product_id_mapped,
                product_category: row.sales.product_category.clone(),
                year: row.sales.year,
                month: row.sales.month,
                lag_1: row.lag_1,
                lag_3_avg: row.lag_3_avg,
                month_weight: weighter.weight_for(row.sales.month),
                quantity_sum: row.sales.quantity_sum,
            })
        })
        .collect()
}

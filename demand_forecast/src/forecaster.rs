//! Next-month scoring, one row per product

use crate::error::{ForecastError, Result};
use crate::features::FeatureRow;
use crate::models::TrainedDemandModel;
use crate::product::{ProductId, ProductIdMap};
use crate::target::TargetMonth;
use serde::Serialize;
use std::collections::BTreeMap;

/// Predicted demand for one product in the target month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRecord {
    pub product_id: ProductId,
    pub product_category: String,
    /// Quantity of the month before the product's latest observed month
    pub previous_month_sales: f64,
    pub predicted_sales: f64,
    pub year: i32,
    pub month: u32,
}

/// Latest feature row of every product, keyed by mapped id
fn latest_rows(rows: &[FeatureRow]) -> BTreeMap<usize, &FeatureRow> {
    let mut latest: BTreeMap<usize, &FeatureRow> = BTreeMap::new();
    for row in rows {
        latest
            .entry(row.product_id_mapped)
            .and_modify(|current| {
                if (row.year, row.month) >= (current.year, current.month) {
                    *current = row;
                }
            })
            .or_insert(row);
    }
    latest
}

/// Score every product for `target`.
///
/// Each product's most recent feature row is reused with its month and year
/// replaced by the target; the lag features and month weight are kept as
/// they are. Products are emitted in mapped-id order.
pub fn predict_next_month<T: TrainedDemandModel>(
    model: &T,
    rows: &[FeatureRow],
    target: TargetMonth,
    product_map: &ProductIdMap,
) -> Result<Vec<ForecastRecord>> {
    let latest = latest_rows(rows);

    let scoring: Vec<FeatureRow> = latest
        .values()
        .map(|row| FeatureRow {
            year: target.year(),
            month: target.month(),
            ..(*row).clone()
        })
        .collect();

    let inputs: Vec<_> = scoring.iter().map(FeatureRow::to_vector).collect();
    let predictions = model.predict(&inputs)?;
    if predictions.len() != scoring.len() {
        return Err(ForecastError::TrainingError(format!(
            "Model returned {} predictions for {} products",
            predictions.len(),
            scoring.len()
        )));
    }

    scoring
        .iter()
        .zip(predictions)
        .map(|(row, predicted_sales)| {
            let product_id = product_map
                .decode(row.product_id_mapped)
                .cloned()
                .ok_or_else(|| {
                    ForecastError::InvalidParameter(format!(
                        "Mapped product index {} has no identifier",
                        row.product_id_mapped
                    ))
                })?;

            Ok(ForecastRecord {
                product_id,
                product_category: row.product_category.clone(),
                previous_month_sales: row.lag_1,
                predicted_sales,
                year: target.year(),
                month: target.month(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureVector;

    /// Predicts `lag_1 + month` so the inputs are visible in the output
    #[derive(Debug)]
    struct EchoModel;

    impl TrainedDemandModel for EchoModel {
        fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>> {
            Ok(features.iter().map(|f| f[3] + f[1]).collect())
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    fn row(product: usize, year: i32, month: u32, lag_1: f64) -> FeatureRow {
        FeatureRow {
            product_id_mapped: product,
            product_category: format!("cat-{}", product),
            year,
            month,
            lag_1,
            lag_3_avg: lag_1,
            month_weight: 0.2,
            quantity_sum: lag_1,
        }
    }

    #[test]
    fn test_one_forecast_per_product_from_latest_row() {
        let rows = vec![
            row(0, 2023, 4, 10.0),
            row(0, 2023, 5, 11.0),
            row(1, 2022, 12, 30.0),
            row(1, 2023, 1, 31.0),
            row(1, 2023, 2, 32.0),
        ];
        let ids = vec![ProductId::from_raw("P1"), ProductId::from_raw("P2")];
        let map = ProductIdMap::from_ids(&ids);
        let target = TargetMonth::new(2023, 6).unwrap();

        let forecasts = predict_next_month(&EchoModel, &rows, target, &map).unwrap();

        assert_eq!(forecasts.len(), 2);
        assert_eq!(forecasts[0].product_id, ProductId::from_raw("P1"));
        assert_eq!(forecasts[0].previous_month_sales, 11.0);
        assert_eq!(forecasts[0].predicted_sales, 17.0);
        assert_eq!(forecasts[0].month, 6);
        assert_eq!(forecasts[0].year, 2023);

        assert_eq!(forecasts[1].product_id, ProductId::from_raw("P2"));
        assert_eq!(forecasts[1].product_category, "cat-1");
        assert_eq!(forecasts[1].previous_month_sales, 32.0);
        assert_eq!(forecasts[1].predicted_sales, 38.0);
    }

    #[test]
    fn test_unknown_mapped_index_fails() {
        let rows = vec![row(3, 2023, 4, 10.0)];
        let target = TargetMonth::new(2023, 5).unwrap();
        assert!(predict_next_month(&EchoModel, &rows, target, &ProductIdMap::default()).is_err());
    }
}

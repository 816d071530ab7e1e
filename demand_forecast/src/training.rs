//! Model training with a trailing holdout

use crate::config::{PipelineConfig, SplitStrategy};
use crate::error::{ForecastError, Result};
use crate::features::{FeatureRow, FeatureVector};
use crate::models::{DemandModel, TrainedDemandModel};
use crate::utils::train_test_split;
use sales_math::RegressionMetrics;

/// A fitted model with its holdout accuracy
#[derive(Debug)]
pub struct TrainingOutcome<T: TrainedDemandModel> {
    pub model: T,
    pub metrics: RegressionMetrics,
    pub training_rows: usize,
    pub holdout_rows: usize,
}

fn split_rows(
    rows: &[FeatureRow],
    config: &PipelineConfig,
) -> Result<(Vec<FeatureRow>, Vec<FeatureRow>)> {
    match config.split_strategy {
        SplitStrategy::Positional => train_test_split(rows, config.test_ratio),
        SplitStrategy::Temporal => {
            let mut ordered = rows.to_vec();
            ordered.sort_by_key(|row| (row.year, row.month));
            train_test_split(&ordered, config.test_ratio)
        }
    }
}

fn inputs_and_targets(rows: &[FeatureRow]) -> (Vec<FeatureVector>, Vec<f64>) {
    rows.iter()
        .map(|row| (row.to_vector(), row.quantity_sum))
        .unzip()
}

/// Fit `model` on the leading rows and score it on the trailing holdout.
///
/// Fails with [`ForecastError::TrainingError`] when there are no rows or the
/// split leaves nothing to train on.
pub fn train_and_evaluate<M: DemandModel>(
    model: &M,
    rows: &[FeatureRow],
    config: &PipelineConfig,
) -> Result<TrainingOutcome<M::Trained>> {
    if rows.is_empty() {
        return Err(ForecastError::TrainingError(
            "Feature matrix is empty: no product has enough monthly history".to_string(),
        ));
    }

    let (train, holdout) = split_rows(rows, config)?;
    if train.is_empty() {
        return Err(ForecastError::TrainingError(format!(
            "Not enough feature rows to train: {} row(s) all fall in the holdout",
            rows.len()
        )));
    }

    let (train_x, train_y) = inputs_and_targets(&train);
    let (test_x, test_y) = inputs_and_targets(&holdout);

    let trained = model.train(&train_x, &train_y)?;
    let predictions = trained.predict(&test_x)?;
    let metrics = RegressionMetrics::evaluate(&test_y, &predictions)?;

    Ok(TrainingOutcome {
        model: trained,
        metrics,
        training_rows: train.len(),
        holdout_rows: holdout.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForestConfig;
    use crate::models::RandomForestModel;

    fn row(product: usize, year: i32, month: u32, quantity: f64) -> FeatureRow {
        FeatureRow {
            product_id_mapped: product,
            product_category: "Tea".to_string(),
            year,
            month,
            lag_1: quantity,
            lag_3_avg: quantity,
            month_weight: 0.2,
            quantity_sum: quantity,
        }
    }

    fn model() -> RandomForestModel {
        RandomForestModel::new(ForestConfig {
            n_trees: 10,
            max_depth: 4,
            seed: 42,
        })
        .unwrap()
    }

    #[test]
    fn test_empty_rows_fail() {
        let result = train_and_evaluate(&model(), &[], &PipelineConfig::default());
        assert!(matches!(result, Err(ForecastError::TrainingError(_))));
    }

    #[test]
    fn test_single_row_fails() {
        let rows = vec![row(0, 2023, 4, 10.0)];
        let result = train_and_evaluate(&model(), &rows, &PipelineConfig::default());
        assert!(matches!(result, Err(ForecastError::TrainingError(_))));
    }

    #[test]
    fn test_split_sizes() {
        let rows: Vec<FeatureRow> = (0..10).map(|i| row(0, 2023, i + 1, 5.0)).collect();
        let outcome = train_and_evaluate(&model(), &rows, &PipelineConfig::default()).unwrap();

        assert_eq!(outcome.training_rows, 8);
        assert_eq!(outcome.holdout_rows, 2);
        assert_eq!(outcome.metrics.mae, 0.0);
        assert_eq!(outcome.metrics.rmse, 0.0);
        assert_eq!(outcome.metrics.r2, 1.0);
    }

    #[test]
    fn test_positional_split_keeps_row_order() {
        // Product 1 is later in row order but earlier in time
        let mut rows: Vec<FeatureRow> = (1..=5).map(|m| row(0, 2024, m, 1.0)).collect();
        rows.extend((1..=5).map(|m| row(1, 2023, m, 2.0)));

        let (_, holdout) = split_rows(&rows, &PipelineConfig::default()).unwrap();
        assert!(holdout.iter().all(|r| r.product_id_mapped == 1));

        let config = PipelineConfig {
            split_strategy: SplitStrategy::Temporal,
            ..PipelineConfig::default()
        };
        let (_, holdout) = split_rows(&rows, &config).unwrap();
        assert!(holdout.iter().all(|r| r.year == 2024));
        assert_eq!(holdout.len(), 2);
        assert_eq!(holdout[0].month, 4);
        assert_eq!(holdout[1].month, 5);
    }
}

//! End-to-end forecasting pipeline
//!
//! Each run builds every intermediate value (cleaned transactions, monthly
//! totals, feature rows, identifier map, trained model) from scratch and
//! drops them on return. Nothing is shared between runs, so independent runs
//! may execute on separate threads.

use crate::aggregation::aggregate_monthly;
use crate::cleaning::extract_and_clean;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::features::{assemble_feature_rows, build_lag_features, FEATURE_NAMES};
use crate::forecaster::predict_next_month;
use crate::models::{DemandModel, RandomForestModel};
use crate::product::ProductIdMap;
use crate::report::StockReport;
use crate::seasonal::SeasonalWeighter;
use crate::target::TargetMonth;
use crate::training::train_and_evaluate;
use polars::prelude::DataFrame;
use sales_math::RegressionMetrics;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Row counts at each stage, so silent exclusions can be audited
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineDiagnostics {
    pub input_rows: usize,
    /// Rows dropped because the date was missing or unparseable
    pub unparseable_dates: usize,
    /// Rows dropped because the product id or category was missing
    pub missing_keys: usize,
    pub monthly_rows: usize,
    /// Monthly rows dropped for lacking three prior observed months
    pub insufficient_history: usize,
    pub feature_rows: usize,
    /// Products with sales that are absent from the report
    pub excluded_products: usize,
    pub training_rows: usize,
    pub holdout_rows: usize,
}

/// Everything a caller receives from one run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub target: TargetMonth,
    pub report: StockReport,
    pub metrics: RegressionMetrics,
    pub diagnostics: PipelineDiagnostics,
}

/// Forecasting pipeline with a fixed configuration
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    config: PipelineConfig,
    model: RandomForestModel,
}

impl ForecastPipeline {
    /// Create a pipeline; fails if the configuration is invalid
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let model = RandomForestModel::new(config.forest.clone())?;
        Ok(Self { config, model })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage on `df` for `target`
    pub fn run(&self, df: &DataFrame, target: TargetMonth) -> Result<PipelineOutput> {
        let mut diagnostics = PipelineDiagnostics {
            input_rows: df.height(),
            ..Default::default()
        };

        let cleaned = extract_and_clean(df)?;
        diagnostics.unparseable_dates = cleaned.unparseable_dates;
        diagnostics.missing_keys = cleaned.missing_keys;
        debug!(
            kept = cleaned.transactions.len(),
            unparseable_dates = cleaned.unparseable_dates,
            missing_keys = cleaned.missing_keys,
            "cleaned transactions"
        );

        let monthly = aggregate_monthly(&cleaned.transactions);
        diagnostics.monthly_rows = monthly.len();
        debug!(rows = monthly.len(), "aggregated monthly sales");

        let lagged = build_lag_features(&monthly)?;
        diagnostics.insufficient_history = monthly.len() - lagged.len();
        let all_products: BTreeSet<_> = monthly.iter().map(|m| &m.product_id).collect();

        let product_map = ProductIdMap::from_ids(lagged.iter().map(|l| &l.sales.product_id));
        diagnostics.excluded_products = all_products.len() - product_map.len();
        debug!(
            rows = lagged.len(),
            dropped = diagnostics.insufficient_history,
            products = product_map.len(),
            excluded_products = diagnostics.excluded_products,
            "built lag features"
        );

        let weighter = SeasonalWeighter::from_config(target.month(), &self.config);
        let rows = assemble_feature_rows(&lagged, &product_map, &weighter)?;
        diagnostics.feature_rows = rows.len();

        let outcome = train_and_evaluate(&self.model, &rows, &self.config)?;
        diagnostics.training_rows = outcome.training_rows;
        diagnostics.holdout_rows = outcome.holdout_rows;
        debug!(
            model = self.model.name(),
            features = ?FEATURE_NAMES,
            training_rows = outcome.training_rows,
            holdout_rows = outcome.holdout_rows,
            mae = outcome.metrics.mae,
            rmse = outcome.metrics.rmse,
            r2 = outcome.metrics.r2,
            "trained model"
        );

        let forecasts = predict_next_month(&outcome.model, &rows, target, &product_map)?;
        let report = StockReport::generate(forecasts, self.config.high_stock_multiplier)?;
        info!(
            target = %target,
            products = report.len(),
            high_stock = report.summary().high_stock_required,
            "generated stock report"
        );

        Ok(PipelineOutput {
            target,
            report,
            metrics: outcome.metrics,
            diagnostics,
        })
    }
}

/// Run the pipeline with the default configuration.
///
/// `target_month` must be in 1..=12.
pub fn predict_sales_pipeline(
    df: &DataFrame,
    target_year: i32,
    target_month: u32,
) -> Result<PipelineOutput> {
    let target = TargetMonth::new(target_year, target_month)?;
    ForecastPipeline::new(PipelineConfig::default())?.run(df, target)
}

//! Stock recommendations derived from forecasts

use crate::error::{ForecastError, Result};
use crate::forecaster::ForecastRecord;
use crate::product::ProductId;
use sales_math::stats::{mean, percentage_change, round_to};
use serde::Serialize;
use std::fmt;
use std::io::Write;

/// Restocking recommendation for a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockStatus {
    #[serde(rename = "HIGH STOCK REQUIRED")]
    HighStockRequired,
    #[serde(rename = "NORMAL STOCK")]
    NormalStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::HighStockRequired => "HIGH STOCK REQUIRED",
            StockStatus::NormalStock => "NORMAL STOCK",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One product's forecast with its stock recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockReportRecord {
    pub product_id: ProductId,
    pub product_category: String,
    pub previous_month_sales: f64,
    pub predicted_sales: f64,
    pub year: i32,
    pub month: u32,
    /// Percentage change versus `previous_month_sales`; `None` when that is zero
    pub stock_change_pct: Option<f64>,
    pub stock_status: StockStatus,
}

/// Stock recommendations for every forecast product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockReport {
    records: Vec<StockReportRecord>,
    /// Mean of the unrounded predictions
    average_predicted_sales: f64,
    /// Predictions at or above this are flagged for high stock
    high_stock_threshold: f64,
}

impl StockReport {
    /// Classify each forecast against `multiplier` times the mean prediction.
    ///
    /// Classification uses unrounded predictions; the figures stored on the
    /// records are rounded to two decimals.
    pub fn generate(forecasts: Vec<ForecastRecord>, multiplier: f64) -> Result<Self> {
        if forecasts.is_empty() {
            return Ok(Self {
                records: Vec::new(),
                average_predicted_sales: 0.0,
                high_stock_threshold: 0.0,
            });
        }

        let predictions: Vec<f64> = forecasts.iter().map(|f| f.predicted_sales).collect();
        let average_predicted_sales = mean(&predictions)?;
        let high_stock_threshold = average_predicted_sales * multiplier;

        let records = forecasts
            .into_iter()
            .map(|forecast| {
                let stock_status = if forecast.predicted_sales >= high_stock_threshold {
                    StockStatus::HighStockRequired
                } else {
                    StockStatus::NormalStock
                };
                let stock_change_pct =
                    percentage_change(forecast.previous_month_sales, forecast.predicted_sales)
                        .map(|pct| round_to(pct, 2));

                StockReportRecord {
                    product_id: forecast.product_id,
                    product_category: forecast.product_category,
                    previous_month_sales: round_to(forecast.previous_month_sales, 2),
                    predicted_sales: round_to(forecast.predicted_sales, 2),
                    year: forecast.year,
                    month: forecast.month,
                    stock_change_pct,
                    stock_status,
                }
            })
            .collect();

        Ok(Self {
            records,
            average_predicted_sales,
            high_stock_threshold,
        })
    }

    pub fn records(&self) -> &[StockReportRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn average_predicted_sales(&self) -> f64 {
        self.average_predicted_sales
    }

    pub fn high_stock_threshold(&self) -> f64 {
        self.high_stock_threshold
    }

    /// Record for `product_id`, compared by string form
    pub fn find_product(&self, product_id: &str) -> Result<&StockReportRecord> {
        self.records
            .iter()
            .find(|record| record.product_id.matches(product_id))
            .ok_or_else(|| ForecastError::UnknownProductError(product_id.trim().to_string()))
    }

    /// A report narrowed to `product_id`.
    ///
    /// The average and threshold stay those of the full report.
    pub fn filter_product(&self, product_id: &str) -> Result<StockReport> {
        let record = self.find_product(product_id)?;
        Ok(Self {
            records: vec![record.clone()],
            average_predicted_sales: self.average_predicted_sales,
            high_stock_threshold: self.high_stock_threshold,
        })
    }

    /// Headline figures and a one-line recommendation
    pub fn summary(&self) -> PredictionSummary {
        PredictionSummary::from_records(&self.records)
    }

    /// Write the records as CSV with a header row; undefined changes are empty
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for record in &self.records {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Aggregate view of a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionSummary {
    pub total_products: usize,
    pub high_stock_required: usize,
    /// Mean stock change, with undefined changes counted as zero
    pub average_growth: f64,
    pub insight: String,
}

impl PredictionSummary {
    fn from_records(records: &[StockReportRecord]) -> Self {
        let high_stock_required = records
            .iter()
            .filter(|r| r.stock_status == StockStatus::HighStockRequired)
            .count();
        let growth: Vec<f64> = records
            .iter()
            .map(|r| r.stock_change_pct.unwrap_or(0.0))
            .collect();
        let average_growth = mean(&growth).unwrap_or(0.0);

        Self {
            total_products: records.len(),
            high_stock_required,
            average_growth: round_to(average_growth, 2),
            insight: insight_message(average_growth, high_stock_required),
        }
    }
}

/// Recommendation text for an average growth percentage
pub fn insight_message(average_growth: f64, high_stock_count: usize) -> String {
    if average_growth > 50.0 {
        format!(
            "Strong demand surge detected! Average growth of {:.1}%. Consider increasing stock by 30-50% for {} high-demand products.",
            average_growth, high_stock_count
        )
    } else if average_growth > 20.0 {
        format!(
            "Moderate growth expected ({:.1}% increase). Keep {} products well-stocked to meet demand.",
            average_growth, high_stock_count
        )
    } else if average_growth > 0.0 {
        format!(
            "Steady demand pattern. Maintain current inventory levels with slight increase for {} products.",
            high_stock_count
        )
    } else {
        format!(
            "Sales decline detected ({:.1}%). Review inventory and consider promotions.",
            average_growth
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn forecast(id: &str, previous: f64, predicted: f64) -> ForecastRecord {
        ForecastRecord {
            product_id: ProductId::from_raw(id),
            product_category: "Tea".to_string(),
            previous_month_sales: previous,
            predicted_sales: predicted,
            year: 2026,
            month: 3,
        }
    }

    #[test]
    fn test_classification_against_mean() {
        // mean = 100, threshold = 120
        let report = StockReport::generate(
            vec![
                forecast("1", 50.0, 60.0),
                forecast("2", 100.0, 130.0),
                forecast("3", 100.0, 105.0),
                forecast("4", 100.0, 105.0),
            ],
            1.2,
        )
        .unwrap();

        let statuses: Vec<StockStatus> = report.records().iter().map(|r| r.stock_status).collect();
        assert_eq!(
            statuses,
            vec![
                StockStatus::NormalStock,
                StockStatus::HighStockRequired,
                StockStatus::NormalStock,
                StockStatus::NormalStock,
            ]
        );
        assert_eq!(report.average_predicted_sales(), 100.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let report = StockReport::generate(
            vec![forecast("1", 1.0, 100.0), forecast("2", 1.0, 100.0)],
            1.0,
        )
        .unwrap();
        assert!(report
            .records()
            .iter()
            .all(|r| r.stock_status == StockStatus::HighStockRequired));
    }

    #[test]
    fn test_change_pct_undefined_for_zero_previous() {
        let report = StockReport::generate(
            vec![forecast("1", 0.0, 10.0), forecast("2", 8.0, 10.0)],
            1.2,
        )
        .unwrap();

        assert_eq!(report.records()[0].stock_change_pct, None);
        assert_eq!(report.records()[1].stock_change_pct, Some(25.0));
    }

    #[test]
    fn test_rounding() {
        let report = StockReport::generate(vec![forecast("1", 3.0, 10.123_456)], 1.2).unwrap();
        let record = &report.records()[0];
        assert_eq!(record.predicted_sales, 10.12);
        assert_eq!(record.stock_change_pct, Some(237.45));
    }

    #[test]
    fn test_find_and_filter_product() {
        let report = StockReport::generate(
            vec![forecast("101", 1.0, 2.0), forecast("P7", 1.0, 4.0)],
            1.2,
        )
        .unwrap();

        assert_eq!(report.find_product("101").unwrap().predicted_sales, 2.0);
        assert_eq!(report.find_product(" P7 ").unwrap().predicted_sales, 4.0);

        let filtered = report.filter_product("P7").unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(
            filtered.high_stock_threshold(),
            report.high_stock_threshold()
        );

        match report.find_product("999") {
            Err(ForecastError::UnknownProductError(id)) => assert_eq!(id, "999"),
            other => panic!("expected UnknownProductError, got {:?}", other),
        }
    }

    #[test]
    fn test_summary_counts_null_growth_as_zero() {
        let report = StockReport::generate(
            vec![forecast("1", 0.0, 10.0), forecast("2", 10.0, 16.0)],
            1.2,
        )
        .unwrap();

        let summary = report.summary();
        assert_eq!(summary.total_products, 2);
        assert_eq!(summary.average_growth, 30.0);
        assert!(summary
            .insight
            .starts_with("Moderate growth expected (30.0% increase)"));
    }

    #[test]
    fn test_insight_tiers() {
        assert!(insight_message(75.0, 3).contains("for 3 high-demand products"));
        assert!(insight_message(21.0, 1).starts_with("Moderate growth"));
        assert!(insight_message(0.5, 2).starts_with("Steady demand"));
        assert_eq!(
            insight_message(-4.31, 0),
            "Sales decline detected (-4.3%). Review inventory and consider promotions."
        );
    }

    #[test]
    fn test_write_csv() {
        let report = StockReport::generate(
            vec![forecast("101", 0.0, 5.0), forecast("B", 4.0, 5.0)],
            1.2,
        )
        .unwrap();

        let mut buffer = Vec::new();
        report.write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "product_id,product_category,previous_month_sales,predicted_sales,year,month,stock_change_pct,stock_status"
        );
        assert_eq!(lines[1], "101,Tea,0.0,5.0,2026,3,,NORMAL STOCK");
        assert_eq!(lines[2], "B,Tea,4.0,5.0,2026,3,25.0,NORMAL STOCK");
    }

    #[test]
    fn test_empty_forecasts() {
        let report = StockReport::generate(Vec::new(), 1.2).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.summary().total_products, 0);
    }
}

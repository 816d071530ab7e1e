//! Extraction of typed transactions from a raw sales dataset
//!
//! This is the only place that touches dataset columns by name. Everything
//! downstream works on [`Transaction`] values.

use crate::data::missing_columns;
use crate::dates::parse_transaction_date;
use crate::error::{ForecastError, Result};
use crate::product::{IdKind, ProductId};
use chrono::NaiveDate;
use polars::prelude::*;

/// One sales transaction
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub product_category: String,
    pub product_id: ProductId,
    pub transaction_qty: f64,
    pub transaction_date: NaiveDate,
}

/// Transactions that survived cleaning, with counts of what was discarded
#[derive(Debug, Clone, Default)]
pub struct CleanedTransactions {
    pub transactions: Vec<Transaction>,
    /// Rows whose date was missing or could not be parsed
    pub unparseable_dates: usize,
    /// Rows with no product id or category; they cannot be grouped
    pub missing_keys: usize,
}

impl CleanedTransactions {
    /// Total rows discarded during cleaning
    pub fn dropped_rows(&self) -> usize {
        self.unparseable_dates + self.missing_keys
    }
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df.column(name)?.cast(&DataType::Utf8)?;
    let values = series
        .utf8()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect();
    Ok(values)
}

fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df.column(name)?.cast(&DataType::Float64)?;
    let values = series.f64()?.into_iter().collect();
    Ok(values)
}

/// Validate the schema and convert every usable row into a [`Transaction`].
///
/// Fails with [`ForecastError::SchemaError`] naming every missing required
/// column, and with [`ForecastError::EmptyDatasetError`] when no row
/// survives. A missing or non-numeric quantity counts as zero. Product ids
/// are numeric only when every id in the column is an integer. Extra columns
/// are ignored and `df` is left untouched.
pub fn extract_and_clean(df: &DataFrame) -> Result<CleanedTransactions> {
    let missing = missing_columns(df);
    if !missing.is_empty() {
        return Err(ForecastError::SchemaError { missing });
    }

    let categories = string_column(df, "product_category")?;
    let product_ids = string_column(df, "product_id")?;
    let quantities = numeric_column(df, "transaction_qty")?;
    let dates = string_column(df, "transaction_date")?;
    let id_kind = IdKind::infer(product_ids.iter().flatten().map(String::as_str));

    let mut cleaned = CleanedTransactions {
        transactions: Vec::with_capacity(df.height()),
        ..Default::default()
    };

    let rows = categories
        .into_iter()
        .zip(product_ids)
        .zip(quantities)
        .zip(dates);

    for (((category, product_id), quantity), date) in rows {
        let Some(transaction_date) = date.as_deref().and_then(parse_transaction_date) else {
            cleaned.unparseable_dates += 1;
            continue;
        };

        let (Some(product_category), Some(product_id)) = (category, product_id) else {
            cleaned.missing_keys += 1;
            continue;
        };

        cleaned.transactions.push(Transaction {
            product_category,
            product_id: ProductId::parse(&product_id, id_kind),
            transaction_qty: quantity.filter(|q| q.is_finite()).unwrap_or(0.0),
            transaction_date,
        });
    }

    if cleaned.transactions.is_empty() {
        return Err(ForecastError::EmptyDatasetError);
    }

    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::aggregate_monthly;
    use pretty_assertions::assert_eq;

    fn sample_frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("transaction_id", &[1i64, 2, 3, 4]),
            Series::new("product_category", &["Tea", "Tea", "Coffee", "Coffee"]),
            Series::new("product_id", &[7i64, 7, 9, 9]),
            Series::new("transaction_qty", &[2.0, 3.5, 1.0, 4.0]),
            Series::new(
                "transaction_date",
                &["05/01/2023", "garbage", "2023-02-10", "10 Mar 2023"],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_drops_unparseable_dates() {
        let cleaned = extract_and_clean(&sample_frame()).unwrap();

        assert_eq!(cleaned.transactions.len(), 3);
        assert_eq!(cleaned.unparseable_dates, 1);
        assert_eq!(cleaned.dropped_rows(), 1);
        assert_eq!(
            cleaned.transactions[0],
            Transaction {
                product_category: "Tea".to_string(),
                product_id: ProductId::Numeric(7),
                transaction_qty: 2.0,
                transaction_date: NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
            }
        );
    }

    #[test]
    fn test_input_frame_is_untouched() {
        let df = sample_frame();
        let _ = extract_and_clean(&df).unwrap();
        assert_eq!(df.width(), 5);
        assert_eq!(df.height(), 4);
    }

    #[test]
    fn test_schema_error_lists_missing() {
        let df = DataFrame::new(vec![Series::new("product_id", &[1i64])]).unwrap();
        match extract_and_clean(&df) {
            Err(ForecastError::SchemaError { missing }) => assert_eq!(
                missing,
                vec![
                    "product_category".to_string(),
                    "transaction_qty".to_string(),
                    "transaction_date".to_string()
                ]
            ),
            other => panic!("expected SchemaError, got {:?}", other),
        }
    }

    #[test]
    fn test_all_dates_invalid_is_empty_dataset() {
        let df = DataFrame::new(vec![
            Series::new("product_category", &["Tea"]),
            Series::new("product_id", &["A"]),
            Series::new("transaction_qty", &[1i64]),
            Series::new("transaction_date", &["someday"]),
        ])
        .unwrap();

        assert!(matches!(
            extract_and_clean(&df),
            Err(ForecastError::EmptyDatasetError)
        ));
    }

    #[test]
    fn test_non_numeric_quantity_counts_as_zero() {
        let df = DataFrame::new(vec![
            Series::new("product_category", &["Tea", "Tea"]),
            Series::new("product_id", &["A", "A"]),
            Series::new("transaction_qty", &["2", "n/a"]),
            Series::new("transaction_date", &["2023-01-01", "2023-01-02"]),
        ])
        .unwrap();

        let cleaned = extract_and_clean(&df).unwrap();
        assert_eq!(cleaned.transactions.len(), 2);
        assert_eq!(cleaned.transactions[0].transaction_qty, 2.0);
        assert_eq!(cleaned.transactions[1].transaction_qty, 0.0);
        assert_eq!(
            cleaned.transactions[0].product_id,
            ProductId::Text("A".to_string())
        );
    }

    #[test]
    fn test_missing_keys_dropped() {
        let df = DataFrame::new(vec![
            Series::new("product_category", &[Some("Tea"), None]),
            Series::new("product_id", &[Some("A"), Some("B")]),
            Series::new("transaction_qty", &[1i64, 1]),
            Series::new("transaction_date", &["2023-01-01", "2023-01-02"]),
        ])
        .unwrap();

        let cleaned = extract_and_clean(&df).unwrap();
        assert_eq!(cleaned.transactions.len(), 1);
        assert_eq!(cleaned.missing_keys, 1);
    }

    #[test]
    fn test_mixed_id_column_is_text() {
        let df = DataFrame::new(vec![
            Series::new("product_category", &["Tea", "Tea", "Tea"]),
            Series::new("product_id", &["9", "P1", "10"]),
            Series::new("transaction_qty", &[1i64, 1, 1]),
            Series::new(
                "transaction_date",
                &["2023-01-01", "2023-01-02", "2023-01-03"],
            ),
        ])
        .unwrap();

        let cleaned = extract_and_clean(&df).unwrap();
        assert!(cleaned
            .transactions
            .iter()
            .all(|tx| matches!(tx.product_id, ProductId::Text(_))));

        let order: Vec<String> = aggregate_monthly(&cleaned.transactions)
            .iter()
            .map(|m| m.product_id.to_string())
            .collect();
        assert_eq!(order, vec!["10", "9", "P1"]);
    }

    #[test]
    fn test_integer_id_column_is_numeric() {
        let df = DataFrame::new(vec![
            Series::new("product_category", &["Tea", "Tea"]),
            Series::new("product_id", &["10", "9"]),
            Series::new("transaction_qty", &[1i64, 1]),
            Series::new("transaction_date", &["2023-01-01", "2023-01-02"]),
        ])
        .unwrap();

        let cleaned = extract_and_clean(&df).unwrap();
        let order: Vec<String> = aggregate_monthly(&cleaned.transactions)
            .iter()
            .map(|m| m.product_id.to_string())
            .collect();
        assert_eq!(order, vec!["9", "10"]);
    }
}

//! Utility functions for the demand_forecast crate

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Split rows into training and holdout sets without shuffling.
///
/// The holdout is the trailing `ceil(len * test_ratio)` rows.
pub fn train_test_split<T: Clone>(data: &[T], test_ratio: f64) -> Result<(Vec<T>, Vec<T>)> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "test_ratio must be between 0 and 1 (exclusive), got {}",
            test_ratio
        )));
    }

    let test_size = (data.len() as f64 * test_ratio).ceil() as usize;
    let train_size = data.len() - test_size.min(data.len());

    Ok((data[..train_size].to_vec(), data[train_size..].to_vec()))
}

const CATEGORIES: [&str; 3] = ["Coffee", "Tea", "Bakery"];

/// Generate a transaction-level sales frame for tests and demos.
///
/// Each of `products` products (ids 101, 102, ...) sells on three days of
/// each of `months` consecutive months starting January 2023. Quantities
/// follow a per-product base level with a yearly bump in December and
/// seeded noise, so the same seed always yields the same frame. Dates are
/// written day-first (`dd/mm/yyyy`).
pub fn generate_sales_frame(products: usize, months: usize, seed: u64) -> Result<DataFrame> {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut transaction_ids = Vec::new();
    let mut dates = Vec::new();
    let mut product_ids = Vec::new();
    let mut categories = Vec::new();
    let mut quantities = Vec::new();

    for product in 0..products {
        let base = 5.0 + product as f64 * 3.0;
        for offset in 0..months {
            let year = 2023 + (offset / 12) as i32;
            let month = (offset % 12) as u32 + 1;
            let seasonal = if month == 12 { 1.5 } else { 1.0 };

            for day in [3, 14, 25] {
                let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
                    ForecastError::InvalidParameter(format!(
                        "Invalid generated date {}-{}-{}",
                        year, month, day
                    ))
                })?;
                let noise: f64 = rng.gen_range(-1.0..1.0);
                let qty = ((base + offset as f64 * 0.2) * seasonal + noise)
                    .round()
                    .max(0.0);

                transaction_ids.push(transaction_ids.len() as i64 + 1);
                dates.push(date.format("%d/%m/%Y").to_string());
                product_ids.push(101 + product as i64);
                categories.push(CATEGORIES[product % CATEGORIES.len()]);
                quantities.push(qty as i64);
            }
        }
    }

    let df = DataFrame::new(vec![
        Series::new("transaction_id", transaction_ids),
        Series::new("transaction_date", dates),
        Series::new("product_id", product_ids),
        Series::new("product_category", categories),
        Series::new("transaction_qty", quantities),
    ])?;

    Ok(df)
}

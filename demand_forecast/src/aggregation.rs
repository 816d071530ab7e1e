//! Monthly aggregation of transactions

use crate::cleaning::Transaction;
use crate::product::ProductId;
use chrono::Datelike;
use std::collections::BTreeMap;

/// Total quantity sold for one product in one calendar month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySales {
    pub product_id: ProductId,
    pub product_category: String,
    pub year: i32,
    pub month: u32,
    pub quantity_sum: f64,
}

/// Sum quantities per (product, category, year, month).
///
/// Output is ordered by product, then year, then month. Months without
/// transactions are not filled in, so consecutive rows of a product are
/// consecutive *observed* months.
pub fn aggregate_monthly(transactions: &[Transaction]) -> Vec<MonthlySales> {
    let mut totals: BTreeMap<(ProductId, i32, u32, &str), f64> = BTreeMap::new();

    for tx in transactions {
        let key = (
            tx.product_id.clone(),
            tx.transaction_date.year(),
            tx.transaction_date.month(),
            tx.product_category.as_str(),
        );
        *totals.entry(key).or_insert(0.0) += tx.transaction_qty;
    }

    totals
        .into_iter()
        .map(
            |((product_id, year, month, category), quantity_sum)| MonthlySales {
                product_id,
                product_category: category.to_string(),
                year,
                month,
                quantity_sum,
            },
        )
        .collect()
}

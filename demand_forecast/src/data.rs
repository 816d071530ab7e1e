//! Sales dataset loading and schema checks

use crate::error::{ForecastError, Result};
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

/// Columns every sales dataset must provide
pub const REQUIRED_COLUMNS: [&str; 4] = [
    "product_category",
    "product_id",
    "transaction_qty",
    "transaction_date",
];

/// Data loader for transaction-level sales data
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a sales dataset from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let path = path.as_ref();
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if !is_csv {
            return Err(ForecastError::InvalidParameter(format!(
                "File must be a CSV file: {}",
                path.display()
            )));
        }

        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Ok(df)
    }

    /// Load a sales dataset from any CSV byte stream, such as an upload body
    pub fn from_reader<R: Read>(mut reader: R) -> Result<DataFrame> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;

        let df = CsvReader::new(Cursor::new(buffer))
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Ok(df)
    }
}

/// Names of required columns absent from `df`, in canonical order
pub fn missing_columns(df: &DataFrame) -> Vec<String> {
    let available = df.get_column_names();
    REQUIRED_COLUMNS
        .iter()
        .filter(|column| !available.contains(column))
        .map(|column| column.to_string())
        .collect()
}

/// Number of leading rows shown by [`validate_dataset`]
pub const SAMPLE_ROWS: usize = 3;

/// One previewed row, keyed by column name; nulls are `None`
pub type SampleRow = BTreeMap<String, Option<String>>;

/// Whether a dataset can be fed to the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Valid,
    Invalid,
}

/// Row and column counts of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetShape {
    pub rows: usize,
    pub columns: usize,
}

/// Schema report for an uploaded dataset, produced without running the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetValidation {
    pub status: ValidationStatus,
    pub available_columns: Vec<String>,
    pub required_columns: Vec<String>,
    pub missing_columns: Vec<String>,
    pub dataset_shape: DatasetShape,
    /// The first [`SAMPLE_ROWS`] rows, every value rendered as text
    pub sample_rows: Vec<SampleRow>,
}

impl DatasetValidation {
    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Valid
    }
}

/// Leading rows of `df` as column-name maps
pub fn sample_rows(df: &DataFrame, limit: usize) -> Result<Vec<SampleRow>> {
    let head = df.head(Some(limit));
    let mut rows = vec![SampleRow::new(); head.height()];

    for series in head.get_columns() {
        let text = series.cast(&DataType::Utf8)?;
        for (row, value) in rows.iter_mut().zip(text.utf8()?.into_iter()) {
            row.insert(series.name().to_string(), value.map(str::to_string));
        }
    }

    Ok(rows)
}

/// Check a dataset's columns against [`REQUIRED_COLUMNS`] and preview its
/// first rows
pub fn validate_dataset(df: &DataFrame) -> Result<DatasetValidation> {
    let missing = missing_columns(df);
    let status = if missing.is_empty() {
        ValidationStatus::Valid
    } else {
        ValidationStatus::Invalid
    };

    Ok(DatasetValidation {
        status,
        available_columns: df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect(),
        required_columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        missing_columns: missing,
        dataset_shape: DatasetShape {
            rows: df.height(),
            columns: df.width(),
        },
        sample_rows: sample_rows(df, SAMPLE_ROWS)?,
    })
}

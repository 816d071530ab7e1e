//! # Demand Forecast
//!
//! A Rust library for forecasting next-month product demand from raw sales
//! transactions and turning the forecasts into restocking recommendations.
//!
//! ## Features
//!
//! - Transaction cleaning with tolerant date parsing
//! - Monthly aggregation per product and category
//! - Lag features (previous month, trailing three-month average) and a
//!   seasonal weight for the target month
//! - Random forest regression with a holdout evaluation (MAE, RMSE, R²)
//! - Stock report with a high-stock flag and percentage change per product
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use demand_forecast::{DataLoader, ForecastPipeline, PipelineConfig, TargetMonth};
//!
//! # fn main() -> demand_forecast::Result<()> {
//! let data = DataLoader::from_csv("sales.csv")?;
//! let target = TargetMonth::parse("March 2026")?;
//!
//! let pipeline = ForecastPipeline::new(PipelineConfig::default())?;
//! let output = pipeline.run(&data, target)?;
//!
//! for record in output.report.records() {
//!     println!(
//!         "{} -> {:.2} ({})",
//!         record.product_id, record.predicted_sales, record.stock_status
//!     );
//! }
//! println!("{}", output.metrics);
//! # Ok(())
//! # }
//! ```

pub mod aggregation;
pub mod cleaning;
pub mod config;
pub mod data;
pub mod dates;
pub mod error;
pub mod features;
pub mod forecaster;
pub mod models;
pub mod pipeline;
pub mod product;
pub mod report;
pub mod seasonal;
pub mod target;
pub mod training;
pub mod utils;

// Re-export commonly used types
pub use crate::config::{ForestConfig, PipelineConfig, SplitStrategy};
pub use crate::data::{validate_dataset, DataLoader, DatasetValidation};
pub use crate::error::{ForecastError, Result};
pub use crate::forecaster::ForecastRecord;
pub use crate::models::{DemandModel, RandomForestModel, TrainedDemandModel};
pub use crate::pipeline::{
    predict_sales_pipeline, ForecastPipeline, PipelineDiagnostics, PipelineOutput,
};
pub use crate::product::{ProductId, ProductIdMap};
pub use crate::report::{PredictionSummary, StockReport, StockReportRecord, StockStatus};
pub use crate::target::TargetMonth;
pub use sales_math::RegressionMetrics;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! # Restock
//!
//! Workspace facade for the restocking forecast crates.
//!
//! - [`demand_forecast`]: the forecasting pipeline, stock report and `restock` CLI
//! - [`sales_math`]: moving averages, summary statistics and regression metrics
//!
//! ## Example
//!
//! ```
//! use restock_workspace::demand_forecast::utils::generate_sales_frame;
//! use restock_workspace::demand_forecast::{ForecastPipeline, PipelineConfig, TargetMonth};
//!
//! let sales = generate_sales_frame(2, 8, 42).unwrap();
//! let mut config = PipelineConfig::default();
//! config.forest.n_trees = 10;
//!
//! let output = ForecastPipeline::new(config)
//!     .unwrap()
//!     .run(&sales, TargetMonth::parse("September 2023").unwrap())
//!     .unwrap();
//! assert_eq!(output.report.len(), 2);
//! ```

pub use demand_forecast;
pub use sales_math;

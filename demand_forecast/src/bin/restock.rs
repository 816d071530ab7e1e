//! # restock
//!
//! Command-line interface for next-month demand forecasts.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use demand_forecast::{
    validate_dataset, DataLoader, ForecastPipeline, PipelineConfig, PipelineOutput, StockReport,
    TargetMonth,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "restock")]
#[command(about = "Forecast next-month product demand from sales transactions", long_about = None)]
struct Cli {
    /// Emit log lines as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast every product for a target month
    Predict {
        /// Sales CSV with product_category, product_id, transaction_qty, transaction_date
        #[arg(short, long)]
        input: PathBuf,

        /// Target month, e.g. "March 2026"
        #[arg(short, long)]
        month: String,

        /// Only report this product
        #[arg(short, long)]
        product: Option<String>,

        /// Pipeline configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the report to this file; `.json` gives JSON, anything else CSV
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the full result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check that a sales CSV has the required columns
    Validate {
        /// Sales CSV to check
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn init_tracing(json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Commands::Predict {
            input,
            month,
            product,
            config,
            output,
            json,
        } => predict(
            &input,
            &month,
            product.as_deref(),
            config.as_deref(),
            output.as_deref(),
            json,
        ),
        Commands::Validate { input } => validate(&input),
    }
}

fn predict(
    input: &Path,
    month: &str,
    product: Option<&str>,
    config: Option<&Path>,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    // Reject a bad month before reading any data
    let target = TargetMonth::parse(month)?;

    let config = match config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    let data = DataLoader::from_csv(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    info!(
        rows = data.height(),
        columns = data.width(),
        "loaded sales data"
    );

    let pipeline = ForecastPipeline::new(config)?;
    let mut result = pipeline.run(&data, target)?;
    if let Some(product) = product {
        result.report = result.report.filter_product(product)?;
    }

    if let Some(path) = output {
        write_report(&result, path)?;
        info!(path = %path.display(), "wrote report");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&result);
    }
    Ok(())
}

fn write_report(result: &PipelineOutput, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = BufWriter::new(file);

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        serde_json::to_writer_pretty(writer, result)?;
    } else {
        result.report.write_csv(writer)?;
    }
    Ok(())
}

fn print_report(result: &PipelineOutput) {
    let report: &StockReport = &result.report;

    println!("Demand forecast for {}", result.target);
    println!(
        "{:<12} {:<20} {:>10} {:>10} {:>9}  {}",
        "product", "category", "previous", "predicted", "change", "status"
    );
    for record in report.records() {
        let change = record
            .stock_change_pct
            .map(|pct| format!("{:.2}%", pct))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "{:<12} {:<20} {:>10.2} {:>10.2} {:>9}  {}",
            record.product_id.to_string(),
            record.product_category,
            record.previous_month_sales,
            record.predicted_sales,
            change,
            record.stock_status
        );
    }

    let summary = report.summary();
    println!();
    println!(
        "{} products, {} need high stock (threshold {:.2})",
        summary.total_products,
        summary.high_stock_required,
        report.high_stock_threshold()
    );
    println!("{}", summary.insight);
    println!();
    print!("{}", result.metrics);
}

fn validate(input: &Path) -> Result<()> {
    let data = DataLoader::from_csv(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let validation = validate_dataset(&data)?;

    println!("{}", serde_json::to_string_pretty(&validation)?);
    if !validation.is_valid() {
        bail!("missing required columns: {:?}", validation.missing_columns);
    }
    Ok(())
}

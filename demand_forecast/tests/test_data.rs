use demand_forecast::data::{validate_dataset, DataLoader};
use demand_forecast::{ForecastError, PipelineConfig, SplitStrategy};
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
fn test_data_loader_from_csv() {
    let file = csv_file(
        "transaction_id,transaction_date,product_id,product_category,transaction_qty\n\
         1,01/01/2023,5,Coffee,2\n\
         2,02/01/2023,5,Coffee,1\n\
         3,2023-01-03,7,Tea,4\n",
    );

    let data = DataLoader::from_csv(file.path()).unwrap();
    assert_eq!(data.height(), 3);

    let validation = validate_dataset(&data).unwrap();
    assert!(validation.is_valid());
    assert!(validation.missing_columns.is_empty());
    assert_eq!(validation.dataset_shape.rows, 3);
    assert_eq!(validation.dataset_shape.columns, 5);

    assert_eq!(validation.sample_rows.len(), 3);
    assert_eq!(
        validation.sample_rows[2]["transaction_date"],
        Some("2023-01-03".to_string())
    );
}

#[test]
fn test_validation_reports_missing_columns() {
    let file = csv_file("product_id,transaction_qty\n1,2\n");

    let data = DataLoader::from_csv(file.path()).unwrap();
    let validation = validate_dataset(&data).unwrap();

    assert!(!validation.is_valid());
    assert_eq!(
        validation.missing_columns,
        vec!["product_category", "transaction_date"]
    );
    assert_eq!(
        validation.available_columns,
        vec!["product_id", "transaction_qty"]
    );
}

#[test]
fn test_data_loader_error_handling() {
    let result = DataLoader::from_csv("nonexistent_file.csv");
    assert!(matches!(result, Err(ForecastError::IoError(_))));

    let mut text = Builder::new().suffix(".txt").tempfile().unwrap();
    writeln!(text, "product_id\n1").unwrap();
    let result = DataLoader::from_csv(text.path());
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}

#[test]
fn test_data_loader_from_reader() {
    let body = "product_category,product_id,transaction_qty,transaction_date\nTea,1,3,2024-02-01\n";
    let data = DataLoader::from_reader(body.as_bytes()).unwrap();
    assert_eq!(data.height(), 1);
    assert!(validate_dataset(&data).unwrap().is_valid());
}

#[test]
fn test_config_from_json_file() {
    let mut file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{ "forest": {{ "n_trees": 50 }}, "split_strategy": "temporal" }}"#
    )
    .unwrap();

    let config = PipelineConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.forest.n_trees, 50);
    assert_eq!(config.forest.max_depth, 10);
    assert_eq!(config.forest.seed, 42);
    assert_eq!(config.split_strategy, SplitStrategy::Temporal);
    assert_eq!(config.test_ratio, 0.2);
}

#[test]
fn test_config_rejects_bad_values() {
    let mut file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{ "test_ratio": 1.5 }}"#).unwrap();
    assert!(matches!(
        PipelineConfig::from_json_file(file.path()),
        Err(ForecastError::InvalidParameter(_))
    ));

    let mut file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, "not json").unwrap();
    assert!(matches!(
        PipelineConfig::from_json_file(file.path()),
        Err(ForecastError::ConfigError(_))
    ));
}

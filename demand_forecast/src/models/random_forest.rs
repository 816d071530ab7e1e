//! Random forest regression backed by smartcore

use crate::config::ForestConfig;
use crate::error::{ForecastError, Result};
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::models::{DemandModel, TrainedDemandModel};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fmt;

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest regressor settings
#[derive(Debug, Clone)]
pub struct RandomForestModel {
    /// Name of the model
    name: String,
    config: ForestConfig,
}

/// Fitted random forest
pub struct TrainedRandomForest {
    /// Name of the model
    name: String,
    forest: Forest,
}

impl RandomForestModel {
    /// Create a new random forest model
    pub fn new(config: ForestConfig) -> Result<Self> {
        if config.n_trees == 0 {
            return Err(ForecastError::InvalidParameter(
                "Number of trees must be positive".to_string(),
            ));
        }
        if config.max_depth == 0 {
            return Err(ForecastError::InvalidParameter(
                "Maximum depth must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!(
                "Random Forest (trees={}, max_depth={}, seed={})",
                config.n_trees, config.max_depth, config.seed
            ),
            config,
        })
    }

    fn parameters(&self) -> RandomForestRegressorParameters {
        RandomForestRegressorParameters {
            n_trees: self.config.n_trees,
            max_depth: Some(self.config.max_depth),
            // Consider every feature at each split
            m: Some(FEATURE_COUNT),
            seed: self.config.seed,
            ..Default::default()
        }
    }
}

fn to_matrix(features: &[FeatureVector]) -> DenseMatrix<f64> {
    let rows: Vec<Vec<f64>> = features.iter().map(|row| row.to_vec()).collect();
    DenseMatrix::from_2d_vec(&rows)
}

impl DemandModel for RandomForestModel {
    type Trained = TrainedRandomForest;

    fn train(&self, features: &[FeatureVector], targets: &[f64]) -> Result<Self::Trained> {
        if features.is_empty() {
            return Err(ForecastError::TrainingError(
                "Cannot fit a random forest on zero rows".to_string(),
            ));
        }
        if features.len() != targets.len() {
            return Err(ForecastError::TrainingError(format!(
                "Feature rows ({}) and targets ({}) differ in length",
                features.len(),
                targets.len()
            )));
        }

        let x = to_matrix(features);
        let y = targets.to_vec();
        let forest = RandomForestRegressor::fit(&x, &y, self.parameters())
            .map_err(|e| ForecastError::TrainingError(e.to_string()))?;

        Ok(TrainedRandomForest {
            name: self.name.clone(),
            forest,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for TrainedRandomForest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainedRandomForest")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl TrainedDemandModel for TrainedRandomForest {
    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>> {
        if features.is_empty() {
            return Ok(Vec::new());
        }

        self.forest
            .predict(&to_matrix(features))
            .map_err(|e| ForecastError::TrainingError(format!("Prediction failed: {}", e)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

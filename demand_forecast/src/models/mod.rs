//! Regression models for monthly demand

use crate::error::Result;
use crate::features::FeatureVector;
use std::fmt::Debug;

/// A fitted model that scores feature rows
pub trait TrainedDemandModel: Debug {
    /// Predict the monthly quantity for each row
    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Demand model that can be trained on feature rows
pub trait DemandModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedDemandModel;

    /// Fit the model to `features` and their observed `targets`
    fn train(&self, features: &[FeatureVector], targets: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod random_forest;

pub use random_forest::{RandomForestModel, TrainedRandomForest};

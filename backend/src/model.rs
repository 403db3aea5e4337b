use crate::features::TripFeatures;
use serde::{Deserialize, Serialize};
use shared::{ACTIVITY_BUDGET, FOOD_BUDGET, HOTEL_BUDGET, PredictedBudgets};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Artifact parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid artifact: {0}")]
    Shape(String),
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalFeature {
    pub name: String,
    pub categories: Vec<String>,
}

/// Multi-target linear regression over passthrough numeric features and
/// one-hot encoded categorical features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetModel {
    pub targets: Vec<String>,
    pub numeric_features: Vec<String>,
    pub categorical_features: Vec<CategoricalFeature>,
    /// One row per target, `encoded_width()` columns each.
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl BudgetModel {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let artifact = std::fs::read_to_string(path)?;
        Self::from_yaml(&artifact)
    }

    pub fn from_yaml(artifact: &str) -> Result<Self, ModelError> {
        let model: BudgetModel = serde_yaml::from_str(artifact)?;
        model.validate()?;
        Ok(model)
    }

    pub fn encoded_width(&self) -> usize {
        self.numeric_features.len()
            + self
                .categorical_features
                .iter()
                .map(|feature| feature.categories.len())
                .sum::<usize>()
    }

    fn validate(&self) -> Result<(), ModelError> {
        for target in [HOTEL_BUDGET, FOOD_BUDGET, ACTIVITY_BUDGET] {
            if !self.targets.iter().any(|t| t == target) {
                return Err(ModelError::Shape(format!("missing target {:?}", target)));
            }
        }
        if self.coefficients.len() != self.targets.len()
            || self.intercepts.len() != self.targets.len()
        {
            return Err(ModelError::Shape(format!(
                "{} targets but {} coefficient rows and {} intercepts",
                self.targets.len(),
                self.coefficients.len(),
                self.intercepts.len()
            )));
        }

        let width = self.encoded_width();
        if let Some(row) = self.coefficients.iter().find(|row| row.len() != width) {
            return Err(ModelError::Shape(format!(
                "coefficient row has {} columns, expected {}",
                row.len(),
                width
            )));
        }
        Ok(())
    }

    /// Feature vector in coefficient column order. Unknown categories encode
    /// as all zeros.
    pub fn encode(&self, features: &TripFeatures) -> Result<Vec<f64>, ModelError> {
        let mut encoded = Vec::with_capacity(self.encoded_width());

        for name in &self.numeric_features {
            let value = features
                .numeric(name)
                .ok_or_else(|| ModelError::UnknownFeature(name.clone()))?;
            encoded.push(value);
        }

        for feature in &self.categorical_features {
            let value = features
                .categorical(&feature.name)
                .ok_or_else(|| ModelError::UnknownFeature(feature.name.clone()))?;
            encoded.extend(
                feature
                    .categories
                    .iter()
                    .map(|category| if category == value { 1.0 } else { 0.0 }),
            );
        }

        Ok(encoded)
    }

    pub fn predict(&self, features: &TripFeatures) -> Result<PredictedBudgets, ModelError> {
        let encoded = self.encode(features)?;
        let target = |name: &str| -> f64 {
            let index = self.targets.iter().position(|t| t == name).unwrap_or_default();
            let dot: f64 = self.coefficients[index]
                .iter()
                .zip(&encoded)
                .map(|(weight, x)| weight * x)
                .sum();
            self.intercepts[index] + dot
        };

        Ok(PredictedBudgets {
            hotel: target(HOTEL_BUDGET),
            food: target(FOOD_BUDGET),
            activity: target(ACTIVITY_BUDGET),
        })
    }
}

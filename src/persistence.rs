//! Model serialization and persistence
//!
//! This module provides functionality to save and load trained QBoost models
//! for use with the CLI application and other scenarios where model persistence is needed.

use crate::api::TrainedModel;
use crate::classifier::QboostClassifier;
use crate::core::{QboostError, Result, WeightVector};
use crate::ensemble::{DecisionStump, WeakClassifierEnsemble};
use crate::utils::scaling::ScalingParams;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable representation of a trained QBoost model
#[derive(Serialize, Deserialize)]
pub struct SerializableModel {
    /// Fitted decision stumps, one per ensemble member
    pub stumps: Vec<SerializableStump>,
    /// Selected binary weights, one bit per stump
    pub weights: Vec<u8>,
    /// Training data dimensionality, enforced at predict time
    pub n_features: usize,
    /// Sparsity penalty used at training time
    pub lambda: f64,
    /// Majority label returned when no learner is selected
    pub fallback_label: f64,
    /// Feature scaling fitted on the training data, if enabled
    pub scaling: Option<ScalingParams>,
    /// Model metadata
    pub metadata: ModelMetadata,
}

/// Serializable decision stump representation
#[derive(Serialize, Deserialize, Clone)]
pub struct SerializableStump {
    /// Feature index the stump thresholds on
    pub feature: usize,
    /// Decision threshold
    pub threshold: f64,
    /// Vote polarity, +1 or -1
    pub polarity: f64,
}

/// Model metadata for tracking and validation
#[derive(Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    /// Total number of weak learners in the ensemble
    pub n_learners: usize,
    /// Number of learners the optimizer selected
    pub n_selected: usize,
    /// Creation timestamp
    pub created_at: String,
}

impl From<&DecisionStump> for SerializableStump {
    fn from(stump: &DecisionStump) -> Self {
        Self {
            feature: stump.feature(),
            threshold: stump.threshold(),
            polarity: stump.polarity(),
        }
    }
}

impl From<&SerializableStump> for DecisionStump {
    fn from(s: &SerializableStump) -> Self {
        DecisionStump::from_parts(s.feature, s.threshold, s.polarity)
    }
}

impl SerializableModel {
    /// Create a serializable model from a trained model
    pub fn from_trained_model(model: &TrainedModel) -> Result<Self> {
        let inner = model.inner();
        let weights = inner.weights().ok_or(QboostError::NotFitted)?;

        let stumps: Vec<SerializableStump> = inner
            .ensemble()
            .learners()
            .iter()
            .map(SerializableStump::from)
            .collect();

        Ok(Self {
            stumps,
            weights: weights.bits().to_vec(),
            n_features: inner.n_features(),
            lambda: inner.lambda(),
            fallback_label: inner.fallback_label(),
            scaling: model.scaling().cloned(),
            metadata: ModelMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                n_learners: weights.len(),
                n_selected: weights.n_selected(),
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        })
    }

    /// Save model to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(QboostError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| QboostError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load model from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(QboostError::IoError)?;
        let reader = BufReader::new(file);
        let model = serde_json::from_reader(reader)
            .map_err(|e| QboostError::SerializationError(e.to_string()))?;
        Ok(model)
    }

    /// Convert back to a trained model
    pub fn to_trained_model(&self) -> Result<TrainedModel> {
        let learners: Vec<DecisionStump> = self.stumps.iter().map(DecisionStump::from).collect();
        let ensemble = WeakClassifierEnsemble::from_fitted(learners)?;
        let classifier = QboostClassifier::from_parts(
            ensemble,
            self.lambda,
            self.n_features,
            WeightVector::new(self.weights.clone()),
            self.fallback_label,
        )?;
        Ok(TrainedModel::from_parts(classifier, self.scaling.clone()))
    }

    /// Print model summary
    pub fn print_summary(&self) {
        println!("=== QBoost Model Summary ===");
        println!("Weak Learners: {}", self.metadata.n_learners);
        println!("Selected Learners: {}", self.metadata.n_selected);
        println!("Features: {}", self.n_features);
        println!("Lambda: {}", self.lambda);
        println!("Fallback Label: {:+}", self.fallback_label);
        println!(
            "Feature Scaling: {}",
            if self.scaling.is_some() {
                "enabled"
            } else {
                "disabled"
            }
        );
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at);
    }
}

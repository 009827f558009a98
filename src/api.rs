//! High-level API for QBoost operations
//!
//! This module provides a user-friendly interface for common tasks:
//! training, prediction, and model evaluation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use qboost::api::Qboost;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Train a model on data
//! let model = Qboost::new()
//!     .with_lambda(0.05)
//!     .train_from_csv("data.csv")?;
//!
//! // Make predictions
//! println!("Accuracy: {:.2}%", model.evaluate_from_csv("test.csv")? * 100.0);
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::time::Duration;

use crate::classifier::QboostClassifier;
use crate::core::{
    BinaryOptimizer, Dataset, Prediction, QboostError, Result, Sample, SampleParams,
};
use crate::data::{CsvDataset, LibsvmDataset};
use crate::ensemble::WeakClassifierEnsemble;
use crate::optimizer::ExactSolver;
use crate::utils::scaling::{fit_transform, ScalingMethod, ScalingParams};

/// High-level QBoost interface with builder pattern
pub struct Qboost<O: BinaryOptimizer = ExactSolver> {
    optimizer: O,
    lambda: f64,
    n_stumps: Option<usize>,
    params: SampleParams,
    scaling: Option<ScalingMethod>,
}

impl Qboost<ExactSolver> {
    /// Create a new QBoost trainer with the exact solver and defaults
    pub fn new() -> Self {
        Self::with_optimizer(ExactSolver::new())
    }
}

impl Default for Qboost<ExactSolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: BinaryOptimizer> Qboost<O> {
    /// Create a trainer with a custom optimizer backend
    pub fn with_optimizer(optimizer: O) -> Self {
        Self {
            optimizer,
            lambda: 0.0,
            n_stumps: None,
            params: SampleParams::default(),
            scaling: None,
        }
    }

    /// Set the sparsity penalty strength
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Set the number of decision stumps (default: one per feature)
    pub fn with_stump_count(mut self, n: usize) -> Self {
        self.n_stumps = Some(n);
        self
    }

    /// Set the number of optimizer reads
    pub fn with_num_reads(mut self, num_reads: usize) -> Self {
        self.params.num_reads = num_reads;
        self
    }

    /// Bound the wall-clock time of the optimizer call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.params.timeout = Some(timeout);
        self
    }

    /// Seed the optimizer RNG for reproducible stochastic sampling
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.params.seed = Some(seed);
        self
    }

    /// Enable feature scaling fitted on the training data
    pub fn with_feature_scaling(mut self, method: ScalingMethod) -> Self {
        self.scaling = Some(method);
        self
    }

    /// Train on samples
    pub fn train_samples(self, samples: &[Sample]) -> Result<TrainedModel> {
        if samples.is_empty() {
            return Err(QboostError::EmptyDataset);
        }
        let dim = samples[0].features.len();
        if dim == 0 {
            return Err(QboostError::InvalidDataset(
                "samples have no features".to_string(),
            ));
        }

        let (training_samples, scaling_params) = match self.scaling {
            Some(method) => {
                let (scaled, params) = fit_transform(samples, method)?;
                (scaled, Some(params))
            }
            None => (samples.to_vec(), None),
        };

        let n_stumps = self.n_stumps.unwrap_or(dim);
        let ensemble = WeakClassifierEnsemble::of_stumps(n_stumps)?;
        let mut classifier = QboostClassifier::new(ensemble, self.lambda)?;
        classifier.fit(&training_samples, &self.optimizer, &self.params)?;

        Ok(TrainedModel {
            classifier,
            scaling: scaling_params,
        })
    }

    /// Train on a dataset
    pub fn train<D: Dataset>(self, dataset: &D) -> Result<TrainedModel> {
        let samples: Vec<Sample> = (0..dataset.len()).map(|i| dataset.get_sample(i)).collect();
        self.train_samples(&samples)
    }

    /// Train from a LibSVM format file
    pub fn train_from_file<P: AsRef<Path>>(self, path: P) -> Result<TrainedModel> {
        let dataset = LibsvmDataset::from_file(path)?;
        self.train(&dataset)
    }

    /// Train from a CSV file (automatically detects headers)
    pub fn train_from_csv<P: AsRef<Path>>(self, path: P) -> Result<TrainedModel> {
        let dataset = CsvDataset::from_file(path)?;
        self.train(&dataset)
    }
}

/// Trained QBoost model with high-level prediction interface
pub struct TrainedModel {
    classifier: QboostClassifier,
    scaling: Option<ScalingParams>,
}

impl TrainedModel {
    /// Reassemble a model from stored parts (model loading)
    pub(crate) fn from_parts(
        classifier: QboostClassifier,
        scaling: Option<ScalingParams>,
    ) -> Self {
        Self { classifier, scaling }
    }

    fn scaled_features(&self, sample: &Sample) -> Result<Vec<f64>> {
        match &self.scaling {
            Some(params) => {
                // The zip in transform_sample would silently truncate a
                // longer vector; reject the mismatch up front
                if sample.dim() != params.feature_stats.len() {
                    return Err(QboostError::DimensionMismatch {
                        expected: params.feature_stats.len(),
                        actual: sample.dim(),
                    });
                }
                Ok(params.transform_sample(sample).features)
            }
            None => Ok(sample.features.clone()),
        }
    }

    /// Predict a single sample.
    ///
    /// Label and margin both come from the underlying classifier, which
    /// owns the sign and fallback conventions; a feature vector whose
    /// length differs from the training data is a dimension error.
    pub fn predict(&self, sample: &Sample) -> Result<Prediction> {
        let features = self.scaled_features(sample)?;
        let label = self.classifier.predict(&features)?;
        let margin = self.classifier.decision_function(&features)?;
        Ok(Prediction::new(label, margin))
    }

    /// Predict multiple samples
    pub fn predict_batch(&self, samples: &[Sample]) -> Result<Vec<Prediction>> {
        samples.iter().map(|s| self.predict(s)).collect()
    }

    /// Predict from a dataset
    pub fn predict_dataset<D: Dataset>(&self, dataset: &D) -> Result<Vec<Prediction>> {
        let samples: Vec<Sample> = (0..dataset.len()).map(|i| dataset.get_sample(i)).collect();
        self.predict_batch(&samples)
    }

    /// Predict from a LibSVM file
    pub fn predict_from_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Prediction>> {
        let dataset = LibsvmDataset::from_file(path)?;
        self.predict_dataset(&dataset)
    }

    /// Predict from a CSV file
    pub fn predict_from_csv<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Prediction>> {
        let dataset = CsvDataset::from_file(path)?;
        self.predict_dataset(&dataset)
    }

    /// Evaluate accuracy on a dataset
    pub fn evaluate<D: Dataset>(&self, dataset: &D) -> Result<f64> {
        let predictions = self.predict_dataset(dataset)?;
        let labels = dataset.get_labels();

        let correct = predictions
            .iter()
            .zip(labels.iter())
            .filter(|(pred, &actual)| pred.label == actual)
            .count();

        Ok(correct as f64 / labels.len() as f64)
    }

    /// Evaluate accuracy from a LibSVM file
    pub fn evaluate_from_file<P: AsRef<Path>>(&self, path: P) -> Result<f64> {
        let dataset = LibsvmDataset::from_file(path)?;
        self.evaluate(&dataset)
    }

    /// Evaluate accuracy from a CSV file
    pub fn evaluate_from_csv<P: AsRef<Path>>(&self, path: P) -> Result<f64> {
        let dataset = CsvDataset::from_file(path)?;
        self.evaluate(&dataset)
    }

    /// Get detailed evaluation metrics
    pub fn evaluate_detailed<D: Dataset>(&self, dataset: &D) -> Result<EvaluationMetrics> {
        let predictions = self.predict_dataset(dataset)?;
        let labels = dataset.get_labels();

        let mut tp = 0;
        let mut tn = 0;
        let mut fp = 0;
        let mut fn_ = 0;

        for (pred, &actual) in predictions.iter().zip(labels.iter()) {
            match (pred.label > 0.0, actual > 0.0) {
                (true, true) => tp += 1,
                (false, false) => tn += 1,
                (true, false) => fp += 1,
                (false, true) => fn_ += 1,
            }
        }

        Ok(EvaluationMetrics::new(tp, tn, fp, fn_))
    }

    /// Get model information
    pub fn info(&self) -> ModelInfo {
        let (n_learners, n_selected) = match self.classifier.weights() {
            Some(w) => (w.len(), w.n_selected()),
            None => (self.classifier.n_learners(), 0),
        };
        ModelInfo {
            n_learners,
            n_selected,
            lambda: self.classifier.lambda(),
            fallback_label: self.classifier.fallback_label(),
            best_energy: self.classifier.best_energy(),
        }
    }

    /// The underlying trained classifier
    pub fn inner(&self) -> &QboostClassifier {
        &self.classifier
    }

    /// Fitted scaling parameters, if feature scaling was enabled
    pub fn scaling(&self) -> Option<&ScalingParams> {
        self.scaling.as_ref()
    }
}

/// Detailed evaluation metrics
#[derive(Debug, Clone)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationMetrics {
    fn new(tp: usize, tn: usize, fp: usize, fn_: usize) -> Self {
        Self {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
        }
    }

    /// Calculate accuracy: (TP + TN) / (TP + TN + FP + FN)
    pub fn accuracy(&self) -> f64 {
        let total =
            self.true_positives + self.true_negatives + self.false_positives + self.false_negatives;
        if total == 0 {
            0.0
        } else {
            (self.true_positives + self.true_negatives) as f64 / total as f64
        }
    }

    /// Calculate precision: TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        let denominator = self.true_positives + self.false_positives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Calculate recall (sensitivity): TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        let denominator = self.true_positives + self.false_negatives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Calculate F1 score: 2 * (precision * recall) / (precision + recall)
    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }

    /// Calculate specificity: TN / (TN + FP)
    pub fn specificity(&self) -> f64 {
        let denominator = self.true_negatives + self.false_positives;
        if denominator == 0 {
            0.0
        } else {
            self.true_negatives as f64 / denominator as f64
        }
    }
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub n_learners: usize,
    pub n_selected: usize,
    pub lambda: f64,
    pub fallback_label: f64,
    pub best_energy: f64,
}

/// Convenience functions for quick operations
pub mod quick {
    use super::*;

    /// Train on LibSVM data with default parameters
    pub fn train_libsvm<P: AsRef<Path>>(path: P) -> Result<TrainedModel> {
        Qboost::new().train_from_file(path)
    }

    /// Train on CSV data with default parameters
    pub fn train_csv<P: AsRef<Path>>(path: P) -> Result<TrainedModel> {
        Qboost::new().train_from_csv(path)
    }

    /// Train with a custom sparsity penalty
    pub fn train_libsvm_with_lambda<P: AsRef<Path>>(path: P, lambda: f64) -> Result<TrainedModel> {
        Qboost::new().with_lambda(lambda).train_from_file(path)
    }

    /// Quick evaluation: train on training file, test on test file
    pub fn evaluate_split<P1: AsRef<Path>, P2: AsRef<Path>>(
        train_path: P1,
        test_path: P2,
    ) -> Result<f64> {
        let model = train_libsvm(train_path)?;
        model.evaluate_from_file(test_path)
    }

    /// Quick evaluation with custom penalty and optional feature scaling
    pub fn evaluate_split_with_params<P1: AsRef<Path>, P2: AsRef<Path>>(
        train_path: P1,
        test_path: P2,
        lambda: f64,
        scaling: Option<ScalingMethod>,
    ) -> Result<f64> {
        let mut trainer = Qboost::new().with_lambda(lambda);
        if let Some(method) = scaling {
            trainer = trainer.with_feature_scaling(method);
        }
        let model = trainer.train_from_file(train_path)?;
        model.evaluate_from_file(test_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn separable_samples() -> Vec<Sample> {
        vec![
            Sample::new(vec![2.0, 1.0], 1.0),
            Sample::new(vec![1.5, 0.8], 1.0),
            Sample::new(vec![-2.0, -1.0], -1.0),
            Sample::new(vec![-1.5, -0.8], -1.0),
        ]
    }

    #[test]
    fn test_builder_pattern() {
        let trainer = Qboost::new()
            .with_lambda(0.1)
            .with_num_reads(5)
            .with_seed(7)
            .with_stump_count(3);

        assert_eq!(trainer.lambda, 0.1);
        assert_eq!(trainer.params.num_reads, 5);
        assert_eq!(trainer.params.seed, Some(7));
        assert_eq!(trainer.n_stumps, Some(3));
    }

    #[test]
    fn test_train_and_predict() {
        let model = Qboost::new()
            .train_samples(&separable_samples())
            .expect("training should succeed");

        let prediction = model
            .predict(&Sample::new(vec![1.0, 0.5], 1.0))
            .expect("prediction should succeed");
        assert_eq!(prediction.label, 1.0);

        let info = model.info();
        assert_eq!(info.n_learners, 2);
        assert!(info.n_selected > 0);
    }

    #[test]
    fn test_train_with_scaling() {
        let model = Qboost::new()
            .with_feature_scaling(ScalingMethod::StandardScore)
            .train_samples(&separable_samples())
            .expect("training should succeed");

        assert!(model.scaling().is_some());
        for sample in separable_samples() {
            let prediction = model.predict(&sample).expect("prediction should succeed");
            assert_eq!(prediction.label, sample.label);
        }
    }

    #[test]
    fn test_predict_wrong_dimension_is_an_error() {
        let model = Qboost::new()
            .train_samples(&separable_samples())
            .expect("training should succeed");

        assert!(matches!(
            model.predict(&Sample::new(vec![1.0], 1.0)),
            Err(QboostError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert!(matches!(
            model.predict(&Sample::new(vec![1.0, 2.0, 3.0], 1.0)),
            Err(QboostError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_predict_wrong_dimension_with_scaling_is_an_error() {
        let model = Qboost::new()
            .with_feature_scaling(ScalingMethod::StandardScore)
            .train_samples(&separable_samples())
            .expect("training should succeed");

        // A longer vector must not be silently truncated by the scaler
        assert!(matches!(
            model.predict(&Sample::new(vec![1.0, 2.0, 3.0], 1.0)),
            Err(QboostError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_evaluation_metrics() {
        let metrics = EvaluationMetrics::new(10, 5, 2, 3);

        assert_eq!(metrics.accuracy(), 0.75); // (10+5)/(10+5+2+3)
        assert_eq!(metrics.precision(), 10.0 / 12.0); // 10/(10+2)
        assert_eq!(metrics.recall(), 10.0 / 13.0); // 10/(10+3)
        assert!(metrics.f1_score() > 0.0);
        assert_eq!(metrics.specificity(), 5.0 / 7.0); // 5/(5+2)
    }

    #[test]
    fn test_file_operations() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "+1 1:2.0 2:1.0").expect("Failed to write");
        writeln!(temp_file, "-1 1:-2.0 2:-1.0").expect("Failed to write");
        writeln!(temp_file, "+1 1:1.5 2:0.8").expect("Failed to write");
        writeln!(temp_file, "-1 1:-1.5 2:-0.8").expect("Failed to write");
        temp_file.flush().expect("Failed to flush");

        let model = Qboost::new()
            .train_from_file(temp_file.path())
            .expect("training should succeed");

        let accuracy = model
            .evaluate_from_file(temp_file.path())
            .expect("evaluation should succeed");
        assert_eq!(accuracy, 1.0);

        let model2 = quick::train_libsvm(temp_file.path()).expect("quick training should succeed");
        assert!(model2.info().n_selected > 0);
    }

    #[test]
    fn test_empty_training_set_rejected() {
        assert!(matches!(
            Qboost::new().train_samples(&[]),
            Err(QboostError::EmptyDataset)
        ));
    }
}

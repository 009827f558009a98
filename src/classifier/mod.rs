//! QBoost classifiers
//!
//! [`QboostClassifier`] optimizes binary weights over a homogeneous
//! ensemble of trainable weak learners; [`QboostPlusClassifier`] runs the
//! identical optimization over a caller-supplied heterogeneous list of
//! already-trained classifiers. Both feed the same QUBO builder and
//! consume the same optimizer contract.

use log::info;

use crate::core::{
    BinaryOptimizer, PredictionMatrix, QboostError, Result, Sample, SampleParams,
    TrainableWeakClassifier, WeakClassifier, WeightVector,
};
use crate::ensemble::{collect_votes, DecisionStump, WeakClassifierEnsemble};
use crate::qubo::QuboBuilder;

fn validate_lambda(lambda: f64) -> Result<()> {
    if !lambda.is_finite() || lambda < 0.0 {
        return Err(QboostError::InvalidParameter(format!(
            "lambda must be finite and non-negative, got {lambda}"
        )));
    }
    Ok(())
}

/// Build the QUBO over the vote matrix and run the optimizer, returning
/// the lowest-energy weight vector. Shared verbatim by both classifiers.
fn optimize_weights(
    matrix: &PredictionMatrix,
    labels: &[f64],
    lambda: f64,
    optimizer: &dyn BinaryOptimizer,
    params: &SampleParams,
) -> Result<(WeightVector, f64)> {
    let qubo = QuboBuilder::build(matrix, labels, lambda)?;
    let response = optimizer.sample(&qubo, params)?;
    let best = response.best().ok_or(QboostError::EmptyResponse)?;
    if best.bits.len() != matrix.n_learners() {
        return Err(QboostError::OptimizationFailed(format!(
            "solver returned {} bits for {} learners",
            best.bits.len(),
            matrix.n_learners()
        )));
    }
    Ok((WeightVector::new(best.bits.clone()), best.energy))
}

/// Majority training label, +1 on ties
fn majority_label(labels: &[f64]) -> f64 {
    let positives = labels.iter().filter(|&&y| y > 0.0).count();
    if 2 * positives >= labels.len() {
        1.0
    } else {
        -1.0
    }
}

/// Threshold a weighted vote sum into a bipolar label (0 maps to +1)
fn threshold_margin(margin: f64) -> f64 {
    if margin >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Weight-optimized ensemble classifier
///
/// Fit transitions the classifier from untrained to trained by writing
/// the weight vector exactly once; predict is a stateless read of the
/// trained state. Concurrent fit and predict on one instance is not
/// supported.
pub struct QboostClassifier<L: TrainableWeakClassifier = DecisionStump> {
    ensemble: WeakClassifierEnsemble<L>,
    lambda: f64,
    dim: usize,
    weights: Option<WeightVector>,
    fallback_label: f64,
    best_energy: f64,
}

impl<L: TrainableWeakClassifier> QboostClassifier<L> {
    /// Create an untrained classifier over an ensemble
    pub fn new(ensemble: WeakClassifierEnsemble<L>, lambda: f64) -> Result<Self> {
        validate_lambda(lambda)?;
        Ok(Self {
            ensemble,
            lambda,
            dim: 0,
            weights: None,
            fallback_label: 1.0,
            best_energy: f64::NAN,
        })
    }

    /// Reassemble a trained classifier from stored state (model loading)
    pub(crate) fn from_parts(
        ensemble: WeakClassifierEnsemble<L>,
        lambda: f64,
        dim: usize,
        weights: WeightVector,
        fallback_label: f64,
    ) -> Result<Self> {
        validate_lambda(lambda)?;
        if !ensemble.is_fitted() {
            return Err(QboostError::NotFitted);
        }
        if weights.len() != ensemble.len() {
            return Err(QboostError::DimensionMismatch {
                expected: ensemble.len(),
                actual: weights.len(),
            });
        }
        Ok(Self {
            ensemble,
            lambda,
            dim,
            weights: Some(weights),
            fallback_label,
            best_energy: f64::NAN,
        })
    }

    /// Train the classifier.
    ///
    /// Fits the weak ensemble if it is not already trained, builds the
    /// vote matrix and the QUBO over the training data, runs the
    /// optimizer, and stores the best weight vector. Fails without
    /// partial state on any optimizer error.
    pub fn fit(
        &mut self,
        samples: &[Sample],
        optimizer: &dyn BinaryOptimizer,
        params: &SampleParams,
    ) -> Result<()> {
        if samples.is_empty() {
            return Err(QboostError::EmptyDataset);
        }
        let labels: Vec<f64> = samples.iter().map(|s| s.label).collect();

        if !self.ensemble.is_fitted() {
            self.ensemble.fit(samples)?;
        }
        let matrix = self.ensemble.prediction_matrix(samples)?;
        let (weights, energy) =
            optimize_weights(&matrix, &labels, self.lambda, optimizer, params)?;

        info!(
            "qboost fit: {}/{} learners selected, energy {energy:.6}",
            weights.n_selected(),
            weights.len()
        );

        self.dim = samples[0].dim();
        self.fallback_label = majority_label(&labels);
        self.best_energy = energy;
        self.weights = Some(weights);
        Ok(())
    }

    /// Check a feature vector against the training dimensionality
    fn check_dim(&self, features: &[f64]) -> Result<()> {
        if features.len() != self.dim {
            return Err(QboostError::DimensionMismatch {
                expected: self.dim,
                actual: features.len(),
            });
        }
        Ok(())
    }

    /// Weighted vote sum before thresholding
    pub fn decision_function(&self, features: &[f64]) -> Result<f64> {
        let weights = self.weights.as_ref().ok_or(QboostError::NotFitted)?;
        self.check_dim(features)?;
        let votes = self.ensemble.votes(features);
        Ok(weights
            .bits()
            .iter()
            .zip(votes.iter())
            .map(|(&w, &v)| w as f64 * v)
            .sum())
    }

    /// Predict the bipolar label for a feature vector.
    ///
    /// An all-zero weight vector (the optimizer dropped every learner)
    /// deterministically predicts the majority training label rather
    /// than failing.
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        let weights = self.weights.as_ref().ok_or(QboostError::NotFitted)?;
        self.check_dim(features)?;
        if weights.is_all_zero() {
            return Ok(self.fallback_label);
        }
        Ok(threshold_margin(self.decision_function(features)?))
    }

    /// Predict labels for a batch of samples
    pub fn predict_batch(&self, samples: &[Sample]) -> Result<Vec<f64>> {
        samples.iter().map(|s| self.predict(&s.features)).collect()
    }

    /// Whether fit has completed
    pub fn is_fitted(&self) -> bool {
        self.weights.is_some()
    }

    /// Sparsity penalty strength
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Number of ensemble learners
    pub fn n_learners(&self) -> usize {
        self.ensemble.len()
    }

    /// Training dimensionality; 0 before fit
    pub fn n_features(&self) -> usize {
        self.dim
    }

    /// Optimized weights, if fitted
    pub fn weights(&self) -> Option<&WeightVector> {
        self.weights.as_ref()
    }

    /// Majority training label used when every weight is zero
    pub fn fallback_label(&self) -> f64 {
        self.fallback_label
    }

    /// Energy of the selected solver sample from the last fit
    pub fn best_energy(&self) -> f64 {
        self.best_energy
    }

    /// The underlying ensemble
    pub fn ensemble(&self) -> &WeakClassifierEnsemble<L> {
        &self.ensemble
    }
}

impl<L: TrainableWeakClassifier + 'static> QboostClassifier<L> {
    /// Convert a fitted classifier into a QboostPlus ensemble member.
    ///
    /// Rejects untrained classifiers here so the member list can never
    /// contain one.
    pub fn into_member(self) -> Result<Box<dyn WeakClassifier>> {
        if !self.is_fitted() {
            return Err(QboostError::NotFitted);
        }
        Ok(Box::new(FittedMember(self)))
    }
}

/// Wrapper granting a fitted Qboost classifier the one-method predictor
/// capability
struct FittedMember<L: TrainableWeakClassifier>(QboostClassifier<L>);

impl<L: TrainableWeakClassifier> WeakClassifier for FittedMember<L> {
    fn decision(&self, features: &[f64]) -> f64 {
        // Fitted by construction (into_member gate); predict cannot fail
        self.0.predict(features).unwrap_or(1.0)
    }

    fn name(&self) -> &str {
        "qboost"
    }
}

/// Second-layer QBoost over pre-trained heterogeneous classifiers
///
/// Members are opaque predictors; fit never trains them, it only
/// optimizes binary weights over their existing votes using the same
/// QUBO construction and optimizer contract as [`QboostClassifier`].
pub struct QboostPlusClassifier {
    members: Vec<Box<dyn WeakClassifier>>,
    lambda: f64,
    weights: Option<WeightVector>,
    fallback_label: f64,
    best_energy: f64,
}

impl QboostPlusClassifier {
    /// Create an untrained second-layer classifier over trained members
    pub fn new(members: Vec<Box<dyn WeakClassifier>>, lambda: f64) -> Result<Self> {
        validate_lambda(lambda)?;
        if members.is_empty() {
            return Err(QboostError::EmptyEnsemble);
        }
        Ok(Self {
            members,
            lambda,
            weights: None,
            fallback_label: 1.0,
            best_energy: f64::NAN,
        })
    }

    /// Optimize member weights over the given dataset
    pub fn fit(
        &mut self,
        samples: &[Sample],
        optimizer: &dyn BinaryOptimizer,
        params: &SampleParams,
    ) -> Result<()> {
        if samples.is_empty() {
            return Err(QboostError::EmptyDataset);
        }
        let labels: Vec<f64> = samples.iter().map(|s| s.label).collect();

        let matrix = collect_votes(self.members.iter().map(|m| m.as_ref()), samples)?;
        let (weights, energy) =
            optimize_weights(&matrix, &labels, self.lambda, optimizer, params)?;

        info!(
            "qboost-plus fit: {}/{} members selected, energy {energy:.6}",
            weights.n_selected(),
            weights.len()
        );

        self.fallback_label = majority_label(&labels);
        self.best_energy = energy;
        self.weights = Some(weights);
        Ok(())
    }

    /// Weighted vote sum of the members before thresholding
    pub fn decision_function(&self, features: &[f64]) -> Result<f64> {
        let weights = self.weights.as_ref().ok_or(QboostError::NotFitted)?;
        Ok(self
            .members
            .iter()
            .enumerate()
            .map(|(i, m)| weights.weight(i) * m.vote(features))
            .sum())
    }

    /// Predict the bipolar label; same conventions as
    /// [`QboostClassifier::predict`]
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        let weights = self.weights.as_ref().ok_or(QboostError::NotFitted)?;
        if weights.is_all_zero() {
            return Ok(self.fallback_label);
        }
        Ok(threshold_margin(self.decision_function(features)?))
    }

    /// Predict labels for a batch of samples
    pub fn predict_batch(&self, samples: &[Sample]) -> Result<Vec<f64>> {
        samples.iter().map(|s| self.predict(&s.features)).collect()
    }

    /// Whether fit has completed
    pub fn is_fitted(&self) -> bool {
        self.weights.is_some()
    }

    /// Number of members
    pub fn n_members(&self) -> usize {
        self.members.len()
    }

    /// Sparsity penalty strength
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Optimized weights, if fitted
    pub fn weights(&self) -> Option<&WeightVector> {
        self.weights.as_ref()
    }

    /// Majority training label used when every weight is zero
    pub fn fallback_label(&self) -> f64 {
        self.fallback_label
    }

    /// Energy of the selected solver sample from the last fit
    pub fn best_energy(&self) -> f64 {
        self.best_energy
    }
}

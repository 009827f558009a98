//! Core traits for QBoost

use crate::core::error::Result;
use crate::core::types::{Qubo, Sample, SampleParams, SampleSet};

/// Dataset abstraction for efficient data access
pub trait Dataset: Send + Sync {
    /// Number of samples in the dataset
    fn len(&self) -> usize;

    /// Number of features (dimensionality)
    fn dim(&self) -> usize;

    /// Get a single sample by index
    ///
    /// # Panics
    /// Panics if index >= len()
    fn get_sample(&self, i: usize) -> Sample;

    /// Get all labels as a vector
    fn get_labels(&self) -> Vec<f64>;

    /// Check if the dataset is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Predictor capability shared by weak and strong ensemble members
///
/// Exactly one method is required: a raw decision score. Nothing else is
/// asked of a member at the ensemble layer, which is what lets QboostPlus
/// mix stumps, tree ensembles, and Qboost models behind one trait object.
pub trait WeakClassifier: Send + Sync {
    /// Raw decision score; the sign carries the class
    fn decision(&self, features: &[f64]) -> f64;

    /// Bipolar vote derived from the decision score.
    ///
    /// A score of exactly 0 maps to +1. Downstream math requires strictly
    /// bipolar values, so the zero case is pinned down here rather than
    /// left to implementations.
    fn vote(&self, features: &[f64]) -> f64 {
        if self.decision(features) >= 0.0 {
            1.0
        } else {
            -1.0
        }
    }

    /// Optional human readable name for the member
    fn name(&self) -> &str {
        "classifier"
    }
}

/// A weak classifier that can be trained by the ensemble
pub trait TrainableWeakClassifier: WeakClassifier {
    /// Fit the learner on the full training set
    fn fit(&mut self, samples: &[Sample]) -> Result<()>;

    /// Whether the learner has been fitted
    fn is_fitted(&self) -> bool;
}

/// External binary quadratic optimizer contract
///
/// Implementations may be exact, heuristic, or remote annealing services.
/// A call must respect `params.timeout` and surface failures as errors
/// rather than returning a partial weighting.
pub trait BinaryOptimizer: Send + Sync {
    /// Sample low-energy bit assignments for the QUBO
    fn sample(&self, qubo: &Qubo, params: &SampleParams) -> Result<SampleSet>;

    /// Optional human readable name for the backend
    fn name(&self) -> &str {
        "optimizer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstantScore(f64);

    impl WeakClassifier for ConstantScore {
        fn decision(&self, _features: &[f64]) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_vote_sign_thresholding() {
        assert_eq!(ConstantScore(2.5).vote(&[]), 1.0);
        assert_eq!(ConstantScore(-0.1).vote(&[]), -1.0);
    }

    #[test]
    fn test_vote_zero_score_maps_to_positive() {
        assert_eq!(ConstantScore(0.0).vote(&[]), 1.0);
    }
}

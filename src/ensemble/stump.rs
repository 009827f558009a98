//! Decision stump weak learner
//!
//! A depth-1 decision tree over a single feature. Stumps are the shipped
//! default weak learner: each one is assigned a feature index at
//! construction time, so an ensemble of stumps gets its diversity from
//! construction parameters rather than from resampling.

use crate::core::{QboostError, Result, Sample, TrainableWeakClassifier, WeakClassifier};

/// Single-feature threshold classifier
///
/// The decision score is `polarity * (x[feature] - threshold)`, so the
/// bipolar vote is +1 on the polarity side of the threshold (a score of
/// exactly 0 votes +1, as everywhere in this crate).
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionStump {
    feature: usize,
    threshold: f64,
    polarity: f64,
    fitted: bool,
}

impl DecisionStump {
    /// Create an untrained stump assigned to a feature index.
    ///
    /// The index wraps modulo the dataset dimensionality at fit time, so
    /// ensembles larger than the feature count are still valid.
    pub fn for_feature(feature: usize) -> Self {
        Self {
            feature,
            threshold: 0.0,
            polarity: 1.0,
            fitted: false,
        }
    }

    /// Reconstruct a fitted stump from stored parameters
    pub fn from_parts(feature: usize, threshold: f64, polarity: f64) -> Self {
        Self {
            feature,
            threshold,
            polarity,
            fitted: true,
        }
    }

    /// Feature index the stump splits on
    pub fn feature(&self) -> usize {
        self.feature
    }

    /// Split threshold
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Polarity of the split (+1.0 or -1.0)
    pub fn polarity(&self) -> f64 {
        self.polarity
    }

    fn vote_at(value: f64, threshold: f64, polarity: f64) -> f64 {
        if polarity * (value - threshold) >= 0.0 {
            1.0
        } else {
            -1.0
        }
    }

    /// Candidate thresholds: one below the minimum plus the midpoints
    /// between distinct consecutive sorted values.
    fn candidate_thresholds(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted.dedup();

        let mut candidates = Vec::with_capacity(sorted.len() + 1);
        candidates.push(sorted[0] - 1.0);
        for pair in sorted.windows(2) {
            candidates.push((pair[0] + pair[1]) / 2.0);
        }
        candidates
    }
}

impl WeakClassifier for DecisionStump {
    /// # Panics
    /// Panics if `features` is shorter than the assigned feature index
    fn decision(&self, features: &[f64]) -> f64 {
        self.polarity * (features[self.feature] - self.threshold)
    }

    fn name(&self) -> &str {
        "decision-stump"
    }
}

impl TrainableWeakClassifier for DecisionStump {
    /// Exhaustive threshold search minimizing training error on the
    /// assigned feature. Ties keep the first candidate encountered, so
    /// training is deterministic.
    fn fit(&mut self, samples: &[Sample]) -> Result<()> {
        if samples.is_empty() {
            return Err(QboostError::EmptyDataset);
        }
        let dim = samples[0].features.len();
        if dim == 0 {
            return Err(QboostError::InvalidDataset(
                "samples have no features".to_string(),
            ));
        }
        for sample in samples {
            if sample.features.len() != dim {
                return Err(QboostError::DimensionMismatch {
                    expected: dim,
                    actual: sample.features.len(),
                });
            }
        }

        self.feature %= dim;
        let values: Vec<f64> = samples.iter().map(|s| s.features[self.feature]).collect();

        let mut best_errors = usize::MAX;
        let mut best_threshold = 0.0;
        let mut best_polarity = 1.0;

        for threshold in Self::candidate_thresholds(&values) {
            for polarity in [1.0, -1.0] {
                let errors = samples
                    .iter()
                    .zip(values.iter())
                    .filter(|(sample, &value)| {
                        Self::vote_at(value, threshold, polarity) != sample.label
                    })
                    .count();
                if errors < best_errors {
                    best_errors = errors;
                    best_threshold = threshold;
                    best_polarity = polarity;
                }
            }
        }

        self.threshold = best_threshold;
        self.polarity = best_polarity;
        self.fitted = true;
        Ok(())
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable_samples() -> Vec<Sample> {
        vec![
            Sample::new(vec![2.0, 0.5], 1.0),
            Sample::new(vec![1.5, -0.3], 1.0),
            Sample::new(vec![-2.0, 0.4], -1.0),
            Sample::new(vec![-1.5, -0.6], -1.0),
        ]
    }

    #[test]
    fn test_stump_fits_separable_feature() {
        let mut stump = DecisionStump::for_feature(0);
        assert!(!stump.is_fitted());

        stump.fit(&separable_samples()).unwrap();
        assert!(stump.is_fitted());

        for sample in separable_samples() {
            assert_eq!(stump.vote(&sample.features), sample.label);
        }
    }

    #[test]
    fn test_stump_learns_inverted_polarity() {
        // Positive class sits below the threshold on feature 0
        let samples = vec![
            Sample::new(vec![-2.0], 1.0),
            Sample::new(vec![-1.5], 1.0),
            Sample::new(vec![1.5], -1.0),
            Sample::new(vec![2.0], -1.0),
        ];
        let mut stump = DecisionStump::for_feature(0);
        stump.fit(&samples).unwrap();

        assert_eq!(stump.polarity(), -1.0);
        for sample in &samples {
            assert_eq!(stump.vote(&sample.features), sample.label);
        }
    }

    #[test]
    fn test_feature_index_wraps_modulo_dim() {
        let mut stump = DecisionStump::for_feature(5);
        stump.fit(&separable_samples()).unwrap();
        assert_eq!(stump.feature(), 1);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let samples = separable_samples();
        let mut a = DecisionStump::for_feature(0);
        let mut b = DecisionStump::for_feature(0);
        a.fit(&samples).unwrap();
        b.fit(&samples).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fit_rejects_empty_and_mismatched_input() {
        let mut stump = DecisionStump::for_feature(0);
        assert!(matches!(stump.fit(&[]), Err(QboostError::EmptyDataset)));

        let ragged = vec![
            Sample::new(vec![1.0, 2.0], 1.0),
            Sample::new(vec![1.0], -1.0),
        ];
        assert!(matches!(
            stump.fit(&ragged),
            Err(QboostError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_vote_on_threshold_is_positive() {
        let stump = DecisionStump::from_parts(0, 1.0, 1.0);
        // Exactly on the threshold: score 0 maps to +1
        assert_eq!(stump.vote(&[1.0]), 1.0);
    }

    #[test]
    fn test_from_parts_roundtrip() {
        let stump = DecisionStump::from_parts(3, 0.25, -1.0);
        assert!(stump.is_fitted());
        assert_eq!(stump.feature(), 3);
        assert_eq!(stump.threshold(), 0.25);
        assert_eq!(stump.polarity(), -1.0);
    }
}

//! Weak classifier ensembles
//!
//! An ensemble owns an ordered sequence of independently trained weak
//! learners and produces the per-learner vote matrix the QUBO builder
//! consumes. Order matters only for the index correspondence between the
//! weight vector and the learner list.

pub mod stump;

pub use self::stump::DecisionStump;

use log::debug;

use crate::core::{
    PredictionMatrix, QboostError, Result, Sample, TrainableWeakClassifier, WeakClassifier,
};

/// Ordered ensemble of homogeneous trainable weak learners
///
/// Each learner trains on the full training set; there is no per-learner
/// bootstrap resampling. Diversity comes from the learners' construction
/// parameters (for stumps, the assigned feature index).
pub struct WeakClassifierEnsemble<L: TrainableWeakClassifier = DecisionStump> {
    learners: Vec<L>,
    fitted: bool,
}

impl WeakClassifierEnsemble<DecisionStump> {
    /// Build an ensemble of `n` decision stumps, one per feature index
    /// (wrapping modulo the dataset dimensionality at fit time)
    pub fn of_stumps(n: usize) -> Result<Self> {
        Self::new((0..n).map(DecisionStump::for_feature).collect())
    }
}

impl<L: TrainableWeakClassifier> WeakClassifierEnsemble<L> {
    /// Create an ensemble from untrained learners
    pub fn new(learners: Vec<L>) -> Result<Self> {
        if learners.is_empty() {
            return Err(QboostError::EmptyEnsemble);
        }
        Ok(Self {
            learners,
            fitted: false,
        })
    }

    /// Create an ensemble from already-fitted learners (model loading)
    pub fn from_fitted(learners: Vec<L>) -> Result<Self> {
        if learners.is_empty() {
            return Err(QboostError::EmptyEnsemble);
        }
        if learners.iter().any(|l| !l.is_fitted()) {
            return Err(QboostError::NotFitted);
        }
        Ok(Self {
            learners,
            fitted: true,
        })
    }

    /// Number of learners
    pub fn len(&self) -> usize {
        self.learners.len()
    }

    /// Always false; construction rejects empty ensembles
    pub fn is_empty(&self) -> bool {
        self.learners.is_empty()
    }

    /// Whether every learner has been trained
    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// The ordered learner list
    pub fn learners(&self) -> &[L] {
        &self.learners
    }

    /// Train every learner on the full training set.
    ///
    /// Learners are independent; training order does not affect the
    /// resulting votes beyond the fixed index correspondence.
    pub fn fit(&mut self, samples: &[Sample]) -> Result<()> {
        if samples.is_empty() {
            return Err(QboostError::EmptyDataset);
        }
        for learner in &mut self.learners {
            learner.fit(samples)?;
        }
        self.fitted = true;
        debug!(
            "trained {} weak learners on {} samples",
            self.learners.len(),
            samples.len()
        );
        Ok(())
    }

    /// Evaluate every learner on every sample, producing the ±1 vote
    /// matrix (N learners × M samples)
    pub fn prediction_matrix(&self, samples: &[Sample]) -> Result<PredictionMatrix> {
        if !self.fitted {
            return Err(QboostError::NotFitted);
        }
        collect_votes(self.learners.iter().map(|l| l as &dyn WeakClassifier), samples)
    }

    /// Bipolar votes of all learners on a single feature vector, in
    /// ensemble order
    pub fn votes(&self, features: &[f64]) -> Vec<f64> {
        self.learners.iter().map(|l| l.vote(features)).collect()
    }
}

/// Collect the bipolar vote matrix of arbitrary members over a dataset.
///
/// Shared between the homogeneous ensemble and QboostPlus's heterogeneous
/// member lists, so both classifiers feed the QUBO builder through the
/// same path.
pub fn collect_votes<'a, I>(members: I, samples: &[Sample]) -> Result<PredictionMatrix>
where
    I: Iterator<Item = &'a dyn WeakClassifier>,
{
    if samples.is_empty() {
        return Err(QboostError::EmptyDataset);
    }
    let rows: Vec<Vec<i8>> = members
        .map(|member| {
            samples
                .iter()
                .map(|s| if member.vote(&s.features) >= 0.0 { 1 } else { -1 })
                .collect()
        })
        .collect();
    PredictionMatrix::from_rows(rows)
}

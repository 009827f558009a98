//! Core type definitions for QBoost

use std::time::Duration;

use crate::core::error::{QboostError, Result};

/// Prediction result containing label and ensemble vote margin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class label (+1 or -1)
    pub label: f64,
    /// Raw weighted vote sum before thresholding
    pub margin: f64,
}

impl Prediction {
    /// Create a new prediction
    pub fn new(label: f64, margin: f64) -> Self {
        Self { label, margin }
    }

    /// Get confidence as absolute value of the vote margin
    pub fn confidence(&self) -> f64 {
        self.margin.abs()
    }
}

/// Training sample with dense features and a bipolar label
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// Dense feature vector
    pub features: Vec<f64>,
    /// Class label (+1 or -1 for binary classification)
    pub label: f64,
}

impl Sample {
    /// Create a new sample
    pub fn new(features: Vec<f64>, label: f64) -> Self {
        Self { features, label }
    }

    /// Number of features
    pub fn dim(&self) -> usize {
        self.features.len()
    }
}

/// Check that a label is bipolar (-1 or +1)
pub fn validate_bipolar_label(label: f64) -> Result<()> {
    if label != 1.0 && label != -1.0 {
        return Err(QboostError::InvalidLabel(label));
    }
    Ok(())
}

/// Matrix of per-learner, per-sample votes with entries in {-1, +1}
///
/// Row n holds the votes of learner n over all samples. This is derived
/// data: it is recomputed whenever an ensemble is evaluated on a dataset
/// and is never stored on a classifier.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionMatrix {
    data: Vec<i8>,
    learners: usize,
    samples: usize,
}

impl PredictionMatrix {
    /// Build a prediction matrix from per-learner vote rows.
    ///
    /// Every row must have the same length and every entry must be -1 or +1.
    pub fn from_rows(rows: Vec<Vec<i8>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(QboostError::EmptyEnsemble);
        }
        let samples = rows[0].len();
        if samples == 0 {
            return Err(QboostError::EmptyDataset);
        }

        let mut data = Vec::with_capacity(rows.len() * samples);
        for row in &rows {
            if row.len() != samples {
                return Err(QboostError::DimensionMismatch {
                    expected: samples,
                    actual: row.len(),
                });
            }
            for &vote in row {
                if vote != 1 && vote != -1 {
                    return Err(QboostError::InvalidLabel(vote as f64));
                }
                data.push(vote);
            }
        }

        Ok(Self {
            data,
            learners: rows.len(),
            samples,
        })
    }

    /// Number of learners (rows)
    pub fn n_learners(&self) -> usize {
        self.learners
    }

    /// Number of samples (columns)
    pub fn n_samples(&self) -> usize {
        self.samples
    }

    /// Vote of learner `n` on sample `s` as a float (-1.0 or +1.0)
    ///
    /// # Panics
    /// Panics if `n >= n_learners()` or `s >= n_samples()`
    pub fn vote(&self, n: usize, s: usize) -> f64 {
        assert!(n < self.learners && s < self.samples, "index out of bounds");
        self.data[n * self.samples + s] as f64
    }

    /// All votes of learner `n`
    pub fn row(&self, n: usize) -> &[i8] {
        let start = n * self.samples;
        &self.data[start..start + self.samples]
    }
}

/// Symmetric QUBO coefficient matrix with the linear term folded onto the
/// diagonal
///
/// Minimizing `w^T Q w` over binary `w` minimizes the encoded objective.
/// Built fresh per fit call and consumed immediately by the optimizer.
#[derive(Clone, Debug, PartialEq)]
pub struct Qubo {
    coefficients: Vec<f64>,
    size: usize,
}

impl Qubo {
    /// Create a zero matrix over `size` binary variables
    pub fn zeros(size: usize) -> Self {
        Self {
            coefficients: vec![0.0; size * size],
            size,
        }
    }

    /// Number of binary variables
    pub fn num_variables(&self) -> usize {
        self.size
    }

    /// Coefficient Q[i][j]
    ///
    /// # Panics
    /// Panics if `i >= num_variables()` or `j >= num_variables()`
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.size && j < self.size, "index out of bounds");
        self.coefficients[i * self.size + j]
    }

    /// Add `value` to Q[i][j]
    pub fn add(&mut self, i: usize, j: usize, value: f64) {
        assert!(i < self.size && j < self.size, "index out of bounds");
        self.coefficients[i * self.size + j] += value;
    }

    /// Evaluate `w^T Q w` for a binary assignment
    ///
    /// # Panics
    /// Panics if `bits.len() != num_variables()`
    pub fn evaluate(&self, bits: &[u8]) -> f64 {
        assert_eq!(bits.len(), self.size, "assignment length mismatch");
        let mut energy = 0.0;
        for i in 0..self.size {
            if bits[i] == 0 {
                continue;
            }
            for j in 0..self.size {
                if bits[j] != 0 {
                    energy += self.coefficients[i * self.size + j];
                }
            }
        }
        energy
    }

    /// Energy change from flipping bit `i` in `bits`, exploiting symmetry
    ///
    /// Equals `evaluate(flipped) - evaluate(bits)` without rescanning the
    /// full matrix.
    pub fn flip_delta(&self, bits: &[u8], i: usize) -> f64 {
        assert_eq!(bits.len(), self.size, "assignment length mismatch");
        assert!(i < self.size, "index out of bounds");
        let sign = 1.0 - 2.0 * bits[i] as f64;
        let mut coupling = 0.0;
        for (j, &bit) in bits.iter().enumerate() {
            if j != i && bit != 0 {
                coupling += self.coefficients[i * self.size + j];
            }
        }
        sign * (self.get(i, i) + 2.0 * coupling)
    }
}

/// Binary weight vector produced by the optimizer
///
/// Index n corresponds to learner n in the ensemble order. Written once
/// per fit call and read at inference time.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector {
    bits: Vec<u8>,
}

impl WeightVector {
    /// Create a weight vector from optimizer bits
    pub fn new(bits: Vec<u8>) -> Self {
        Self { bits }
    }

    /// Number of weights
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check if there are no weights at all
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of selected learners (weight = 1)
    pub fn n_selected(&self) -> usize {
        self.bits.iter().filter(|&&b| b != 0).count()
    }

    /// True when the optimizer dropped every learner
    pub fn is_all_zero(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }

    /// Weight of learner `n` as a float (0.0 or 1.0)
    pub fn weight(&self, n: usize) -> f64 {
        self.bits[n] as f64
    }

    /// Raw bits
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }
}

/// One solution returned by a binary optimizer
#[derive(Debug, Clone, PartialEq)]
pub struct SolverSample {
    /// Bit assignment over the QUBO variables
    pub bits: Vec<u8>,
    /// Objective value `w^T Q w` of the assignment
    pub energy: f64,
}

impl SolverSample {
    /// Create a new solver sample
    pub fn new(bits: Vec<u8>, energy: f64) -> Self {
        Self { bits, energy }
    }
}

/// Ordered collection of solver samples
///
/// Stochastic backends may return duplicate or inconsistent samples; the
/// consumer selects the lowest-energy one, breaking ties toward the
/// earliest entry in response order.
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    samples: Vec<SolverSample>,
}

impl SampleSet {
    /// Create an empty sample set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample, preserving response order
    pub fn push(&mut self, sample: SolverSample) {
        self.samples.push(sample);
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the response is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Lowest-energy sample; ties break to the first occurrence.
    ///
    /// Samples with a non-finite energy are ignored: a NaN would win
    /// every `>=` comparison, so a backend reporting one must not be
    /// allowed to supply the weight vector.
    pub fn best(&self) -> Option<&SolverSample> {
        let mut best: Option<&SolverSample> = None;
        for sample in self.samples.iter().filter(|s| s.energy.is_finite()) {
            match best {
                Some(b) if sample.energy >= b.energy => {}
                _ => best = Some(sample),
            }
        }
        best
    }

    /// Iterate samples in response order
    pub fn iter(&self) -> impl Iterator<Item = &SolverSample> {
        self.samples.iter()
    }
}

/// Parameters for a binary optimizer call
#[derive(Debug, Clone)]
pub struct SampleParams {
    /// Number of independent reads (restarts) for stochastic backends
    pub num_reads: usize,
    /// Wall-clock bound for the whole call
    pub timeout: Option<Duration>,
    /// RNG seed for reproducible stochastic sampling
    pub seed: Option<u64>,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self {
            num_reads: 1,
            timeout: None,
            seed: None,
        }
    }
}

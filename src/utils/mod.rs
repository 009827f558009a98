//! Utility functions for QBoost operations

/// Feature scaling utilities
pub mod scaling {
    use serde::{Deserialize, Serialize};

    use crate::core::{QboostError, Result, Sample};

    /// Feature scaling methods
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub enum ScalingMethod {
        /// Min-Max scaling to [min_val, max_val] range
        MinMax { min_val: f64, max_val: f64 },
        /// Standard (Z-score) normalization: (x - mean) / std
        StandardScore,
        /// Unit scaling: x / max(|x|)
        UnitScale,
    }

    impl Default for ScalingMethod {
        fn default() -> Self {
            Self::MinMax {
                min_val: -1.0,
                max_val: 1.0,
            }
        }
    }

    /// Statistics for a single feature column
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct FeatureStats {
        pub min: f64,
        pub max: f64,
        pub mean: f64,
        pub std: f64,
    }

    /// Fitted scaling parameters, one stats entry per feature column
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ScalingParams {
        pub method: ScalingMethod,
        pub feature_stats: Vec<FeatureStats>,
    }

    impl ScalingParams {
        /// Compute scaling parameters from training data
        pub fn fit(samples: &[Sample], method: ScalingMethod) -> Result<Self> {
            if samples.is_empty() {
                return Err(QboostError::EmptyDataset);
            }
            let dim = samples[0].features.len();

            let mut feature_stats = Vec::with_capacity(dim);
            for col in 0..dim {
                let values: Vec<f64> = samples
                    .iter()
                    .map(|s| {
                        if s.features.len() != dim {
                            return f64::NAN;
                        }
                        s.features[col]
                    })
                    .collect();
                if values.iter().any(|v| v.is_nan()) {
                    return Err(QboostError::DimensionMismatch {
                        expected: dim,
                        actual: samples
                            .iter()
                            .map(|s| s.features.len())
                            .find(|&l| l != dim)
                            .unwrap_or(dim),
                    });
                }

                let min = values.iter().fold(f64::INFINITY, |a, &b| a.min(b));
                let max = values.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                let variance = if values.len() > 1 {
                    values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>()
                        / (values.len() - 1) as f64
                } else {
                    0.0
                };

                feature_stats.push(FeatureStats {
                    min,
                    max,
                    mean,
                    std: variance.sqrt(),
                });
            }

            Ok(Self {
                method,
                feature_stats,
            })
        }

        /// Apply the fitted scaling to a single sample
        pub fn transform_sample(&self, sample: &Sample) -> Sample {
            let features = sample
                .features
                .iter()
                .zip(self.feature_stats.iter())
                .map(|(&value, stats)| self.scale_value(value, stats))
                .collect();
            Sample::new(features, sample.label)
        }

        /// Apply the fitted scaling to a batch of samples
        pub fn transform_samples(&self, samples: &[Sample]) -> Vec<Sample> {
            samples.iter().map(|s| self.transform_sample(s)).collect()
        }

        fn scale_value(&self, value: f64, stats: &FeatureStats) -> f64 {
            match self.method {
                ScalingMethod::MinMax { min_val, max_val } => {
                    let range = stats.max - stats.min;
                    if range == 0.0 {
                        (min_val + max_val) / 2.0
                    } else {
                        min_val + (value - stats.min) / range * (max_val - min_val)
                    }
                }
                ScalingMethod::StandardScore => {
                    if stats.std == 0.0 {
                        0.0
                    } else {
                        (value - stats.mean) / stats.std
                    }
                }
                ScalingMethod::UnitScale => {
                    let max_abs = stats.min.abs().max(stats.max.abs());
                    if max_abs == 0.0 {
                        0.0
                    } else {
                        value / max_abs
                    }
                }
            }
        }
    }

    /// Fit scaling on samples and transform them in one step
    pub fn fit_transform(
        samples: &[Sample],
        method: ScalingMethod,
    ) -> Result<(Vec<Sample>, ScalingParams)> {
        let params = ScalingParams::fit(samples, method)?;
        let transformed = params.transform_samples(samples);
        Ok((transformed, params))
    }
}

/// Dataset validation helpers
pub mod validation {
    use crate::core::{Dataset, QboostError, Result};

    /// Check that every label in the dataset is -1 or +1
    pub fn validate_bipolar_labels<D: Dataset>(dataset: &D) -> Result<()> {
        for label in dataset.get_labels() {
            if label != 1.0 && label != -1.0 {
                return Err(QboostError::InvalidLabel(label));
            }
        }
        Ok(())
    }

    /// Count positive and negative samples and their ratio
    pub fn check_label_balance<D: Dataset>(dataset: &D) -> (usize, usize, f64) {
        let labels = dataset.get_labels();
        let positives = labels.iter().filter(|&&y| y > 0.0).count();
        let negatives = labels.len() - positives;
        let ratio = if labels.is_empty() {
            0.0
        } else {
            positives as f64 / labels.len() as f64
        };
        (positives, negatives, ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::scaling::{fit_transform, ScalingMethod, ScalingParams};
    use super::validation;
    use crate::core::{Dataset, Sample};
    use approx::assert_relative_eq;

    struct VecDataset(Vec<Sample>);

    impl Dataset for VecDataset {
        fn len(&self) -> usize {
            self.0.len()
        }
        fn dim(&self) -> usize {
            self.0.first().map(|s| s.dim()).unwrap_or(0)
        }
        fn get_sample(&self, i: usize) -> Sample {
            self.0[i].clone()
        }
        fn get_labels(&self) -> Vec<f64> {
            self.0.iter().map(|s| s.label).collect()
        }
    }

    fn samples() -> Vec<Sample> {
        vec![
            Sample::new(vec![0.0, 10.0], 1.0),
            Sample::new(vec![5.0, 20.0], -1.0),
            Sample::new(vec![10.0, 30.0], 1.0),
        ]
    }

    #[test]
    fn test_minmax_scaling() {
        let (scaled, _) = fit_transform(
            &samples(),
            ScalingMethod::MinMax {
                min_val: -1.0,
                max_val: 1.0,
            },
        )
        .unwrap();

        assert_relative_eq!(scaled[0].features[0], -1.0);
        assert_relative_eq!(scaled[1].features[0], 0.0);
        assert_relative_eq!(scaled[2].features[0], 1.0);
        // Labels pass through untouched
        assert_eq!(scaled[1].label, -1.0);
    }

    #[test]
    fn test_standard_score_scaling() {
        let (scaled, params) = fit_transform(&samples(), ScalingMethod::StandardScore).unwrap();
        assert_relative_eq!(scaled[1].features[0], 0.0);
        assert_eq!(params.feature_stats.len(), 2);
        assert_relative_eq!(params.feature_stats[0].mean, 5.0);
    }

    #[test]
    fn test_unit_scaling() {
        let (scaled, _) = fit_transform(&samples(), ScalingMethod::UnitScale).unwrap();
        assert_relative_eq!(scaled[2].features[0], 1.0);
        assert_relative_eq!(scaled[2].features[1], 1.0);
    }

    #[test]
    fn test_constant_feature_handled() {
        let constant = vec![
            Sample::new(vec![3.0], 1.0),
            Sample::new(vec![3.0], -1.0),
        ];
        let (scaled, _) = fit_transform(
            &constant,
            ScalingMethod::MinMax {
                min_val: -1.0,
                max_val: 1.0,
            },
        )
        .unwrap();
        // Zero range collapses to the range midpoint
        assert_relative_eq!(scaled[0].features[0], 0.0);
    }

    #[test]
    fn test_transform_applies_training_stats() {
        let params = ScalingParams::fit(&samples(), ScalingMethod::StandardScore).unwrap();
        let unseen = Sample::new(vec![5.0, 20.0], 1.0);
        let transformed = params.transform_sample(&unseen);
        assert_relative_eq!(transformed.features[0], 0.0);
    }

    #[test]
    fn test_label_validation() {
        let good = VecDataset(samples());
        assert!(validation::validate_bipolar_labels(&good).is_ok());

        let bad = VecDataset(vec![Sample::new(vec![1.0], 0.5)]);
        assert!(validation::validate_bipolar_labels(&bad).is_err());
    }

    #[test]
    fn test_label_balance() {
        let dataset = VecDataset(samples());
        let (pos, neg, ratio) = validation::check_label_balance(&dataset);
        assert_eq!(pos, 2);
        assert_eq!(neg, 1);
        assert_relative_eq!(ratio, 2.0 / 3.0);
    }
}

//! QUBO construction from ensemble votes
//!
//! Encodes the QBoost weight-selection objective
//!
//! ```text
//! sum_s ((1/N) * sum_n w_n * C[n,s] - y_s)^2 + lambda * sum_n w_n
//! ```
//!
//! over binary weights `w` into a symmetric coefficient matrix `Q` such
//! that `w^T Q w` reproduces the objective up to the constant
//! `sum_s y_s^2`, which is independent of `w` and dropped.

use crate::core::{PredictionMatrix, QboostError, Qubo, Result};

/// Builder for the QBoost weight-selection QUBO
///
/// A pure function of its inputs: identical votes, labels, and lambda
/// always produce a bit-identical matrix.
pub struct QuboBuilder;

impl QuboBuilder {
    /// Build the QUBO for the given votes, labels, and sparsity penalty.
    ///
    /// Expanding the squared error, the cross term between learners n and
    /// k contributes `(1/N^2) * sum_s C[n,s]*C[k,s]` to both `Q[n,k]` and
    /// `Q[k,n]`. Because `w_n^2 = w_n` for binary weights, the linear
    /// part `-(2/N) * sum_s C[n,s]*y_s + lambda` folds onto the diagonal,
    /// alongside the quadratic self term `(1/N^2) * sum_s C[n,s]^2`.
    pub fn build(predictions: &PredictionMatrix, labels: &[f64], lambda: f64) -> Result<Qubo> {
        let n = predictions.n_learners();
        let m = predictions.n_samples();

        if n == 0 {
            return Err(QboostError::EmptyEnsemble);
        }
        if labels.len() != m {
            return Err(QboostError::DimensionMismatch {
                expected: m,
                actual: labels.len(),
            });
        }
        if !lambda.is_finite() || lambda < 0.0 {
            return Err(QboostError::InvalidParameter(format!(
                "lambda must be finite and non-negative, got {lambda}"
            )));
        }
        for &label in labels {
            if label != 1.0 && label != -1.0 {
                return Err(QboostError::InvalidLabel(label));
            }
        }

        let inv_n = 1.0 / n as f64;
        let inv_n_sq = inv_n * inv_n;

        let mut qubo = Qubo::zeros(n);

        for i in 0..n {
            // Self correlation: C[i,s]^2 == 1, so this is just M / N^2
            qubo.add(i, i, m as f64 * inv_n_sq);

            let mut label_correlation = 0.0;
            for (s, &y) in labels.iter().enumerate() {
                label_correlation += predictions.vote(i, s) * y;
            }
            qubo.add(i, i, -2.0 * inv_n * label_correlation + lambda);

            for j in (i + 1)..n {
                let mut cross = 0.0;
                for s in 0..m {
                    cross += predictions.vote(i, s) * predictions.vote(j, s);
                }
                let coefficient = inv_n_sq * cross;
                qubo.add(i, j, coefficient);
                qubo.add(j, i, coefficient);
            }
        }

        Ok(qubo)
    }

    /// Direct evaluation of the encoded objective for a binary assignment,
    /// including the constant term dropped from the matrix.
    ///
    /// Used to cross-check the matrix encoding; the minimizer of this
    /// function and of `Qubo::evaluate` coincide.
    pub fn objective(
        predictions: &PredictionMatrix,
        labels: &[f64],
        lambda: f64,
        bits: &[u8],
    ) -> f64 {
        let n = predictions.n_learners() as f64;
        let mut total = 0.0;
        for (s, &y) in labels.iter().enumerate() {
            let mut vote_sum = 0.0;
            for (i, &bit) in bits.iter().enumerate() {
                vote_sum += bit as f64 * predictions.vote(i, s);
            }
            let residual = vote_sum / n - y;
            total += residual * residual;
        }
        total + lambda * bits.iter().map(|&b| b as f64).sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fixture() -> (PredictionMatrix, Vec<f64>) {
        let matrix = PredictionMatrix::from_rows(vec![
            vec![1, 1, -1, -1],
            vec![1, -1, -1, 1],
            vec![-1, 1, 1, -1],
        ])
        .unwrap();
        let labels = vec![1.0, 1.0, -1.0, -1.0];
        (matrix, labels)
    }

    #[test]
    fn test_builder_is_pure() {
        let (matrix, labels) = fixture();
        let a = QuboBuilder::build(&matrix, &labels, 0.25).unwrap();
        let b = QuboBuilder::build(&matrix, &labels, 0.25).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_matrix_reproduces_objective_minus_constant() {
        let (matrix, labels) = fixture();
        let lambda = 0.1;
        let qubo = QuboBuilder::build(&matrix, &labels, lambda).unwrap();

        let constant: f64 = labels.iter().map(|y| y * y).sum();

        // Every assignment over 3 variables; more than enough random w
        for assignment in 0u32..8 {
            let bits: Vec<u8> = (0..3).map(|i| ((assignment >> i) & 1) as u8).collect();
            let encoded = qubo.evaluate(&bits);
            let direct = QuboBuilder::objective(&matrix, &labels, lambda, &bits);
            assert_relative_eq!(encoded + constant, direct, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_diagonal_terms() {
        let (matrix, labels) = fixture();
        let lambda = 0.5;
        let qubo = QuboBuilder::build(&matrix, &labels, lambda).unwrap();

        // Learner 0 agrees with every label: sum_s C*y = 4
        let n = 3.0;
        let expected = 4.0 / (n * n) - (2.0 / n) * 4.0 + lambda;
        assert_relative_eq!(qubo.get(0, 0), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_symmetry() {
        let (matrix, labels) = fixture();
        let qubo = QuboBuilder::build(&matrix, &labels, 0.0).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(qubo.get(i, j), qubo.get(j, i));
            }
        }
    }

    #[test]
    fn test_zero_lambda_is_valid() {
        let (matrix, labels) = fixture();
        let qubo = QuboBuilder::build(&matrix, &labels, 0.0).unwrap();
        assert_eq!(qubo.num_variables(), 3);
    }

    #[test]
    fn test_rejects_negative_lambda() {
        let (matrix, labels) = fixture();
        assert!(matches!(
            QuboBuilder::build(&matrix, &labels, -0.1),
            Err(QboostError::InvalidParameter(_))
        ));
        assert!(matches!(
            QuboBuilder::build(&matrix, &labels, f64::NAN),
            Err(QboostError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_rejects_label_count_mismatch() {
        let (matrix, _) = fixture();
        let short = vec![1.0, -1.0];
        assert!(matches!(
            QuboBuilder::build(&matrix, &short, 0.0),
            Err(QboostError::DimensionMismatch {
                expected: 4,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_rejects_non_bipolar_labels() {
        let (matrix, _) = fixture();
        let labels = vec![1.0, 0.0, -1.0, 1.0];
        assert!(matches!(
            QuboBuilder::build(&matrix, &labels, 0.0),
            Err(QboostError::InvalidLabel(_))
        ));
    }
}

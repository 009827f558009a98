//! Error types for QBoost

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QboostError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid label: expected -1 or +1, got {0}")]
    InvalidLabel(f64),

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("Ensemble contains no learners")]
    EmptyEnsemble,

    #[error("Model not fitted")]
    NotFitted,

    #[error("Optimization failed: {0}")]
    OptimizationFailed(String),

    #[error("Optimization timed out after {elapsed:?}")]
    OptimizationTimeout { elapsed: Duration },

    #[error("Optimizer returned no samples")]
    EmptyResponse,

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, QboostError>;

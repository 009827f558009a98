//! Rust implementation of the QBoost ensemble method
//!
//! QBoost selects a sparse subset of weak classifiers by phrasing the
//! selection as a quadratic unconstrained binary optimization (QUBO)
//! problem, after "Training a Binary Classifier with the Quantum
//! Adiabatic Algorithm" by Neven et al.

pub mod api;
pub mod classifier;
pub mod core;
pub mod data;
pub mod ensemble;
pub mod optimizer;
pub mod persistence;
pub mod qubo;
pub mod utils;

// Re-export main types for convenience
pub use crate::api::{EvaluationMetrics, ModelInfo, Qboost, TrainedModel};
pub use crate::classifier::{QboostClassifier, QboostPlusClassifier};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::data::{CsvDataset, LibsvmDataset};
pub use crate::ensemble::{DecisionStump, WeakClassifierEnsemble};
pub use crate::optimizer::{ExactSolver, SimulatedAnnealer};
pub use crate::qubo::QuboBuilder;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

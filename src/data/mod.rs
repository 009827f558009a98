//! Data loading and dataset implementations
//!
//! This module provides implementations of the Dataset trait for data
//! formats commonly used in machine learning. Loaders produce dense
//! feature vectors with bipolar labels; imputation and scaling are the
//! caller's concern (see `utils::scaling`).

pub mod csv;
pub mod libsvm;

pub use self::csv::*;
pub use self::libsvm::*;

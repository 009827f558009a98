//! Binary optimizer backends
//!
//! Reference implementations of the [`crate::core::BinaryOptimizer`]
//! contract: an exact brute-force solver for small ensembles and a
//! classical simulated annealer for larger ones. A remote annealing
//! service would plug in behind the same trait.

pub mod annealing;
pub mod exact;

pub use self::annealing::*;
pub use self::exact::*;

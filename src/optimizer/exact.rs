//! Exact brute-force QUBO solver
//!
//! Enumerates every binary assignment and returns the single minimum.
//! Deterministic, so it doubles as the test oracle for the stochastic
//! backends. Capped at a variable count where 2^N enumeration is still
//! instantaneous.

use std::time::Instant;

use log::debug;

use crate::core::{
    BinaryOptimizer, QboostError, Qubo, Result, SampleParams, SampleSet, SolverSample,
};

/// Largest QUBO the exact solver will enumerate (2^24 assignments)
pub const MAX_EXACT_VARIABLES: usize = 24;

/// Brute-force enumeration solver
///
/// Ignores `num_reads` (a second read would return the same answer) and
/// responds with exactly one sample. Ties between equal-energy
/// assignments resolve to the lowest assignment in enumeration order,
/// which makes the response fully deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactSolver;

impl ExactSolver {
    /// Create a new exact solver
    pub fn new() -> Self {
        Self
    }
}

impl BinaryOptimizer for ExactSolver {
    fn sample(&self, qubo: &Qubo, params: &SampleParams) -> Result<SampleSet> {
        let n = qubo.num_variables();
        if n == 0 {
            return Err(QboostError::InvalidParameter(
                "QUBO has no variables".to_string(),
            ));
        }
        if n > MAX_EXACT_VARIABLES {
            return Err(QboostError::InvalidParameter(format!(
                "exact solver supports at most {MAX_EXACT_VARIABLES} variables, got {n}"
            )));
        }

        let start = Instant::now();
        let mut best_bits = vec![0u8; n];
        let mut best_energy = qubo.evaluate(&best_bits);

        let mut bits = vec![0u8; n];
        for assignment in 1u64..(1u64 << n) {
            // Check the deadline often enough to stay responsive, rarely
            // enough not to dominate the loop
            if assignment & 0x3FF == 0 {
                if let Some(timeout) = params.timeout {
                    let elapsed = start.elapsed();
                    if elapsed > timeout {
                        return Err(QboostError::OptimizationTimeout { elapsed });
                    }
                }
            }

            for (i, bit) in bits.iter_mut().enumerate() {
                *bit = ((assignment >> i) & 1) as u8;
            }
            let energy = qubo.evaluate(&bits);
            if energy < best_energy {
                best_energy = energy;
                best_bits.copy_from_slice(&bits);
            }
        }

        debug!(
            "exact solver enumerated {} assignments over {n} variables, best energy {best_energy:.6}",
            1u64 << n
        );

        let mut set = SampleSet::new();
        set.push(SolverSample::new(best_bits, best_energy));
        Ok(set)
    }

    fn name(&self) -> &str {
        "exact"
    }
}

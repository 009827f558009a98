//! Classical simulated annealing QUBO solver
//!
//! Single-flip Metropolis sampling under a geometric cooling schedule.
//! Each read is an independent restart contributing one sample (the best
//! assignment seen during that read), so `num_reads > 1` produces a
//! stochastic, possibly duplicate-bearing response the consumer reduces
//! by minimum energy.

use std::time::Instant;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{
    BinaryOptimizer, QboostError, Qubo, Result, SampleParams, SampleSet, SolverSample,
};

/// Simulated annealing backend
#[derive(Debug, Clone)]
pub struct SimulatedAnnealer {
    sweeps: usize,
    initial_temperature: f64,
    final_temperature: f64,
}

impl SimulatedAnnealer {
    /// Create an annealer with the default schedule
    pub fn new() -> Self {
        Self {
            sweeps: 1000,
            initial_temperature: 10.0,
            final_temperature: 0.01,
        }
    }

    /// Set the number of full sweeps per read
    pub fn with_sweeps(mut self, sweeps: usize) -> Self {
        self.sweeps = sweeps;
        self
    }

    /// Set the geometric temperature schedule endpoints
    pub fn with_temperature_range(mut self, initial: f64, final_: f64) -> Self {
        self.initial_temperature = initial;
        self.final_temperature = final_;
        self
    }

    /// Geometric interpolation between the schedule endpoints
    fn temperature(&self, progress: f64) -> f64 {
        self.initial_temperature
            * (self.final_temperature / self.initial_temperature).powf(progress)
    }

    fn validate(&self) -> Result<()> {
        if self.sweeps == 0 {
            return Err(QboostError::InvalidParameter(
                "sweeps must be positive".to_string(),
            ));
        }
        if self.initial_temperature <= 0.0
            || self.final_temperature <= 0.0
            || self.final_temperature > self.initial_temperature
        {
            return Err(QboostError::InvalidParameter(format!(
                "invalid temperature range [{}, {}]",
                self.final_temperature, self.initial_temperature
            )));
        }
        Ok(())
    }

    /// One independent annealing read: random start, cooled Metropolis
    /// sweeps, returns the best assignment seen
    fn run_read(
        &self,
        qubo: &Qubo,
        rng: &mut StdRng,
        start: Instant,
        params: &SampleParams,
    ) -> Result<SolverSample> {
        let n = qubo.num_variables();

        let mut bits: Vec<u8> = (0..n).map(|_| rng.gen_range(0..=1u8)).collect();
        let mut energy = qubo.evaluate(&bits);
        let mut best_bits = bits.clone();
        let mut best_energy = energy;

        let denominator = (self.sweeps - 1).max(1) as f64;
        for sweep in 0..self.sweeps {
            if let Some(timeout) = params.timeout {
                let elapsed = start.elapsed();
                if elapsed > timeout {
                    return Err(QboostError::OptimizationTimeout { elapsed });
                }
            }

            let temperature = self.temperature(sweep as f64 / denominator);
            for i in 0..n {
                let delta = qubo.flip_delta(&bits, i);
                let accept = delta <= 0.0 || rng.gen::<f64>() < (-delta / temperature).exp();
                if accept {
                    bits[i] ^= 1;
                    energy += delta;
                    if energy < best_energy {
                        best_energy = energy;
                        best_bits.copy_from_slice(&bits);
                    }
                }
            }
        }

        Ok(SolverSample::new(best_bits, best_energy))
    }
}

impl Default for SimulatedAnnealer {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryOptimizer for SimulatedAnnealer {
    fn sample(&self, qubo: &Qubo, params: &SampleParams) -> Result<SampleSet> {
        self.validate()?;
        if qubo.num_variables() == 0 {
            return Err(QboostError::InvalidParameter(
                "QUBO has no variables".to_string(),
            ));
        }
        if params.num_reads == 0 {
            return Err(QboostError::InvalidParameter(
                "num_reads must be positive".to_string(),
            ));
        }

        let start = Instant::now();
        let mut set = SampleSet::new();

        for read in 0..params.num_reads {
            // Distinct deterministic stream per read when seeded
            let mut rng = match params.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(read as u64)),
                None => StdRng::from_entropy(),
            };
            let sample = self.run_read(qubo, &mut rng, start, params)?;
            set.push(sample);
        }

        debug!(
            "annealer completed {} reads of {} sweeps, best energy {:.6}",
            params.num_reads,
            self.sweeps,
            set.best().map(|s| s.energy).unwrap_or(f64::NAN)
        );

        Ok(set)
    }

    fn name(&self) -> &str {
        "simulated-annealing"
    }
}

//! Benchmarks for QUBO construction and optimization

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qboost::core::{SampleParams, Sample};
use qboost::ensemble::WeakClassifierEnsemble;
use qboost::optimizer::{ExactSolver, SimulatedAnnealer};
use qboost::qubo::QuboBuilder;
use qboost::BinaryOptimizer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic pseudo-random training data, bipolar labels
fn synthetic_samples(n_samples: usize, dim: usize) -> Vec<Sample> {
    let mut rng = StdRng::seed_from_u64(1234);

    (0..n_samples)
        .map(|_| {
            let features: Vec<f64> = (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect();
            let label = if features.iter().sum::<f64>() >= 0.0 {
                1.0
            } else {
                -1.0
            };
            Sample::new(features, label)
        })
        .collect()
}

fn fitted_matrix(n_samples: usize, dim: usize) -> (qboost::PredictionMatrix, Vec<f64>) {
    let samples = synthetic_samples(n_samples, dim);
    let mut ensemble = WeakClassifierEnsemble::of_stumps(dim).expect("valid ensemble");
    ensemble.fit(&samples).expect("ensemble fit");
    let matrix = ensemble.prediction_matrix(&samples).expect("vote matrix");
    let labels: Vec<f64> = samples.iter().map(|s| s.label).collect();
    (matrix, labels)
}

fn bench_qubo_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("qubo_construction");

    for &dim in &[8usize, 16, 32, 64] {
        let (matrix, labels) = fitted_matrix(200, dim);
        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |b, _| {
            b.iter(|| {
                QuboBuilder::build(black_box(&matrix), black_box(&labels), 0.01)
                    .expect("build succeeds")
            })
        });
    }

    group.finish();
}

fn bench_exact_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_solver");
    let params = SampleParams::default();

    for &dim in &[8usize, 12, 16] {
        let (matrix, labels) = fitted_matrix(100, dim);
        let qubo = QuboBuilder::build(&matrix, &labels, 0.01).expect("build succeeds");
        let solver = ExactSolver::new();
        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |b, _| {
            b.iter(|| solver.sample(black_box(&qubo), &params).expect("solve succeeds"))
        });
    }

    group.finish();
}

fn bench_simulated_annealer(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulated_annealer");
    let params = SampleParams {
        num_reads: 1,
        seed: Some(7),
        ..SampleParams::default()
    };

    for &dim in &[16usize, 64, 128] {
        let (matrix, labels) = fitted_matrix(100, dim);
        let qubo = QuboBuilder::build(&matrix, &labels, 0.01).expect("build succeeds");
        let solver = SimulatedAnnealer::new().with_sweeps(200);
        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |b, _| {
            b.iter(|| solver.sample(black_box(&qubo), &params).expect("solve succeeds"))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_qubo_construction,
    bench_exact_solver,
    bench_simulated_annealer
);
criterion_main!(benches);

//! Benchmarks for ansatz construction and energy evaluation
//!
//! Run with: cargo bench -p molvqe-core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use molvqe_core::{AnsatzBuilder, RotationAxis};
use molvqe_ir::SparsePauliOp;
use molvqe_sim::{Estimator, StatevectorEstimator};

const OPENING: [RotationAxis; 3] = [RotationAxis::Z, RotationAxis::Y, RotationAxis::X];

/// Benchmark building the layered ansatz
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("ansatz_build");

    for n in &[2usize, 4, 8, 16] {
        group.bench_with_input(BenchmarkId::new("zyx", n), n, |b, &n| {
            b.iter(|| AnsatzBuilder::build(black_box(n), &OPENING, &[]).unwrap());
        });
    }

    group.finish();
}

/// Benchmark one objective evaluation on a transverse-field chain
fn bench_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("ansatz_estimate");

    for n in &[4usize, 8, 12] {
        let ansatz = AnsatzBuilder::build(*n, &OPENING, &[RotationAxis::Y]).unwrap();
        let mut terms: Vec<(String, f64)> = Vec::new();
        for q in 0..*n {
            let mut label = vec!['I'; *n];
            label[q] = 'X';
            terms.push((label.iter().collect(), 0.5));
            if q + 1 < *n {
                let mut label = vec!['I'; *n];
                label[q] = 'Z';
                label[q + 1] = 'Z';
                terms.push((label.iter().collect(), -1.0));
            }
        }
        let op = SparsePauliOp::from_labels(terms.iter().map(|(l, c)| (l.as_str(), *c))).unwrap();
        let params = vec![0.1; ansatz.num_parameters()];

        group.bench_with_input(BenchmarkId::new("exact", n), &ansatz, |b, ansatz| {
            let mut estimator = StatevectorEstimator::exact();
            b.iter(|| estimator.estimate(ansatz, black_box(&params), &op).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_estimate);
criterion_main!(benches);

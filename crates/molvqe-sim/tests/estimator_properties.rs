//! Property tests for the statevector estimator.

use proptest::prelude::*;
use std::f64::consts::PI;

use molvqe_ir::{Circuit, Parameter, QubitId, SparsePauliOp};
use molvqe_sim::{Estimator, Statevector, StatevectorEstimator};

/// Ry layer, CX chain, Rz layer on three qubits; six parameters.
fn entangled_circuit() -> Circuit {
    let mut circuit = Circuit::with_size("entangled", 3);
    for q in 0..3 {
        circuit.ry(&Parameter::new(format!("a{q}")), QubitId(q)).unwrap();
    }
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.cx(QubitId(1), QubitId(2)).unwrap();
    for q in 0..3 {
        circuit.rz(&Parameter::new(format!("b{q}")), QubitId(q)).unwrap();
    }
    circuit
}

fn observable() -> SparsePauliOp {
    SparsePauliOp::from_labels([("ZZI", 0.7), ("IXX", -0.4), ("YIY", 0.25), ("III", -1.0)]).unwrap()
}

proptest! {
    #[test]
    fn evolution_preserves_norm(params in prop::collection::vec(-PI..PI, 6)) {
        let bound = entangled_circuit().assign_parameters(&params).unwrap();
        let state = Statevector::run(&bound).unwrap();
        let total: f64 = state.probabilities().iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-10);
    }

    #[test]
    fn exact_estimate_is_bounded(params in prop::collection::vec(-PI..PI, 6)) {
        let estimate = StatevectorEstimator::exact()
            .estimate(&entangled_circuit(), &params, &observable())
            .unwrap();
        prop_assert_eq!(estimate.std, 0.0);
        // |⟨H⟩ + 1| ≤ 0.7 + 0.4 + 0.25
        prop_assert!((estimate.mean + 1.0).abs() <= 1.35 + 1e-12);
    }

    #[test]
    fn single_qubit_rotation(theta in -PI..PI) {
        let mut circuit = Circuit::with_size("ry", 1);
        circuit.ry(&Parameter::new("theta"), QubitId(0)).unwrap();
        let z = SparsePauliOp::from_labels([("Z", 1.0)]).unwrap();
        let x = SparsePauliOp::from_labels([("X", 1.0)]).unwrap();

        let mut estimator = StatevectorEstimator::exact();
        let ez = estimator.estimate(&circuit, &[theta], &z).unwrap().mean;
        let ex = estimator.estimate(&circuit, &[theta], &x).unwrap().mean;
        prop_assert!((ez - theta.cos()).abs() < 1e-12);
        prop_assert!((ex - theta.sin()).abs() < 1e-12);
    }

    #[test]
    fn sampled_estimate_tracks_exact(params in prop::collection::vec(-PI..PI, 6), seed in any::<u64>()) {
        let circuit = entangled_circuit();
        let exact = StatevectorEstimator::exact()
            .estimate(&circuit, &params, &observable())
            .unwrap();
        let sampled = StatevectorEstimator::new(Some(4000), seed)
            .estimate(&circuit, &params, &observable())
            .unwrap();
        prop_assert!((sampled.mean - exact.mean).abs() <= 6.0 * sampled.std + 0.02);
    }
}

#[test]
fn sampling_is_reproducible() {
    let circuit = entangled_circuit();
    let params = [0.3, -1.2, 2.0, 0.1, 0.5, -0.7];
    let a = StatevectorEstimator::new(Some(500), 9)
        .estimate(&circuit, &params, &observable())
        .unwrap();
    let b = StatevectorEstimator::new(Some(500), 9)
        .estimate(&circuit, &params, &observable())
        .unwrap();
    assert_eq!(a, b);
    assert!(a.std > 0.0);
}

//! Property-based tests for the circuit IR.

use molvqe_ir::{Circuit, ParameterExpression, QubitId};
use proptest::prelude::*;

fn rotation_circuit(angles: &[f64]) -> Circuit {
    let n = angles.len().max(1) as u32;
    let mut circuit = Circuit::with_size("prop", n);
    for (q, _) in angles.iter().enumerate() {
        circuit
            .ry(ParameterExpression::symbol(format!("p{q}")), QubitId(q as u32))
            .unwrap();
    }
    circuit
}

proptest! {
    /// Binding all parameters leaves a fully concrete circuit with the same gates.
    #[test]
    fn assign_parameters_binds_everything(angles in prop::collection::vec(-3.0f64..3.0, 1..8)) {
        let circuit = rotation_circuit(&angles);
        let bound = circuit.assign_parameters(&angles).unwrap();

        prop_assert!(!bound.is_parameterized());
        prop_assert_eq!(bound.num_ops(), circuit.num_ops());
        for (inst, angle) in bound.instructions().iter().zip(&angles) {
            let value = inst.as_gate().unwrap().parameters()[0].as_f64().unwrap();
            prop_assert!((value - angle).abs() < 1e-12);
        }
    }

    /// Depth never exceeds the number of gates.
    #[test]
    fn depth_bounded_by_gate_count(pairs in prop::collection::vec((0u32..5, 0u32..5), 0..30)) {
        let mut circuit = Circuit::with_size("prop", 5);
        for (a, b) in pairs {
            if a == b {
                circuit.x(QubitId(a)).unwrap();
            } else {
                circuit.cx(QubitId(a), QubitId(b)).unwrap();
            }
        }
        prop_assert!(circuit.depth() <= circuit.num_ops());
    }
}

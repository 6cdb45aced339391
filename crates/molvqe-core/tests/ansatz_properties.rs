//! Property tests for ansatz layout and scoring.

use proptest::prelude::*;
use std::collections::HashSet;

use molvqe_core::{AnsatzBuilder, CoreError, RotationAxis, ScoreEvaluator};

fn axis() -> impl Strategy<Value = RotationAxis> {
    prop_oneof![
        Just(RotationAxis::X),
        Just(RotationAxis::Y),
        Just(RotationAxis::Z),
    ]
}

/// Distinct axes in any order.
fn axes() -> impl Strategy<Value = Vec<RotationAxis>> {
    prop::sample::subsequence(RotationAxis::ALL.to_vec(), 0..=3).prop_shuffle()
}

/// Axes with at least one repeat.
fn repeated_axes() -> impl Strategy<Value = Vec<RotationAxis>> {
    (axes(), axis(), any::<prop::sample::Index>()).prop_map(|(mut axes, extra, at)| {
        axes.push(extra);
        axes.insert(at.index(axes.len() + 1), extra);
        axes
    })
}

proptest! {
    #[test]
    fn ladder_only_ansatz(n in 1usize..12) {
        let circuit = AnsatzBuilder::build(n, &[], &[]).unwrap();
        prop_assert_eq!(circuit.num_nonlocal_gates(), n - 1);
        prop_assert_eq!(circuit.num_parameters(), 2 * (n - 1));

        let ops = circuit.count_ops();
        prop_assert_eq!(ops.get("rx").copied(), None);
        prop_assert_eq!(ops.get("ry").copied().unwrap_or(0), n - 1);
        prop_assert_eq!(ops.get("rz").copied().unwrap_or(0), n - 1);
        // Ladder rotations only ever touch qubits 1..n.
        for inst in circuit.instructions().iter().filter(|i| i.name() == "ry" || i.name() == "rz") {
            prop_assert!(inst.qubits[0].0 >= 1);
        }
    }

    #[test]
    fn parameter_count_formula(n in 1usize..10, open in axes(), close in axes()) {
        let circuit = AnsatzBuilder::build(n, &open, &close).unwrap();
        let expected = n * open.len() + 2 * (n - 1) + n * close.len();
        prop_assert_eq!(circuit.num_parameters(), expected);
        prop_assert_eq!(AnsatzBuilder::parameter_count(n, &open, &close), expected);
    }

    #[test]
    fn parameter_names_are_distinct(n in 1usize..10, open in axes(), close in axes()) {
        let circuit = AnsatzBuilder::build(n, &open, &close).unwrap();
        let names: HashSet<&str> = circuit.parameters().iter().map(|p| p.name()).collect();
        prop_assert_eq!(names.len(), circuit.num_parameters());
    }

    #[test]
    fn repeated_axis_is_rejected(n in 1usize..6, repeated in repeated_axes(), other in axes(), closing in any::<bool>()) {
        let result = if closing {
            AnsatzBuilder::build(n, &other, &repeated)
        } else {
            AnsatzBuilder::build(n, &repeated, &other)
        };
        prop_assert!(matches!(result, Err(CoreError::InvalidArgument(_))));
    }

    #[test]
    fn entanglers_form_a_path(n in 1usize..12, open in axes(), close in axes()) {
        let circuit = AnsatzBuilder::build(n, &open, &close).unwrap();
        let graph = circuit.interaction_graph();
        prop_assert_eq!(graph.node_count(), n);
        prop_assert_eq!(graph.edge_count(), n - 1);
        for edge in graph.edge_indices() {
            let (a, b) = graph.edge_endpoints(edge).unwrap();
            prop_assert_eq!(graph[a].0.abs_diff(graph[b].0), 1);
            prop_assert_eq!(graph[edge], 1);
        }
        let max_degree = graph.node_indices().map(|q| graph.neighbors(q).count()).max();
        prop_assert!(max_degree.unwrap_or(0) <= 2);
    }

    #[test]
    fn build_is_deterministic(n in 1usize..10, open in axes(), close in axes()) {
        let a = AnsatzBuilder::build(n, &open, &close).unwrap();
        let b = AnsatzBuilder::build(n, &open, &close).unwrap();
        prop_assert!(a.same_structure(&b));
    }

    #[test]
    fn exact_energy_always_passes(exact in -100.0f64..0.0, threshold in 0.0f64..10.0, k in 0usize..50) {
        let score = ScoreEvaluator::evaluate(exact, exact, k, 0, threshold);
        prop_assert_eq!(score.error_mha, 0.0);
        prop_assert!(score.passed);
        prop_assert_eq!(score.score, k);
    }
}

#[test]
fn one_sided_threshold() {
    let exact = -1.137_306;
    let above = ScoreEvaluator::evaluate(exact + 0.005, exact, 1, 2, 4.0);
    assert!((above.error_mha - 5.0).abs() < 1e-9);
    assert!(!above.passed);

    let below = ScoreEvaluator::evaluate(exact - 0.01, exact, 1, 2, 4.0);
    assert!((below.error_mha + 10.0).abs() < 1e-9);
    assert!(below.passed);
}

#[test]
fn reference_run_layout() {
    use RotationAxis::{X, Y, Z};
    let circuit = AnsatzBuilder::build(4, &[Z, Y, X], &[]).unwrap();
    let ops = circuit.count_ops();
    assert_eq!(ops["rz"], 4 + 3);
    assert_eq!(ops["ry"], 4 + 3);
    assert_eq!(ops["rx"], 4);
    assert_eq!(ops["cx"], 3);
    assert_eq!(ops["barrier"], 2);
    assert_eq!(circuit.num_parameters(), 18);
}

//! End-to-end checks of molecule → qubit Hamiltonian against exact diagonalization.

use molvqe_chem::{
    ActiveSpaceTransformer, ElectronicStructureProblem, FermionicOp, HartreeFockDriver, MappingKind,
    MolecularDriver, Molecule, QubitConverter, hartree_fock_circuit, real_coefficient,
};
use molvqe_ir::SparsePauliOp;
use molvqe_sim::{ExactEigensolver, Statevector};

const H2_FCI: f64 = -1.137_306;
const LIH_ACTIVE_EXACT: f64 = -7.881_461;

fn h2() -> ElectronicStructureProblem {
    HartreeFockDriver::new().run(&Molecule::h2(0.735)).unwrap()
}

fn lih_active() -> ElectronicStructureProblem {
    let full = HartreeFockDriver::new().run(&Molecule::lih(1.5474)).unwrap();
    ActiveSpaceTransformer::new(true, vec![-3, -2])
        .transform(&full)
        .unwrap()
}

fn qubit_op(problem: &ElectronicStructureProblem, converter: QubitConverter) -> SparsePauliOp {
    converter
        .convert(&FermionicOp::from_problem(problem), problem.num_particles())
        .unwrap()
}

fn ground_energy(problem: &ElectronicStructureProblem, op: &SparsePauliOp) -> f64 {
    ExactEigensolver::new().ground_state(op).unwrap().eigenvalue + problem.constant_energy()
}

#[test]
fn h2_ground_state_agrees_across_mappings() {
    let problem = h2();
    for converter in [
        QubitConverter::new(MappingKind::JordanWigner, false),
        QubitConverter::new(MappingKind::Parity, false),
        QubitConverter::new(MappingKind::Parity, true),
    ] {
        let op = qubit_op(&problem, converter);
        assert!(op.is_hermitian(1e-12));
        assert_eq!(op.num_qubits() as usize, converter.num_qubits(4));
        let energy = ground_energy(&problem, &op);
        assert!(
            (energy - H2_FCI).abs() < 1e-5,
            "{:?}: {energy} vs {H2_FCI}",
            converter
        );
    }
}

#[test]
fn h2_reduced_operator_coefficients() {
    let op = qubit_op(&h2(), QubitConverter::new(MappingKind::Parity, true));
    assert_eq!(op.num_terms(), 5);
    let coeff = |label| real_coefficient(&op, label).unwrap();
    assert!((coeff("II") + 1.052_37).abs() < 1e-4);
    assert!((coeff("IZ").abs() - 0.397_94).abs() < 1e-4);
    assert!((coeff("IZ") + coeff("ZI")).abs() < 1e-10);
    assert!((coeff("ZZ") + 0.011_28).abs() < 1e-4);
    assert!((coeff("XX") - 0.180_93).abs() < 1e-4);
}

#[test]
fn lih_active_space_reduces_to_four_qubits() {
    let problem = lih_active();
    let op = qubit_op(&problem, QubitConverter::new(MappingKind::Parity, true));
    assert_eq!(op.num_qubits(), 4);
    assert_eq!(op.num_terms(), 100);
    let energy = ground_energy(&problem, &op);
    assert!((energy - LIH_ACTIVE_EXACT).abs() < 1e-5, "{energy}");
}

#[test]
fn hartree_fock_circuit_reproduces_reference_energy() {
    for (problem, converter) in [
        (h2(), QubitConverter::new(MappingKind::JordanWigner, false)),
        (h2(), QubitConverter::new(MappingKind::Parity, true)),
        (lih_active(), QubitConverter::new(MappingKind::Parity, true)),
    ] {
        let op = qubit_op(&problem, converter);
        let circuit =
            hartree_fock_circuit(problem.num_spatial_orbitals, problem.num_particles(), &converter)
                .unwrap();
        let state = Statevector::run(&circuit).unwrap();
        let energy = state.expectation(&op).unwrap() + problem.constant_energy();
        assert!(
            (energy - problem.hf_energy).abs() < 1e-8,
            "{energy} vs {}",
            problem.hf_energy
        );
    }
}

#[test]
fn jordan_wigner_reduction_request_is_ignored() {
    let problem = h2();
    let op = qubit_op(&problem, QubitConverter::new(MappingKind::JordanWigner, true));
    assert_eq!(op.num_qubits(), 4);
}

//! Property tests for fermion-to-qubit mappings and reference states.

use proptest::prelude::*;

use molvqe_chem::{FermionicOp, Ladder, MappingKind, hartree_fock_bitstring};
use molvqe_ir::{Circuit, QubitId};
use molvqe_sim::Statevector;

/// Basis state with the given qubits set.
fn basis_state(bits: &[bool]) -> Statevector {
    let mut circuit = Circuit::with_size("basis", bits.len() as u32);
    for (q, _) in bits.iter().enumerate().filter(|(_, b)| **b) {
        circuit.x(QubitId(q as u32)).unwrap();
    }
    Statevector::run(&circuit).unwrap()
}

proptest! {
    #[test]
    fn number_operators_read_encoded_occupations(
        occupation in prop::collection::vec(any::<bool>(), 1..8),
    ) {
        let modes = occupation.len();
        for kind in [MappingKind::JordanWigner, MappingKind::Parity] {
            let mapper = kind.mapper();
            let state = basis_state(&mapper.encode_occupation(&occupation));

            let mut total = FermionicOp::new(modes);
            for (j, &occupied) in occupation.iter().enumerate() {
                let mut number = FermionicOp::new(modes);
                number.push(1.0, vec![(j, Ladder::Create), (j, Ladder::Annihilate)]);
                total.push(1.0, vec![(j, Ladder::Create), (j, Ladder::Annihilate)]);

                let n_j = state.expectation(&mapper.map(&number).unwrap()).unwrap();
                prop_assert!((n_j - f64::from(u8::from(occupied))).abs() < 1e-12, "{} mode {}", kind, j);
            }

            let count = state.expectation(&mapper.map(&total).unwrap()).unwrap();
            let expected = occupation.iter().filter(|&&o| o).count() as f64;
            prop_assert!((count - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn hartree_fock_fills_lowest_orbitals(
        orbitals in 1usize..8,
        alpha_frac in 0.0f64..=1.0,
        beta_frac in 0.0f64..=1.0,
    ) {
        let alpha = (alpha_frac * orbitals as f64).floor() as usize;
        let beta = (beta_frac * orbitals as f64).floor() as usize;
        let bits = hartree_fock_bitstring(orbitals, (alpha, beta)).unwrap();

        prop_assert_eq!(bits.len(), 2 * orbitals);
        let (alpha_block, beta_block) = bits.split_at(orbitals);
        prop_assert!(alpha_block.iter().take(alpha).all(|&b| b));
        prop_assert!(alpha_block.iter().skip(alpha).all(|&b| !b));
        prop_assert!(beta_block.iter().take(beta).all(|&b| b));
        prop_assert!(beta_block.iter().skip(beta).all(|&b| !b));
    }
}

#[test]
fn too_many_electrons_rejected() {
    assert!(hartree_fock_bitstring(2, (3, 1)).is_err());
}

//! Hartree–Fock reference state preparation.

use molvqe_ir::{Circuit, QubitId};

use crate::converter::QubitConverter;
use crate::error::{ChemError, ChemResult};

/// Occupation vector of the Hartree–Fock determinant in block spin order.
///
/// The lowest `num_alpha` spin-up and lowest `num_beta` spin-down orbitals are filled.
pub fn hartree_fock_bitstring(num_spatial_orbitals: usize, num_particles: (usize, usize)) -> ChemResult<Vec<bool>> {
    let (alpha, beta) = num_particles;
    if alpha > num_spatial_orbitals || beta > num_spatial_orbitals {
        return Err(ChemError::InvalidArgument(format!(
            "({alpha}, {beta}) electrons do not fit in {num_spatial_orbitals} orbitals"
        )));
    }
    let mut occupation = vec![false; 2 * num_spatial_orbitals];
    occupation[..alpha].fill(true);
    occupation[num_spatial_orbitals..num_spatial_orbitals + beta].fill(true);
    Ok(occupation)
}

/// Circuit preparing the Hartree–Fock state from `|0…0⟩` with `X` gates.
pub fn hartree_fock_circuit(
    num_spatial_orbitals: usize,
    num_particles: (usize, usize),
    converter: &QubitConverter,
) -> ChemResult<Circuit> {
    let occupation = hartree_fock_bitstring(num_spatial_orbitals, num_particles)?;
    let bits = converter.encode(&occupation)?;
    let num_qubits = u32::try_from(bits.len())
        .map_err(|_| ChemError::InvalidArgument("too many qubits".into()))?;
    let mut circuit = Circuit::with_size("hartree_fock", num_qubits);
    for (qubit, _) in bits.iter().enumerate().filter(|(_, set)| **set) {
        circuit.x(QubitId(qubit as u32))?;
    }
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::MappingKind;

    #[test]
    fn test_bitstring_block_order() {
        assert_eq!(
            hartree_fock_bitstring(3, (2, 1)).unwrap(),
            vec![true, true, false, true, false, false]
        );
        assert!(hartree_fock_bitstring(2, (3, 0)).is_err());
    }

    #[test]
    fn test_circuit_parity_reduced() {
        let converter = QubitConverter::new(MappingKind::Parity, true);
        let circuit = hartree_fock_circuit(3, (1, 1), &converter).unwrap();
        assert_eq!(circuit.num_qubits(), 4);
        // Occupation [1,0,0,1,0,0] has parity bits [1,1,1,0,0,0].
        assert_eq!(circuit.count_ops().get("x"), Some(&2));
    }

    #[test]
    fn test_circuit_jordan_wigner() {
        let converter = QubitConverter::new(MappingKind::JordanWigner, false);
        let circuit = hartree_fock_circuit(2, (1, 1), &converter).unwrap();
        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(circuit.num_ops(), 2);
    }
}

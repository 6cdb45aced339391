//! Fermionic operator to qubit operator conversion, with optional
//! symmetry-based qubit tapering.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use molvqe_ir::{PauliString, SparsePauliOp};

use crate::error::{ChemError, ChemResult};
use crate::fermionic::FermionicOp;
use crate::mapper::{MappingKind, QubitMapper};

/// Removes the two qubits that store spin-up and total particle parity.
///
/// Only valid after a parity mapping of a block-ordered operator: qubit
/// `N/2 - 1` then holds the parity of the spin-up electrons and qubit `N - 1`
/// the parity of all electrons, both fixed by the particle numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoQubitReduction {
    num_particles: (usize, usize),
}

impl TwoQubitReduction {
    /// Reduction for `(num_alpha, num_beta)` electrons.
    pub fn new(num_particles: (usize, usize)) -> Self {
        Self { num_particles }
    }

    /// Qubits removed from an `num_qubits`-qubit operator, ascending.
    pub fn removed_qubits(num_qubits: u32) -> ChemResult<[u32; 2]> {
        if num_qubits < 2 || num_qubits % 2 != 0 {
            return Err(ChemError::InvalidArgument(format!(
                "two-qubit reduction needs an even number of qubits, got {num_qubits}"
            )));
        }
        Ok([num_qubits / 2 - 1, num_qubits - 1])
    }

    /// Eigenvalue of `Z` on each removed qubit.
    fn parities(&self) -> [f64; 2] {
        let (alpha, beta) = self.num_particles;
        let sign = |count: usize| if count % 2 == 0 { 1.0 } else { -1.0 };
        [sign(alpha), sign(alpha + beta)]
    }

    /// Taper `op`, replacing `Z` on the removed qubits with its eigenvalue.
    pub fn reduce(&self, op: &SparsePauliOp) -> ChemResult<SparsePauliOp> {
        let removed = Self::removed_qubits(op.num_qubits())?;
        let removed_mask = removed.iter().fold(0u64, |m, &q| m | (1 << q));
        let parities = self.parities();

        let mut reduced = SparsePauliOp::zero(op.num_qubits() - 2);
        for (pauli, coeff) in op.terms() {
            if pauli.x_mask() & removed_mask != 0 {
                return Err(ChemError::SymmetryViolation(format!(
                    "term {pauli} does not commute with the parity symmetries"
                )));
            }
            let (tapered, removed_z) = pauli.remove_qubits(&removed)?;
            let sign: f64 = removed
                .iter()
                .zip(parities)
                .filter(|&(&q, _)| removed_z & (1 << q) != 0)
                .map(|(_, parity)| parity)
                .product();
            reduced.add_term(tapered, coeff * sign)?;
        }
        let reduced = reduced.simplify(crate::mapper::MAPPING_THRESHOLD);
        debug!(
            from = op.num_qubits(),
            to = reduced.num_qubits(),
            terms = reduced.num_terms(),
            "two-qubit reduction applied"
        );
        Ok(reduced)
    }

    /// Drop the removed qubits from a basis-state bitstring (qubit 0 first).
    pub fn reduce_bitstring(bits: &[bool]) -> ChemResult<Vec<bool>> {
        let num_qubits = u32::try_from(bits.len())
            .map_err(|_| ChemError::InvalidArgument("bitstring too long".into()))?;
        let removed = Self::removed_qubits(num_qubits)?;
        Ok(bits
            .iter()
            .enumerate()
            .filter(|&(q, _)| !removed.contains(&(q as u32)))
            .map(|(_, &b)| b)
            .collect())
    }
}

/// Mapping choice plus optional tapering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QubitConverter {
    /// Fermion-to-qubit mapping.
    pub mapping: MappingKind,
    /// Taper two qubits after a parity mapping.
    pub two_qubit_reduction: bool,
}

impl QubitConverter {
    /// Create a converter.
    pub fn new(mapping: MappingKind, two_qubit_reduction: bool) -> Self {
        Self {
            mapping,
            two_qubit_reduction,
        }
    }

    /// The reduction only applies to the parity mapping.
    fn reduces(&self) -> bool {
        self.two_qubit_reduction && self.mapping == MappingKind::Parity
    }

    /// Qubits needed for `num_modes` fermionic modes.
    pub fn num_qubits(&self, num_modes: usize) -> usize {
        if self.reduces() {
            num_modes.saturating_sub(2)
        } else {
            num_modes
        }
    }

    /// Map `op` and taper it if requested.
    pub fn convert(&self, op: &FermionicOp, num_particles: (usize, usize)) -> ChemResult<SparsePauliOp> {
        let mapped = self.mapping.mapper().map(op)?;
        if self.two_qubit_reduction && !self.reduces() {
            warn!(
                mapping = %self.mapping,
                "two-qubit reduction requires the parity mapping; skipping it"
            );
        }
        if self.reduces() {
            TwoQubitReduction::new(num_particles).reduce(&mapped)
        } else {
            Ok(mapped)
        }
    }

    /// Qubit basis state (qubit 0 first) for an occupation-number vector.
    pub fn encode(&self, occupation: &[bool]) -> ChemResult<Vec<bool>> {
        let bits = self.mapping.mapper().encode_occupation(occupation);
        if self.reduces() {
            TwoQubitReduction::reduce_bitstring(&bits)
        } else {
            Ok(bits)
        }
    }
}

/// Real part of the coefficient of the Pauli term written as `label`.
pub fn real_coefficient(op: &SparsePauliOp, label: &str) -> ChemResult<f64> {
    let pauli: PauliString = label.parse()?;
    Ok(op.coefficient(&pauli).re)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removed_qubits() {
        assert_eq!(TwoQubitReduction::removed_qubits(4).unwrap(), [1, 3]);
        assert_eq!(TwoQubitReduction::removed_qubits(12).unwrap(), [5, 11]);
        assert!(TwoQubitReduction::removed_qubits(3).is_err());
    }

    #[test]
    fn test_reduce_signs() {
        let op = SparsePauliOp::from_labels([("ZIZI", 1.0), ("IIZZ", 2.0), ("IZIZ", 3.0)]).unwrap();
        // One spin-up and one spin-down electron: Z_1 -> -1, Z_3 -> +1.
        let reduced = TwoQubitReduction::new((1, 1)).reduce(&op).unwrap();
        assert_eq!(reduced.num_qubits(), 2);
        assert_eq!(reduced.num_terms(), 3);
        assert!((real_coefficient(&reduced, "II").unwrap() + 1.0).abs() < 1e-12);
        assert!((real_coefficient(&reduced, "IZ").unwrap() + 2.0).abs() < 1e-12);
        assert!((real_coefficient(&reduced, "ZZ").unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_symmetry_violation() {
        let op = SparsePauliOp::from_labels([("IIXI", 1.0)]).unwrap();
        let err = TwoQubitReduction::new((1, 1)).reduce(&op).unwrap_err();
        assert!(matches!(err, ChemError::SymmetryViolation(_)));
    }

    #[test]
    fn test_reduction_skipped_for_jordan_wigner() {
        let converter = QubitConverter::new(MappingKind::JordanWigner, true);
        assert_eq!(converter.num_qubits(4), 4);
        let bits = converter.encode(&[true, false, true, false]).unwrap();
        assert_eq!(bits, vec![true, false, true, false]);
    }

    #[test]
    fn test_encode_parity_reduced() {
        let converter = QubitConverter::new(MappingKind::Parity, true);
        // Parity bits are [1,1,1,1,0,0,0,0]; qubits 3 and 7 go.
        let occ = [true, false, false, false, true, false, false, false];
        assert_eq!(
            converter.encode(&occ).unwrap(),
            vec![true, true, true, false, false, false]
        );
    }
}

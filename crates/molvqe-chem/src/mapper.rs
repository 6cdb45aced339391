//! Fermion-to-qubit mappings.
//!
//! Each mapping is described by its Majorana pair `(c_j, d_j)` per mode, with
//! `a†_j = ½(c_j − i d_j)` and `a_j = ½(c_j + i d_j)`. Products of ladder
//! operators are then plain Pauli algebra.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use molvqe_ir::{PauliString, SparsePauliOp};

use crate::error::{ChemError, ChemResult};
use crate::fermionic::{FermionicOp, Ladder};

/// Coefficients at or below this magnitude are dropped after mapping.
pub const MAPPING_THRESHOLD: f64 = 1e-10;

/// Maps fermionic modes onto qubits.
pub trait QubitMapper: Send + Sync {
    /// Mapping name.
    fn name(&self) -> &'static str;

    /// Majorana operators `(c_j, d_j)` for mode `j` of `num_modes`.
    fn majorana_pair(&self, mode: usize, num_modes: usize) -> ChemResult<(PauliString, PauliString)>;

    /// Qubit basis state encoding an occupation-number vector.
    fn encode_occupation(&self, occupation: &[bool]) -> Vec<bool>;

    /// Map a single ladder operator.
    fn map_ladder(&self, mode: usize, ladder: Ladder, num_modes: usize) -> ChemResult<SparsePauliOp> {
        let (c, d) = self.majorana_pair(mode, num_modes)?;
        let sign = match ladder {
            Ladder::Create => -1.0,
            Ladder::Annihilate => 1.0,
        };
        let mut op = SparsePauliOp::zero(c.num_qubits());
        op.add_term(c, Complex64::new(0.5, 0.0))?;
        op.add_term(d, Complex64::new(0.0, 0.5 * sign))?;
        Ok(op)
    }

    /// Map a whole operator, dropping negligible terms.
    fn map(&self, op: &FermionicOp) -> ChemResult<SparsePauliOp> {
        let n = op.num_modes();
        let num_qubits = u32::try_from(n)
            .map_err(|_| ChemError::InvalidArgument(format!("{n} modes is too many")))?;
        let ladders: Vec<[SparsePauliOp; 2]> = (0..n)
            .map(|j| {
                Ok([
                    self.map_ladder(j, Ladder::Create, n)?,
                    self.map_ladder(j, Ladder::Annihilate, n)?,
                ])
            })
            .collect::<ChemResult<_>>()?;

        let mut qubit_op = SparsePauliOp::zero(num_qubits);
        for term in op.terms() {
            let mut product = SparsePauliOp::identity(num_qubits, term.coeff)?;
            for &(mode, ladder) in &term.ops {
                if mode >= n {
                    return Err(ChemError::InvalidArgument(format!(
                        "mode {mode} out of range for {n} modes"
                    )));
                }
                let factor = &ladders[mode][usize::from(ladder == Ladder::Annihilate)];
                product = product.compose(factor)?;
            }
            qubit_op = qubit_op.add(&product)?;
        }
        let qubit_op = qubit_op.simplify(MAPPING_THRESHOLD);
        debug!(mapper = self.name(), terms = qubit_op.num_terms(), "mapped operator");
        Ok(qubit_op)
    }
}

fn check_mode(mode: usize, num_modes: usize) -> ChemResult<()> {
    if mode >= num_modes || num_modes > 64 {
        return Err(ChemError::InvalidArgument(format!(
            "mode {mode} out of range for {num_modes} modes (at most 64)"
        )));
    }
    Ok(())
}

/// Bits `0..j`.
fn mask_below(j: usize) -> u64 {
    if j >= 64 { u64::MAX } else { (1u64 << j) - 1 }
}

/// Jordan–Wigner: qubit `j` holds the occupation of mode `j`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JordanWignerMapper;

impl QubitMapper for JordanWignerMapper {
    fn name(&self) -> &'static str {
        "jordan_wigner"
    }

    fn majorana_pair(&self, mode: usize, num_modes: usize) -> ChemResult<(PauliString, PauliString)> {
        check_mode(mode, num_modes)?;
        let n = num_modes as u32;
        let bit = 1u64 << mode;
        let parity = mask_below(mode);
        Ok((
            PauliString::from_masks(n, bit, parity)?,
            PauliString::from_masks(n, bit, parity | bit)?,
        ))
    }

    fn encode_occupation(&self, occupation: &[bool]) -> Vec<bool> {
        occupation.to_vec()
    }
}

/// Parity: qubit `j` holds the parity of modes `0..=j`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParityMapper;

impl QubitMapper for ParityMapper {
    fn name(&self) -> &'static str {
        "parity"
    }

    fn majorana_pair(&self, mode: usize, num_modes: usize) -> ChemResult<(PauliString, PauliString)> {
        check_mode(mode, num_modes)?;
        let n = num_modes as u32;
        let bit = 1u64 << mode;
        // Update set: every later qubit stores a parity that includes this mode.
        let update = mask_below(num_modes) & !mask_below(mode + 1);
        let previous = if mode > 0 { 1u64 << (mode - 1) } else { 0 };
        Ok((
            PauliString::from_masks(n, update | bit, previous)?,
            PauliString::from_masks(n, update | bit, bit)?,
        ))
    }

    fn encode_occupation(&self, occupation: &[bool]) -> Vec<bool> {
        occupation
            .iter()
            .scan(false, |parity, &occupied| {
                *parity ^= occupied;
                Some(*parity)
            })
            .collect()
    }
}

/// Mapping selector for configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingKind {
    /// [`JordanWignerMapper`]
    JordanWigner,
    /// [`ParityMapper`]
    #[default]
    Parity,
}

impl MappingKind {
    /// The mapper this kind selects.
    pub fn mapper(self) -> Box<dyn QubitMapper> {
        match self {
            MappingKind::JordanWigner => Box::new(JordanWignerMapper),
            MappingKind::Parity => Box::new(ParityMapper),
        }
    }

    /// Stable name.
    pub fn name(self) -> &'static str {
        match self {
            MappingKind::JordanWigner => "jordan_wigner",
            MappingKind::Parity => "parity",
        }
    }
}

impl fmt::Display for MappingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MappingKind {
    type Err = ChemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "jordan_wigner" | "jw" => Ok(MappingKind::JordanWigner),
            "parity" => Ok(MappingKind::Parity),
            other => Err(ChemError::InvalidArgument(format!(
                "unknown mapping '{other}' (expected jordan_wigner or parity)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number_operator(mapper: &dyn QubitMapper, mode: usize, n: usize) -> SparsePauliOp {
        let mut op = FermionicOp::new(n);
        op.push(1.0, vec![(mode, Ladder::Create), (mode, Ladder::Annihilate)]);
        mapper.map(&op).unwrap()
    }

    #[test]
    fn test_jordan_wigner_number_operator() {
        // n_j = (I - Z_j) / 2
        let op = number_operator(&JordanWignerMapper, 2, 4);
        let expected = SparsePauliOp::from_labels([("IIII", 0.5), ("IZII", -0.5)]).unwrap();
        assert_eq!(op.terms(), expected.terms());
    }

    #[test]
    fn test_parity_number_operator() {
        // n_j = (I - Z_{j-1} Z_j) / 2 under the parity encoding
        let op = number_operator(&ParityMapper, 2, 4);
        let expected = SparsePauliOp::from_labels([("IIII", 0.5), ("IZZI", -0.5)]).unwrap();
        assert_eq!(op.terms(), expected.terms());
    }

    #[test]
    fn test_anticommutation() {
        // {a_i, a†_j} = δ_ij
        for mapper in [MappingKind::JordanWigner.mapper(), MappingKind::Parity.mapper()] {
            for i in 0..4 {
                for j in 0..4 {
                    let a = mapper.map_ladder(i, Ladder::Annihilate, 4).unwrap();
                    let b = mapper.map_ladder(j, Ladder::Create, 4).unwrap();
                    let anti = a.compose(&b).unwrap().add(&b.compose(&a).unwrap()).unwrap();
                    let anti = anti.simplify(1e-12);
                    if i == j {
                        assert_eq!(anti.num_terms(), 1);
                        assert!((anti.identity_coefficient() - 1.0).abs() < 1e-12);
                    } else {
                        assert_eq!(anti.num_terms(), 0, "{} modes {i},{j}", mapper.name());
                    }
                }
            }
        }
    }

    #[test]
    fn test_encode_occupation() {
        let occ = [true, false, false, true, false, false];
        assert_eq!(JordanWignerMapper.encode_occupation(&occ), occ.to_vec());
        assert_eq!(
            ParityMapper.encode_occupation(&occ),
            vec![true, true, true, false, false, false]
        );
    }

    #[test]
    fn test_mapping_kind_parse() {
        assert_eq!("JW".parse::<MappingKind>().unwrap(), MappingKind::JordanWigner);
        assert_eq!("jordan-wigner".parse::<MappingKind>().unwrap(), MappingKind::JordanWigner);
        assert_eq!("Parity".parse::<MappingKind>().unwrap(), MappingKind::Parity);
        assert!("bravyi_kitaev".parse::<MappingKind>().is_err());
    }
}

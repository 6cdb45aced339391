//! Pauli strings and weighted sums of them.
//!
//! A [`PauliString`] is stored as two bitmasks: bit `q` of `x` set means an X
//! component on qubit `q`, bit `q` of `z` an Z component; both set is Y. Text
//! labels put qubit 0 in the rightmost position, so `"XZ"` is Z on qubit 0
//! and X on qubit 1.

use num_complex::Complex64;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{IrError, IrResult};

/// Largest register a [`PauliString`] can address.
pub const MAX_PAULI_QUBITS: u32 = 64;

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Identity
    I,
    /// Pauli X
    X,
    /// Pauli Y
    Y,
    /// Pauli Z
    Z,
}

impl Pauli {
    /// Single-character name.
    pub fn name(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }

    fn from_bits(x: bool, z: bool) -> Self {
        match (x, z) {
            (false, false) => Pauli::I,
            (true, false) => Pauli::X,
            (true, true) => Pauli::Y,
            (false, true) => Pauli::Z,
        }
    }

    fn bits(self) -> (bool, bool) {
        match self {
            Pauli::I => (false, false),
            Pauli::X => (true, false),
            Pauli::Y => (true, true),
            Pauli::Z => (false, true),
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Tensor product of single-qubit Paulis, without a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PauliString {
    num_qubits: u32,
    x: u64,
    z: u64,
}

impl PauliString {
    /// The identity on `num_qubits` qubits.
    pub fn identity(num_qubits: u32) -> IrResult<Self> {
        if num_qubits > MAX_PAULI_QUBITS {
            return Err(IrError::InvalidArgument(format!(
                "Pauli strings support at most {MAX_PAULI_QUBITS} qubits, got {num_qubits}"
            )));
        }
        Ok(Self {
            num_qubits,
            x: 0,
            z: 0,
        })
    }

    /// Build from `(qubit, Pauli)` pairs; unlisted qubits are identity.
    pub fn from_sparse(num_qubits: u32, ops: &[(u32, Pauli)]) -> IrResult<Self> {
        let mut p = Self::identity(num_qubits)?;
        for &(q, op) in ops {
            if q >= num_qubits {
                return Err(IrError::InvalidArgument(format!(
                    "qubit {q} out of range for a {num_qubits}-qubit Pauli string"
                )));
            }
            p.set(q, op);
        }
        Ok(p)
    }

    /// Build directly from X and Z bitmasks.
    pub fn from_masks(num_qubits: u32, x: u64, z: u64) -> IrResult<Self> {
        let p = Self::identity(num_qubits)?;
        let valid = if num_qubits == 64 { u64::MAX } else { (1u64 << num_qubits) - 1 };
        if (x | z) & !valid != 0 {
            return Err(IrError::InvalidArgument(format!(
                "bitmask exceeds {num_qubits} qubits"
            )));
        }
        Ok(Self { x, z, ..p })
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// X bitmask.
    pub fn x_mask(&self) -> u64 {
        self.x
    }

    /// Z bitmask.
    pub fn z_mask(&self) -> u64 {
        self.z
    }

    /// The Pauli acting on `qubit`.
    pub fn get(&self, qubit: u32) -> Pauli {
        Pauli::from_bits(self.x >> qubit & 1 == 1, self.z >> qubit & 1 == 1)
    }

    /// Replace the Pauli acting on `qubit`.
    pub fn set(&mut self, qubit: u32, op: Pauli) {
        let mask = 1u64 << qubit;
        let (x, z) = op.bits();
        self.x = if x { self.x | mask } else { self.x & !mask };
        self.z = if z { self.z | mask } else { self.z & !mask };
    }

    /// Number of non-identity factors.
    pub fn weight(&self) -> u32 {
        (self.x | self.z).count_ones()
    }

    /// Check whether every factor is identity.
    pub fn is_identity(&self) -> bool {
        self.x == 0 && self.z == 0
    }

    /// Check whether the operator is diagonal in the computational basis.
    pub fn is_diagonal(&self) -> bool {
        self.x == 0
    }

    /// Check whether two strings commute.
    pub fn commutes_with(&self, other: &PauliString) -> bool {
        ((self.x & other.z).count_ones() + (self.z & other.x).count_ones()) % 2 == 0
    }

    /// Product `self · other` as `(phase, string)`.
    pub fn compose(&self, other: &PauliString) -> (Complex64, PauliString) {
        // Write each string as i^{|x&z|} X^x Z^z, then move other's X past self's Z.
        let ny_self = (self.x & self.z).count_ones();
        let ny_other = (other.x & other.z).count_ones();
        let swaps = (self.z & other.x).count_ones();
        let x = self.x ^ other.x;
        let z = self.z ^ other.z;
        let ny_out = (x & z).count_ones();
        // i^{ny_self + ny_other + 2·swaps − ny_out}
        let exponent = (ny_self + ny_other + 2 * swaps + 4 * 64 - ny_out) % 4;
        let phase = match exponent {
            0 => Complex64::new(1.0, 0.0),
            1 => Complex64::new(0.0, 1.0),
            2 => Complex64::new(-1.0, 0.0),
            _ => Complex64::new(0.0, -1.0),
        };
        (
            phase,
            PauliString {
                num_qubits: self.num_qubits.max(other.num_qubits),
                x,
                z,
            },
        )
    }

    /// Apply to the computational basis state `|basis⟩`: returns `(phase, target)`.
    #[inline]
    pub fn apply_to_basis(&self, basis: usize) -> (Complex64, usize) {
        let ny = (self.x & self.z).count_ones();
        let sign_flips = (basis as u64 & self.z).count_ones();
        let exponent = (ny + 2 * sign_flips) % 4;
        let phase = match exponent {
            0 => Complex64::new(1.0, 0.0),
            1 => Complex64::new(0.0, 1.0),
            2 => Complex64::new(-1.0, 0.0),
            _ => Complex64::new(0.0, -1.0),
        };
        (phase, basis ^ self.x as usize)
    }

    /// Drop the listed qubits, shifting the remaining ones down.
    ///
    /// Fails if any removed qubit carries X or Y.
    pub fn remove_qubits(&self, removed: &[u32]) -> IrResult<(PauliString, u64)> {
        let kept = (0..self.num_qubits).filter(|q| !removed.contains(q)).count() as u32;
        let mut out = PauliString::identity(kept)?;
        let mut next = 0;
        let mut removed_z = 0u64;
        for q in 0..self.num_qubits {
            if removed.contains(&q) {
                match self.get(q) {
                    Pauli::I => {}
                    Pauli::Z => removed_z |= 1 << q,
                    other => {
                        return Err(IrError::InvalidArgument(format!(
                            "cannot remove qubit {q}: term acts with {other} on it"
                        )));
                    }
                }
            } else {
                out.set(next, self.get(q));
                next += 1;
            }
        }
        Ok((out, removed_z))
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for q in (0..self.num_qubits).rev() {
            write!(f, "{}", self.get(q))?;
        }
        Ok(())
    }
}

impl FromStr for PauliString {
    type Err = IrError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let n = u32::try_from(label.chars().count())
            .map_err(|_| IrError::InvalidArgument("Pauli label too long".into()))?;
        let mut p = PauliString::identity(n)?;
        for (i, c) in label.chars().rev().enumerate() {
            let op = match c.to_ascii_uppercase() {
                'I' => Pauli::I,
                'X' => Pauli::X,
                'Y' => Pauli::Y,
                'Z' => Pauli::Z,
                other => {
                    return Err(IrError::InvalidArgument(format!(
                        "invalid Pauli character '{other}' in '{label}'"
                    )));
                }
            };
            p.set(i as u32, op);
        }
        Ok(p)
    }
}

/// A weighted sum of Pauli strings on a fixed register.
#[derive(Debug, Clone, PartialEq)]
pub struct SparsePauliOp {
    num_qubits: u32,
    terms: FxHashMap<PauliString, Complex64>,
}

impl SparsePauliOp {
    /// The zero operator.
    pub fn zero(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            terms: FxHashMap::default(),
        }
    }

    /// `coeff · I`.
    pub fn identity(num_qubits: u32, coeff: f64) -> IrResult<Self> {
        let mut op = Self::zero(num_qubits);
        op.add_term(PauliString::identity(num_qubits)?, Complex64::new(coeff, 0.0))?;
        Ok(op)
    }

    /// Build from `(label, real coefficient)` pairs.
    pub fn from_labels<'a>(terms: impl IntoIterator<Item = (&'a str, f64)>) -> IrResult<Self> {
        let mut op: Option<Self> = None;
        for (label, coeff) in terms {
            let p: PauliString = label.parse()?;
            let target = op.get_or_insert_with(|| Self::zero(p.num_qubits()));
            target.add_term(p, Complex64::new(coeff, 0.0))?;
        }
        op.ok_or_else(|| IrError::InvalidArgument("no terms given".into()))
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Number of stored terms.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Accumulate `coeff · pauli`.
    pub fn add_term(&mut self, pauli: PauliString, coeff: Complex64) -> IrResult<()> {
        if pauli.num_qubits() != self.num_qubits {
            return Err(IrError::InvalidArgument(format!(
                "term on {} qubits added to a {}-qubit operator",
                pauli.num_qubits(),
                self.num_qubits
            )));
        }
        *self.terms.entry(pauli).or_insert(Complex64::new(0.0, 0.0)) += coeff;
        Ok(())
    }

    /// Coefficient of `pauli`, zero if absent.
    pub fn coefficient(&self, pauli: &PauliString) -> Complex64 {
        self.terms.get(pauli).copied().unwrap_or_default()
    }

    /// Real part of the identity coefficient.
    pub fn identity_coefficient(&self) -> f64 {
        self.terms
            .iter()
            .find(|(p, _)| p.is_identity())
            .map_or(0.0, |(_, c)| c.re)
    }

    /// Terms sorted by Pauli string, for stable output.
    pub fn terms(&self) -> Vec<(PauliString, Complex64)> {
        let mut out: Vec<_> = self.terms.iter().map(|(p, c)| (*p, *c)).collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// `self + other`.
    pub fn add(&self, other: &SparsePauliOp) -> IrResult<SparsePauliOp> {
        let mut out = self.clone();
        for (p, c) in &other.terms {
            out.add_term(*p, *c)?;
        }
        Ok(out)
    }

    /// `factor · self`.
    #[must_use]
    pub fn scale(&self, factor: Complex64) -> SparsePauliOp {
        SparsePauliOp {
            num_qubits: self.num_qubits,
            terms: self.terms.iter().map(|(p, c)| (*p, c * factor)).collect(),
        }
    }

    /// Operator product `self · other`.
    pub fn compose(&self, other: &SparsePauliOp) -> IrResult<SparsePauliOp> {
        if self.num_qubits != other.num_qubits {
            return Err(IrError::InvalidArgument(format!(
                "cannot compose {}-qubit and {}-qubit operators",
                self.num_qubits, other.num_qubits
            )));
        }
        let mut out = SparsePauliOp::zero(self.num_qubits);
        for (pa, ca) in &self.terms {
            for (pb, cb) in &other.terms {
                let (phase, p) = pa.compose(pb);
                out.add_term(p, phase * ca * cb)?;
            }
        }
        Ok(out)
    }

    /// Drop terms whose coefficient magnitude is at most `tol`.
    #[must_use]
    pub fn simplify(&self, tol: f64) -> SparsePauliOp {
        SparsePauliOp {
            num_qubits: self.num_qubits,
            terms: self
                .terms
                .iter()
                .filter(|(_, c)| c.norm() > tol)
                .map(|(p, c)| (*p, *c))
                .collect(),
        }
    }

    /// Check that every coefficient is real within `tol`.
    pub fn is_hermitian(&self, tol: f64) -> bool {
        self.terms.values().all(|c| c.im.abs() <= tol)
    }

    /// Apply `Σ c_k P_k` to a dense state vector.
    pub fn apply(&self, state: &[Complex64]) -> Vec<Complex64> {
        let mut out = vec![Complex64::new(0.0, 0.0); state.len()];
        for (p, c) in &self.terms {
            for (basis, amp) in state.iter().enumerate() {
                let (phase, target) = p.apply_to_basis(basis);
                out[target] += c * phase * amp;
            }
        }
        out
    }
}

impl fmt::Display for SparsePauliOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms = self.terms();
        if terms.is_empty() {
            return write!(f, "0");
        }
        for (i, (p, c)) in terms.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            if c.im.abs() > 1e-12 {
                write!(f, "({:+.8}{:+.8}i) * {p}", c.re, c.im)?;
            } else {
                write!(f, "{:+.8} * {p}", c.re)?;
            }
        }
        Ok(())
    }
}

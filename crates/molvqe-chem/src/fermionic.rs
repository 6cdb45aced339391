//! Second-quantized fermionic operators.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::driver::ElectronicStructureProblem;

/// Coefficients at or below this magnitude are dropped when building from integrals.
pub const INTEGRAL_THRESHOLD: f64 = 1e-12;

/// Creation or annihilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ladder {
    /// `a†`
    Create,
    /// `a`
    Annihilate,
}

/// `coeff · op_1 op_2 … op_k`, applied right to left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FermionicTerm {
    /// Real coefficient.
    pub coeff: f64,
    /// `(mode, ladder)` factors in written order.
    pub ops: Vec<(usize, Ladder)>,
}

/// A sum of products of ladder operators over a fixed number of modes.
///
/// Spin orbitals use block ordering: modes `0..n` are spin-up orbitals and
/// `n..2n` are spin-down copies of the same spatial orbitals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FermionicOp {
    num_modes: usize,
    terms: Vec<FermionicTerm>,
}

impl FermionicOp {
    /// Empty operator on `num_modes` modes.
    pub fn new(num_modes: usize) -> Self {
        Self {
            num_modes,
            terms: Vec::new(),
        }
    }

    /// Electronic Hamiltonian `Σ h_pq a†_p a_q + ½ Σ (pq|rs) a†_p a†_r a_s a_q`.
    ///
    /// The constant energy of the problem is not included.
    pub fn from_problem(problem: &ElectronicStructureProblem) -> Self {
        let n = problem.num_spatial_orbitals;
        let mut op = Self::new(2 * n);
        let spatial = |mode: usize| mode % n;
        let same_spin = |a: usize, b: usize| a / n == b / n;

        for p in 0..2 * n {
            for q in 0..2 * n {
                if !same_spin(p, q) {
                    continue;
                }
                let h = problem.one_body[(spatial(p), spatial(q))];
                if h.abs() > INTEGRAL_THRESHOLD {
                    op.push(h, vec![(p, Ladder::Create), (q, Ladder::Annihilate)]);
                }
            }
        }

        for p in 0..2 * n {
            for q in (0..2 * n).filter(|&q| same_spin(p, q)) {
                for r in 0..2 * n {
                    for s in (0..2 * n).filter(|&s| same_spin(r, s)) {
                        // a†_p a†_p vanishes
                        if p == r || q == s {
                            continue;
                        }
                        let g = problem
                            .two_body
                            .get(spatial(p), spatial(q), spatial(r), spatial(s));
                        if g.abs() > INTEGRAL_THRESHOLD {
                            op.push(
                                0.5 * g,
                                vec![
                                    (p, Ladder::Create),
                                    (r, Ladder::Create),
                                    (s, Ladder::Annihilate),
                                    (q, Ladder::Annihilate),
                                ],
                            );
                        }
                    }
                }
            }
        }
        op
    }

    /// Append `coeff · ops`.
    pub fn push(&mut self, coeff: f64, ops: Vec<(usize, Ladder)>) {
        self.terms.push(FermionicTerm { coeff, ops });
    }

    /// Number of modes.
    pub fn num_modes(&self) -> usize {
        self.num_modes
    }

    /// Stored terms.
    pub fn terms(&self) -> &[FermionicTerm] {
        &self.terms
    }

    /// Number of stored terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check whether there are no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl fmt::Display for FermionicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:+.8} *", term.coeff)?;
            for (mode, ladder) in &term.ops {
                let sign = match ladder {
                    Ladder::Create => '+',
                    Ladder::Annihilate => '-',
                };
                write!(f, " {sign}_{mode}")?;
            }
        }
        Ok(())
    }
}

//! Active-space reduction: frozen core and removed virtual orbitals.

use tracing::debug;

use crate::driver::ElectronicStructureProblem;
use crate::error::{ChemError, ChemResult};

/// Shrinks a problem by freezing core orbitals and dropping unwanted virtuals.
///
/// Orbital indices in `remove_orbitals` refer to the full problem; negative
/// values count from the end, so `-1` is the highest orbital.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSpaceTransformer {
    /// Fold the core orbitals of each atom into a constant.
    pub freeze_core: bool,
    /// Orbitals to drop.
    pub remove_orbitals: Vec<isize>,
}

impl ActiveSpaceTransformer {
    /// Create a transformer.
    pub fn new(freeze_core: bool, remove_orbitals: Vec<isize>) -> Self {
        Self {
            freeze_core,
            remove_orbitals,
        }
    }

    /// Check whether the transformer leaves problems unchanged.
    pub fn is_identity(&self) -> bool {
        !self.freeze_core && self.remove_orbitals.is_empty()
    }

    fn resolve(&self, n: usize) -> ChemResult<Vec<usize>> {
        let mut resolved = Vec::with_capacity(self.remove_orbitals.len());
        for &index in &self.remove_orbitals {
            let absolute = if index < 0 {
                n.checked_sub(index.unsigned_abs())
            } else {
                usize::try_from(index).ok().filter(|&i| i < n)
            };
            let absolute = absolute.ok_or_else(|| {
                ChemError::InvalidActiveSpace(format!(
                    "orbital index {index} out of range for {n} orbitals"
                ))
            })?;
            if resolved.contains(&absolute) {
                return Err(ChemError::InvalidActiveSpace(format!(
                    "orbital {absolute} listed twice"
                )));
            }
            resolved.push(absolute);
        }
        Ok(resolved)
    }

    /// Apply the reduction.
    pub fn transform(&self, problem: &ElectronicStructureProblem) -> ChemResult<ElectronicStructureProblem> {
        let n = problem.num_spatial_orbitals;
        let frozen = if self.freeze_core { problem.core_orbitals } else { 0 };
        let occupied = problem.num_alpha.max(problem.num_beta);
        if frozen > problem.num_alpha.min(problem.num_beta) {
            return Err(ChemError::InvalidActiveSpace(format!(
                "cannot freeze {frozen} core orbitals with only {} electron pairs",
                problem.num_alpha.min(problem.num_beta)
            )));
        }

        let removed = self.resolve(n)?;
        for &orbital in &removed {
            if orbital < occupied {
                return Err(ChemError::InvalidActiveSpace(format!(
                    "orbital {orbital} is occupied and cannot be removed"
                )));
            }
        }

        let active: Vec<usize> = (frozen..n).filter(|p| !removed.contains(p)).collect();
        if active.is_empty() {
            return Err(ChemError::InvalidActiveSpace("no active orbitals left".into()));
        }

        let h = &problem.one_body;
        let g = &problem.two_body;
        let core: Vec<usize> = (0..frozen).collect();

        let mut core_energy = 0.0;
        for &i in &core {
            core_energy += 2.0 * h[(i, i)];
            for &j in &core {
                core_energy += 2.0 * g.get(i, i, j, j) - g.get(i, j, j, i);
            }
        }

        let one_body = nalgebra::DMatrix::from_fn(active.len(), active.len(), |a, b| {
            let (p, q) = (active[a], active[b]);
            let mut value = h[(p, q)];
            for &i in &core {
                value += 2.0 * g.get(p, q, i, i) - g.get(p, i, i, q);
            }
            value
        });

        debug!(
            frozen,
            removed = ?removed,
            active = active.len(),
            core_energy,
            "active space selected"
        );

        Ok(ElectronicStructureProblem {
            num_spatial_orbitals: active.len(),
            num_alpha: problem.num_alpha - frozen,
            num_beta: problem.num_beta - frozen,
            nuclear_repulsion: problem.nuclear_repulsion,
            one_body,
            two_body: g.select(&active),
            orbital_energies: active.iter().map(|&p| problem.orbital_energies[p]).collect(),
            hf_energy: problem.hf_energy,
            constant_shift: problem.constant_shift + core_energy,
            core_orbitals: 0,
        })
    }
}

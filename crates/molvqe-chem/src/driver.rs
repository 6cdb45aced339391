//! Restricted Hartree–Fock driver and the electronic-structure problem it produces.

use nalgebra::DMatrix;
use tracing::{debug, info, instrument};

use crate::basis::sto3g;
use crate::error::{ChemError, ChemResult};
use crate::integrals::{AtomicIntegrals, TwoElectronIntegrals};
use crate::molecule::Molecule;

/// Molecular-orbital integrals plus the bookkeeping needed to build a Hamiltonian.
///
/// The electronic Hamiltonian in this orbital basis is
/// `Σ h_pq a†_p a_q + ½ Σ (pq|rs) a†_p a†_r a_s a_q`; the total energy adds
/// [`constant_energy`](Self::constant_energy).
#[derive(Debug, Clone)]
pub struct ElectronicStructureProblem {
    /// Spatial orbitals in the problem.
    pub num_spatial_orbitals: usize,
    /// Spin-up electrons.
    pub num_alpha: usize,
    /// Spin-down electrons.
    pub num_beta: usize,
    /// Nuclear repulsion energy.
    pub nuclear_repulsion: f64,
    /// One-electron integrals `h_pq` in the MO basis.
    pub one_body: DMatrix<f64>,
    /// Two-electron integrals `(pq|rs)` in the MO basis.
    pub two_body: TwoElectronIntegrals,
    /// Orbital energies, ascending.
    pub orbital_energies: Vec<f64>,
    /// Total Hartree–Fock energy.
    pub hf_energy: f64,
    /// Energy of orbitals folded out of the problem (frozen core).
    pub constant_shift: f64,
    /// Lowest orbitals that count as core.
    pub core_orbitals: usize,
}

impl ElectronicStructureProblem {
    /// `(num_alpha, num_beta)`.
    pub fn num_particles(&self) -> (usize, usize) {
        (self.num_alpha, self.num_beta)
    }

    /// Twice the spatial orbital count.
    pub fn num_spin_orbitals(&self) -> usize {
        2 * self.num_spatial_orbitals
    }

    /// Energy added to electronic eigenvalues to get total energies.
    pub fn constant_energy(&self) -> f64 {
        self.nuclear_repulsion + self.constant_shift
    }

    /// Energy of the closed-shell determinant filling the lowest orbitals.
    pub fn reference_energy(&self) -> f64 {
        let h = &self.one_body;
        let g = &self.two_body;
        let occupied = self.num_alpha.min(self.num_beta);
        let mut energy = 0.0;
        for i in 0..occupied {
            energy += 2.0 * h[(i, i)];
            for j in 0..occupied {
                energy += 2.0 * g.get(i, i, j, j) - g.get(i, j, j, i);
            }
        }
        energy + self.constant_energy()
    }
}

/// Produces an [`ElectronicStructureProblem`] from a geometry.
pub trait MolecularDriver {
    /// Driver name.
    fn name(&self) -> &str;

    /// Run the driver.
    fn run(&self, molecule: &Molecule) -> ChemResult<ElectronicStructureProblem>;
}

/// Restricted closed-shell Hartree–Fock in the STO-3G basis.
#[derive(Debug, Clone)]
pub struct HartreeFockDriver {
    max_iterations: usize,
    tolerance: f64,
    damping: f64,
}

impl Default for HartreeFockDriver {
    fn default() -> Self {
        Self {
            max_iterations: 128,
            tolerance: 1e-10,
            damping: 0.0,
        }
    }
}

impl HartreeFockDriver {
    /// Driver with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap on SCF iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Energy convergence threshold in Hartree.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Fraction of the previous density mixed into each new one, in `[0, 1)`.
    #[must_use]
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping.clamp(0.0, 0.99);
        self
    }
}

/// Eigen-decomposition with eigenvalues ascending and eigenvectors as matching columns.
fn sorted_eigen(matrix: DMatrix<f64>) -> (Vec<f64>, DMatrix<f64>) {
    let n = matrix.nrows();
    let eigen = matrix.symmetric_eigen();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));
    let values = order.iter().map(|&i| eigen.eigenvalues[i]).collect();
    let vectors = DMatrix::from_fn(n, n, |r, c| eigen.eigenvectors[(r, order[c])]);
    (values, vectors)
}

/// `S^{-1/2}`.
fn symmetric_orthogonalizer(overlap: &DMatrix<f64>) -> ChemResult<DMatrix<f64>> {
    let (values, vectors) = sorted_eigen(overlap.clone());
    let smallest = values.first().copied().unwrap_or(0.0);
    if smallest < 1e-8 {
        return Err(ChemError::LinearDependence(smallest));
    }
    let inv_sqrt = DMatrix::from_diagonal(&nalgebra::DVector::from_iterator(
        values.len(),
        values.iter().map(|v| 1.0 / v.sqrt()),
    ));
    Ok(&vectors * inv_sqrt * vectors.transpose())
}

/// Two-electron part of the closed-shell Fock matrix.
fn two_electron_fock(density: &DMatrix<f64>, eri: &TwoElectronIntegrals) -> DMatrix<f64> {
    let n = density.nrows();
    DMatrix::from_fn(n, n, |mu, nu| {
        let mut g = 0.0;
        for lam in 0..n {
            for sig in 0..n {
                g += density[(lam, sig)] * (eri.get(mu, nu, lam, sig) - 0.5 * eri.get(mu, lam, nu, sig));
            }
        }
        g
    })
}

/// `P = 2 Σ_occ C C^T`.
fn closed_shell_density(coefficients: &DMatrix<f64>, occupied: usize) -> DMatrix<f64> {
    let c_occ = coefficients.columns(0, occupied);
    (&c_occ * c_occ.transpose()) * 2.0
}

impl MolecularDriver for HartreeFockDriver {
    fn name(&self) -> &str {
        "rhf/sto-3g"
    }

    #[instrument(skip(self, molecule), fields(molecule = %molecule))]
    fn run(&self, molecule: &Molecule) -> ChemResult<ElectronicStructureProblem> {
        molecule.validate()?;
        let electrons = molecule.num_electrons()?;
        if electrons % 2 != 0 || molecule.multiplicity != 1 {
            return Err(ChemError::UnsupportedSpin {
                electrons,
                multiplicity: molecule.multiplicity,
            });
        }
        let occupied = electrons / 2;

        let basis = sto3g(molecule);
        let n = basis.len();
        if occupied > n {
            return Err(ChemError::InvalidGeometry(format!(
                "{electrons} electrons do not fit in {n} orbitals"
            )));
        }
        let integrals = AtomicIntegrals::compute(&basis, molecule);
        let h_core = integrals.core_hamiltonian();
        let x = symmetric_orthogonalizer(&integrals.overlap)?;
        let nuclear_repulsion = molecule.nuclear_repulsion();
        debug!(basis_functions = n, electrons, nuclear_repulsion, "integrals ready");

        let roothaan = |fock: &DMatrix<f64>| {
            let (energies, c_prime) = sorted_eigen(x.transpose() * fock * &x);
            (energies, &x * c_prime)
        };

        let mut density = DMatrix::zeros(n, n);
        let mut previous = 0.0;
        let mut delta = f64::INFINITY;
        for iteration in 1..=self.max_iterations {
            let fock = &h_core + two_electron_fock(&density, &integrals.repulsion);
            let (_, coefficients) = roothaan(&fock);
            let mut next = closed_shell_density(&coefficients, occupied);
            if self.damping > 0.0 && iteration > 1 {
                next = next * (1.0 - self.damping) + &density * self.damping;
            }

            let fock_next = &h_core + two_electron_fock(&next, &integrals.repulsion);
            let electronic = 0.5 * next.component_mul(&(&h_core + &fock_next)).sum();
            let rms = (&next - &density).norm() / n as f64;
            delta = (electronic - previous).abs();
            density = next;
            previous = electronic;
            debug!(iteration, energy = electronic + nuclear_repulsion, delta, rms, "scf step");

            if delta < self.tolerance && rms < self.tolerance.sqrt() {
                let (orbital_energies, coefficients) = roothaan(&fock_next);
                let hf_energy = electronic + nuclear_repulsion;
                info!(iterations = iteration, hf_energy, "SCF converged");
                return Ok(ElectronicStructureProblem {
                    num_spatial_orbitals: n,
                    num_alpha: occupied,
                    num_beta: occupied,
                    nuclear_repulsion,
                    one_body: coefficients.transpose() * &h_core * &coefficients,
                    two_body: integrals.repulsion.transform(&coefficients),
                    orbital_energies,
                    hf_energy,
                    constant_shift: 0.0,
                    core_orbitals: molecule.core_orbitals(),
                });
            }
        }

        Err(ChemError::ScfNotConverged {
            iterations: self.max_iterations,
            delta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_h2_hartree_fock() {
        let problem = HartreeFockDriver::new().run(&Molecule::h2(0.735)).unwrap();
        assert_eq!(problem.num_spatial_orbitals, 2);
        assert_eq!(problem.num_particles(), (1, 1));
        assert!((problem.hf_energy + 1.116_999).abs() < 1e-5);
        assert!((problem.orbital_energies[0] + 0.580_629).abs() < 1e-5);
        assert!((problem.reference_energy() - problem.hf_energy).abs() < 1e-9);
    }

    #[test]
    fn test_lih_hartree_fock() {
        let problem = HartreeFockDriver::new().run(&Molecule::lih(1.5474)).unwrap();
        assert_eq!(problem.num_spatial_orbitals, 6);
        assert_eq!(problem.core_orbitals, 1);
        assert!((problem.hf_energy + 7.863_114).abs() < 1e-5);
        // π pair is degenerate
        assert!((problem.orbital_energies[3] - problem.orbital_energies[4]).abs() < 1e-8);
        assert!((problem.reference_energy() - problem.hf_energy).abs() < 1e-8);
    }

    #[test]
    fn test_open_shell_rejected() {
        let err = HartreeFockDriver::new()
            .run(&Molecule::h2(0.74).with_charge(1))
            .unwrap_err();
        assert!(matches!(err, ChemError::UnsupportedSpin { electrons: 1, .. }));
    }

    #[test]
    fn test_iteration_cap() {
        let err = HartreeFockDriver::new()
            .with_max_iterations(1)
            .run(&Molecule::lih(1.5474))
            .unwrap_err();
        assert!(matches!(err, ChemError::ScfNotConverged { iterations: 1, .. }));
    }
}

//! Exact diagonalization of qubit operators.

use nalgebra::DMatrix;
use num_complex::Complex64;
use tracing::{debug, instrument};

use molvqe_ir::SparsePauliOp;

use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Largest operator the eigensolver will densify.
pub const MAX_EIGEN_QUBITS: u32 = 12;

/// Lowest eigenpair of an operator.
#[derive(Debug, Clone)]
pub struct EigenResult {
    /// Lowest eigenvalue.
    pub eigenvalue: f64,
    /// A normalized eigenvector for `eigenvalue`.
    pub eigenstate: Statevector,
}

/// Dense Hermitian eigensolver used as the reference for VQE runs.
#[derive(Debug, Clone, Copy)]
pub struct ExactEigensolver {
    max_qubits: u32,
}

impl Default for ExactEigensolver {
    fn default() -> Self {
        Self {
            max_qubits: MAX_EIGEN_QUBITS,
        }
    }
}

impl ExactEigensolver {
    /// Create an eigensolver with the default qubit limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowest eigenvalue and its eigenvector.
    #[instrument(skip(self, op), fields(num_qubits = op.num_qubits(), num_terms = op.num_terms()))]
    pub fn ground_state(&self, op: &SparsePauliOp) -> SimResult<EigenResult> {
        let matrix = self.to_matrix(op)?;
        let eigen = matrix.symmetric_eigen();
        let (index, eigenvalue) = eigen
            .eigenvalues
            .iter()
            .copied()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or(SimError::TooManyQubits {
                requested: op.num_qubits(),
                max: self.max_qubits,
            })?;
        let vector: Vec<Complex64> = eigen.eigenvectors.column(index).iter().copied().collect();
        debug!(eigenvalue, "exact ground state");
        Ok(EigenResult {
            eigenvalue,
            eigenstate: Statevector::from_amplitudes(vector),
        })
    }

    /// The `k` lowest eigenvalues in ascending order.
    pub fn eigenvalues(&self, op: &SparsePauliOp, k: usize) -> SimResult<Vec<f64>> {
        let mut values: Vec<f64> = self.to_matrix(op)?.symmetric_eigenvalues().iter().copied().collect();
        values.sort_by(f64::total_cmp);
        values.truncate(k);
        Ok(values)
    }

    /// Dense matrix of `op` in the computational basis.
    pub fn to_matrix(&self, op: &SparsePauliOp) -> SimResult<DMatrix<Complex64>> {
        if op.num_qubits() > self.max_qubits {
            return Err(SimError::TooManyQubits {
                requested: op.num_qubits(),
                max: self.max_qubits,
            });
        }
        if !op.is_hermitian(1e-10) {
            return Err(SimError::NonHermitian);
        }
        let dim = 1usize << op.num_qubits();
        let mut matrix = DMatrix::<Complex64>::zeros(dim, dim);
        for (pauli, coeff) in op.terms() {
            for col in 0..dim {
                let (phase, row) = pauli.apply_to_basis(col);
                matrix[(row, col)] += coeff * phase;
            }
        }
        Ok(matrix)
    }
}

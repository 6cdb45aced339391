//! Error types for the chemistry pipeline.

use molvqe_ir::IrError;
use thiserror::Error;

/// Errors that can occur while building or mapping a molecular Hamiltonian.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChemError {
    /// Geometry string or atom list could not be understood.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// No basis data for this element.
    #[error("Unsupported element '{0}' (supported: H, He, Li, Be)")]
    UnsupportedElement(String),

    /// Only closed-shell singlets are handled by the restricted driver.
    #[error("Unsupported spin state: {electrons} electrons with multiplicity {multiplicity}")]
    UnsupportedSpin {
        /// Electron count after applying the charge.
        electrons: usize,
        /// Requested spin multiplicity.
        multiplicity: u32,
    },

    /// SCF iterations did not settle.
    #[error("SCF did not converge after {iterations} iterations (last energy change {delta:.3e})")]
    ScfNotConverged {
        /// Iterations performed.
        iterations: usize,
        /// Energy change in the final iteration.
        delta: f64,
    },

    /// Overlap matrix is numerically singular.
    #[error("Basis is linearly dependent (smallest overlap eigenvalue {0:.3e})")]
    LinearDependence(f64),

    /// Active-space selection is inconsistent with the problem.
    #[error("Invalid active space: {0}")]
    InvalidActiveSpace(String),

    /// Operator does not respect the symmetry being tapered.
    #[error("Symmetry violation: {0}")]
    SymmetryViolation(String),

    /// Caller violated a precondition.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// IR error.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for chemistry operations.
pub type ChemResult<T> = Result<T, ChemError>;

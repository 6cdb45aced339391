//! Error types for the VQE workflow.

use molvqe_chem::ChemError;
use molvqe_compile::CompileError;
use molvqe_ir::IrError;
use molvqe_sim::SimError;
use thiserror::Error;

/// Errors raised while building, optimizing or scoring a run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoreError {
    /// A precondition on an argument was violated.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Initial point does not match the ansatz.
    #[error("Ansatz has {expected} parameters but {got} values were given")]
    ParameterCountMismatch {
        /// Parameters in the ansatz.
        expected: usize,
        /// Values supplied.
        got: usize,
    },

    /// Circuit construction failed.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// Gate decomposition failed.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Estimator or eigensolver failed.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// Hamiltonian construction failed.
    #[error(transparent)]
    Chem(#[from] ChemError),

    /// Record export failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for workflow operations.
pub type CoreResult<T> = Result<T, CoreError>;

//! Error types for the compilation crate.

use molvqe_ir::IrError;
use thiserror::Error;

/// Errors raised while running compilation passes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// The circuit rejected a rewritten instruction.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// A translation pass ran without target basis gates.
    #[error("No basis gates set in the property set")]
    MissingBasisGates,

    /// A gate has no decomposition into the requested basis.
    #[error("Gate '{gate}' cannot be expressed in basis [{basis}]")]
    GateNotInBasis {
        /// Name of the gate.
        gate: String,
        /// Comma-separated target basis.
        basis: String,
    },
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;

//! Error types for the simulator.

use molvqe_ir::IrError;
use thiserror::Error;

/// Errors that can occur during simulation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// A gate still references a free parameter.
    #[error("Gate '{gate}' has unbound parameters; assign values before simulating")]
    UnboundParameter {
        /// Name of the offending gate.
        gate: String,
    },

    /// Register too large for dense simulation.
    #[error("{requested} qubits requested, at most {max} supported")]
    TooManyQubits {
        /// Requested register size.
        requested: u32,
        /// Limit of the simulator.
        max: u32,
    },

    /// Circuit and observable act on different registers.
    #[error("Circuit has {circuit} qubits but the observable acts on {observable}")]
    QubitCountMismatch {
        /// Circuit width.
        circuit: u32,
        /// Observable width.
        observable: u32,
    },

    /// Observable has complex coefficients.
    #[error("Observable is not Hermitian")]
    NonHermitian,

    /// Shot count of zero.
    #[error("Shot count must be positive")]
    InvalidShots,

    /// IR error.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;

//! Circuit intermediate representation for molecular VQE workflows.
//!
//! This crate holds the data structures every other `molvqe` crate speaks:
//! qubit indices, named parameters, gates, instructions, and the [`Circuit`]
//! builder. A circuit is an ordered list of instructions over a fixed qubit
//! register together with the free parameters those instructions reference.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] addresses a qubit in `[0, n)`
//! - **Parameters**: [`Parameter`] (named, with a unique identity) and
//!   [`ParameterExpression`] for symbolic rotation angles
//! - **Gates**: [`StandardGate`] for the built-in gate set
//! - **Instructions**: [`Instruction`] combining a gate or barrier with operands
//! - **Circuit**: [`Circuit`] with a fluent builder API
//! - **Observables**: [`PauliString`] and [`SparsePauliOp`] for qubit
//!   Hamiltonians
//!
//! # Example: Building an entangled pair
//!
//! ```rust
//! use molvqe_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.num_nonlocal_gates(), 1);
//! ```
//!
//! # Example: Parameterized circuit
//!
//! ```rust
//! use molvqe_ir::{Circuit, Parameter, QubitId};
//! use std::f64::consts::PI;
//!
//! let mut circuit = Circuit::with_size("variational", 1);
//! let theta = Parameter::new("theta");
//! circuit.rx(&theta, QubitId(0)).unwrap();
//! assert_eq!(circuit.num_parameters(), 1);
//!
//! let bound = circuit.assign_parameters(&[PI / 4.0]).unwrap();
//! assert!(!bound.is_parameterized());
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg`, `T`, `Tdg` | 1 | Phase gates |
//! | `SX`, `SXdg` | 1 | Square root of X and its inverse |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Rotation and phase gates |
//! | `U` | 1 | Universal single-qubit gate U(θ,φ,λ) |
//! | `CX` | 2 | Controlled-NOT (CNOT) |
//! | `CY`, `CZ` | 2 | Controlled-Y and Controlled-Z |
//! | `Swap` | 2 | SWAP gate |
//! | `RXX`, `RYY`, `RZZ` | 2 | Two-qubit Pauli rotations |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod parameter;
pub mod pauli;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use parameter::{Parameter, ParameterBinding, ParameterExpression};
pub use pauli::{Pauli, PauliString, SparsePauliOp};
pub use qubit::QubitId;

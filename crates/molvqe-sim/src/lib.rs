//! Simulation backends for molecular VQE.
//!
//! - [`Statevector`]: dense little-endian state simulation of bound circuits
//! - [`StatevectorEstimator`]: the [`Estimator`] used inside the VQE loop,
//!   exact or shot-sampled with a seeded RNG
//! - [`ExactEigensolver`]: dense diagonalization giving the reference energy
//!
//! # Example
//!
//! ```rust
//! use molvqe_ir::{Circuit, Parameter, QubitId, SparsePauliOp};
//! use molvqe_sim::{Estimator, ExactEigensolver, StatevectorEstimator};
//!
//! let op = SparsePauliOp::from_labels([("Z", 1.0), ("X", 1.0)]).unwrap();
//!
//! let mut circuit = Circuit::with_size("ry", 1);
//! circuit.ry(&Parameter::new("theta"), QubitId(0)).unwrap();
//!
//! let mut estimator = StatevectorEstimator::exact();
//! let e = estimator.estimate(&circuit, &[0.0], &op).unwrap();
//! assert!((e.mean - 1.0).abs() < 1e-12);
//!
//! let exact = ExactEigensolver::new().ground_state(&op).unwrap();
//! assert!((exact.eigenvalue + 2.0_f64.sqrt()).abs() < 1e-10);
//! ```

pub mod eigensolver;
pub mod error;
pub mod estimator;
pub mod statevector;

pub use eigensolver::{EigenResult, ExactEigensolver, MAX_EIGEN_QUBITS};
pub use error::{SimError, SimResult};
pub use estimator::{Estimate, Estimator, StatevectorEstimator};
pub use statevector::{MAX_SIM_QUBITS, Statevector};

//! Ansatz construction, the VQE loop and run scoring.
//!
//! The two pieces every run is built around:
//!
//! - [`AnsatzBuilder`] lays out rotation layers around a linear CNOT ladder
//! - [`ScoreEvaluator`] compares the optimized energy with the exact one and
//!   scores the run by its two-qubit gate count
//!
//! [`Vqe`] connects an [`Estimator`](molvqe_sim::Estimator) with an
//! [`Optimizer`], reporting each evaluation to a caller-owned
//! [`ConvergenceHistory`]. [`Experiment`] runs the whole workflow from a
//! [`Molecule`](molvqe_chem::Molecule) to a [`RunRecord`].
//!
//! # Example
//!
//! ```rust
//! use molvqe_core::{AnsatzBuilder, RotationAxis, ScoreEvaluator};
//!
//! let ansatz = AnsatzBuilder::build(4, &[RotationAxis::Z, RotationAxis::Y, RotationAxis::X], &[]).unwrap();
//! assert_eq!(ansatz.num_parameters(), 18);
//! assert_eq!(ansatz.num_nonlocal_gates(), 3);
//!
//! let score = ScoreEvaluator::evaluate(-7.8790, -7.8815, 3, 18, 4.0);
//! assert!(score.passed);
//! assert_eq!(score.score, 3);
//! ```

pub mod ansatz;
pub mod error;
pub mod experiment;
pub mod history;
pub mod optimizers;
pub mod score;
pub mod vqe;

pub use ansatz::{AnsatzBuilder, RotationAxis, parse_axes};
pub use error::{CoreError, CoreResult};
pub use experiment::{Experiment, ExperimentConfig, ExperimentOutcome, PreparedProblem};
pub use history::{ConvergenceHistory, EvaluationRecord};
pub use optimizers::{Cobyla, Objective, OptimizationResult, Optimizer, OptimizerKind, Spsa};
pub use score::{DEFAULT_ACCURACY_THRESHOLD_MHA, RunLabels, RunRecord, Score, ScoreEvaluator};
pub use vqe::{Vqe, VqeResult};

//! Classical optimizers driving the VQE loop.
//!
//! Objectives are fallible: the first error returned by the objective stops
//! the optimizer and is passed through unchanged.

mod cobyla;
mod spsa;

pub use cobyla::Cobyla;
pub use spsa::Spsa;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Objective called once per evaluation.
pub type Objective<'a> = dyn FnMut(&[f64]) -> CoreResult<f64> + 'a;

/// Result of an optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Optimal parameter values.
    pub optimal_params: Vec<f64>,
    /// Optimal objective value.
    pub optimal_value: f64,
    /// Number of function evaluations.
    pub num_evaluations: usize,
    /// Number of iterations.
    pub num_iterations: usize,
    /// Best value after each improving iteration.
    pub history: Vec<f64>,
    /// Whether the optimization converged.
    pub converged: bool,
}

/// Derivative-free minimizer.
pub trait Optimizer: Send + Sync {
    /// Optimizer name.
    fn name(&self) -> &'static str;

    /// Minimize `objective` starting from `initial_params`.
    fn minimize(
        &self,
        objective: &mut Objective<'_>,
        initial_params: Vec<f64>,
    ) -> CoreResult<OptimizationResult>;
}

/// Optimizer selector for configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    /// [`Cobyla`]
    #[default]
    Cobyla,
    /// [`Spsa`]
    Spsa,
}

impl OptimizerKind {
    /// Build the optimizer with an iteration cap and RNG seed.
    pub fn build(self, maxiter: usize, seed: u64) -> Box<dyn Optimizer> {
        match self {
            OptimizerKind::Cobyla => Box::new(Cobyla::new().with_maxiter(maxiter)),
            OptimizerKind::Spsa => Box::new(Spsa::new().with_maxiter(maxiter).with_seed(seed)),
        }
    }

    /// Stable name.
    pub fn name(self) -> &'static str {
        match self {
            OptimizerKind::Cobyla => "cobyla",
            OptimizerKind::Spsa => "spsa",
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptimizerKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cobyla" => Ok(OptimizerKind::Cobyla),
            "spsa" => Ok(OptimizerKind::Spsa),
            other => Err(CoreError::InvalidArgument(format!(
                "unknown optimizer '{other}' (expected cobyla or spsa)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [OptimizerKind::Cobyla, OptimizerKind::Spsa] {
            assert_eq!(kind.to_string().parse::<OptimizerKind>().unwrap(), kind);
            assert_eq!(kind.build(10, 0).name(), kind.name());
        }
        assert!("adam".parse::<OptimizerKind>().is_err());
    }

    #[test]
    fn test_objective_error_propagates() {
        for kind in [OptimizerKind::Cobyla, OptimizerKind::Spsa] {
            let mut calls = 0;
            let mut objective = |_: &[f64]| {
                calls += 1;
                if calls > 3 {
                    Err(CoreError::InvalidArgument("backend down".into()))
                } else {
                    Ok(1.0)
                }
            };
            let err = kind.build(50, 1).minimize(&mut objective, vec![0.0; 2]);
            assert!(matches!(err, Err(CoreError::InvalidArgument(_))));
        }
    }
}

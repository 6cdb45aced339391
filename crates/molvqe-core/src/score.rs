//! Scoring of a finished VQE run against the exact reference energy.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CoreResult;

/// Default accuracy bound in milli-Hartree.
pub const DEFAULT_ACCURACY_THRESHOLD_MHA: f64 = 4.0;

/// Error, pass flag and gate-count score of one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// `(optimized − exact) · 1000`.
    pub error_mha: f64,
    /// `error_mha ≤ threshold`. Bounded from above only: any negative error passes.
    pub passed: bool,
    /// Two-qubit gate count; lower is better.
    pub score: usize,
    /// Free parameters in the ansatz.
    pub parameter_count: usize,
}

impl Score {
    /// Check `|error_mha| ≤ threshold_mha`.
    ///
    /// Reported alongside [`passed`](Self::passed), never in place of it.
    pub fn within_symmetric(&self, threshold_mha: f64) -> bool {
        self.error_mha.abs() <= threshold_mha
    }
}

/// Stateless scoring functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreEvaluator;

impl ScoreEvaluator {
    /// Score a run. Energies must share a unit (Hartree).
    pub fn evaluate(
        optimized_energy: f64,
        exact_energy: f64,
        two_qubit_gate_count: usize,
        parameter_count: usize,
        accuracy_threshold_mha: f64,
    ) -> Score {
        let error_mha = (optimized_energy - exact_energy) * 1000.0;
        Score {
            error_mha,
            passed: error_mha <= accuracy_threshold_mha,
            score: two_qubit_gate_count,
            parameter_count,
        }
    }

    /// Score a run and wrap it with the run's identifying labels.
    pub fn record(
        labels: RunLabels,
        optimized_energy: f64,
        exact_energy: f64,
        two_qubit_gate_count: usize,
        parameter_count: usize,
        accuracy_threshold_mha: f64,
    ) -> RunRecord {
        let score = Self::evaluate(
            optimized_energy,
            exact_energy,
            two_qubit_gate_count,
            parameter_count,
            accuracy_threshold_mha,
        );
        RunRecord {
            optimizer: labels.optimizer,
            mapping: labels.mapping,
            ansatz: labels.ansatz,
            final_energy: optimized_energy,
            exact_energy,
            error_mha: score.error_mha,
            passed: score.passed,
            parameter_count,
            two_qubit_gate_count,
            score: score.score,
        }
    }
}

/// Names identifying the configuration behind a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunLabels {
    /// Optimizer name.
    pub optimizer: String,
    /// Fermion-to-qubit mapping name.
    pub mapping: String,
    /// Ansatz label.
    pub ansatz: String,
}

/// Immutable summary of one completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct RunRecord {
    optimizer: String,
    mapping: String,
    ansatz: String,
    final_energy: f64,
    exact_energy: f64,
    error_mha: f64,
    passed: bool,
    parameter_count: usize,
    two_qubit_gate_count: usize,
    score: usize,
}

impl RunRecord {
    pub fn optimizer(&self) -> &str {
        &self.optimizer
    }

    pub fn mapping(&self) -> &str {
        &self.mapping
    }

    pub fn ansatz(&self) -> &str {
        &self.ansatz
    }

    /// Total VQE energy in Hartree.
    pub fn final_energy(&self) -> f64 {
        self.final_energy
    }

    /// Total exact energy in Hartree.
    pub fn exact_energy(&self) -> f64 {
        self.exact_energy
    }

    pub fn error_mha(&self) -> f64 {
        self.error_mha
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    pub fn two_qubit_gate_count(&self) -> usize {
        self.two_qubit_gate_count
    }

    pub fn score(&self) -> usize {
        self.score
    }

    /// See [`Score::within_symmetric`].
    pub fn within_symmetric(&self, threshold_mha: f64) -> bool {
        self.error_mha.abs() <= threshold_mha
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a record previously written by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the JSON form to `path`.
    pub fn write_json(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

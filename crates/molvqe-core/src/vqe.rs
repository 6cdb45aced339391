//! The variational loop: optimizer proposes parameters, estimator scores them.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use molvqe_ir::{Circuit, SparsePauliOp};
use molvqe_sim::Estimator;

use crate::error::{CoreError, CoreResult};
use crate::history::{ConvergenceHistory, EvaluationRecord};
use crate::optimizers::Optimizer;

/// Outcome of [`Vqe::compute_minimum_eigenvalue`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VqeResult {
    /// Lowest energy found, without any constant offset.
    pub optimal_value: f64,
    /// Parameters reaching `optimal_value`.
    pub optimal_params: Vec<f64>,
    /// Objective evaluations performed.
    pub num_evaluations: usize,
    /// Whether the optimizer met its convergence criterion.
    pub converged: bool,
}

/// Variational quantum eigensolver.
pub struct Vqe<E> {
    estimator: E,
    optimizer: Box<dyn Optimizer>,
}

impl<E: Estimator> Vqe<E> {
    /// Pair an estimator with an optimizer.
    pub fn new(estimator: E, optimizer: Box<dyn Optimizer>) -> Self {
        Self {
            estimator,
            optimizer,
        }
    }

    /// The optimizer in use.
    pub fn optimizer(&self) -> &dyn Optimizer {
        self.optimizer.as_ref()
    }

    /// Minimize `⟨ansatz|observable|ansatz⟩`, appending every evaluation to `history`.
    ///
    /// `initial_point` defaults to all zeros.
    pub fn compute_minimum_eigenvalue(
        &mut self,
        ansatz: &Circuit,
        observable: &SparsePauliOp,
        initial_point: Option<Vec<f64>>,
        history: &mut ConvergenceHistory,
    ) -> CoreResult<VqeResult> {
        self.compute_minimum_eigenvalue_with(ansatz, observable, initial_point, &mut |record| {
            history.push(record.clone());
        })
    }

    /// Like [`compute_minimum_eigenvalue`](Self::compute_minimum_eigenvalue),
    /// reporting each evaluation to `callback` instead.
    ///
    /// The callback runs synchronously between evaluations.
    #[instrument(skip_all, fields(optimizer = self.optimizer.name(), parameters = ansatz.num_parameters()))]
    pub fn compute_minimum_eigenvalue_with(
        &mut self,
        ansatz: &Circuit,
        observable: &SparsePauliOp,
        initial_point: Option<Vec<f64>>,
        callback: &mut dyn FnMut(&EvaluationRecord),
    ) -> CoreResult<VqeResult> {
        let expected = ansatz.num_parameters();
        let initial = initial_point.unwrap_or_else(|| vec![0.0; expected]);
        if initial.len() != expected {
            return Err(CoreError::ParameterCountMismatch {
                expected,
                got: initial.len(),
            });
        }

        let estimator = &mut self.estimator;
        let mut iteration = 0;
        let mut objective = |params: &[f64]| -> CoreResult<f64> {
            let estimate = estimator.estimate(ansatz, params, observable)?;
            iteration += 1;
            let record = EvaluationRecord {
                iteration,
                params: params.to_vec(),
                mean: estimate.mean,
                std: estimate.std,
            };
            debug!(iteration, mean = estimate.mean, std = estimate.std, "objective evaluated");
            callback(&record);
            Ok(estimate.mean)
        };

        let result = self.optimizer.minimize(&mut objective, initial)?;
        info!(
            energy = result.optimal_value,
            evaluations = result.num_evaluations,
            converged = result.converged,
            "VQE finished"
        );
        Ok(VqeResult {
            optimal_value: result.optimal_value,
            optimal_params: result.optimal_params,
            num_evaluations: result.num_evaluations,
            converged: result.converged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansatz::{AnsatzBuilder, RotationAxis};
    use crate::optimizers::Cobyla;
    use molvqe_sim::{ExactEigensolver, StatevectorEstimator};

    fn toy_hamiltonian() -> SparsePauliOp {
        SparsePauliOp::from_labels([("ZZ", 0.5), ("XI", -0.8), ("IX", 0.3), ("II", -0.2)]).unwrap()
    }

    #[test]
    fn test_reaches_ground_state() {
        let op = toy_hamiltonian();
        let ansatz = AnsatzBuilder::build(2, &[RotationAxis::Y], &[RotationAxis::Y]).unwrap();
        let mut vqe = Vqe::new(StatevectorEstimator::exact(), Box::new(Cobyla::new()));
        let mut history = ConvergenceHistory::new();

        let result = vqe
            .compute_minimum_eigenvalue(&ansatz, &op, None, &mut history)
            .unwrap();
        let exact = ExactEigensolver::new().ground_state(&op).unwrap().eigenvalue;

        assert!(result.optimal_value >= exact - 1e-9);
        assert!(result.optimal_value - exact < 1e-3, "{} vs {exact}", result.optimal_value);
        assert_eq!(history.len(), result.num_evaluations);
        assert_eq!(history.iter().next().unwrap().iteration, 1);
        assert!(history.iter().all(|r| r.std == 0.0 && r.params.len() == 6));
    }

    #[test]
    fn test_initial_point_length_checked() {
        let ansatz = AnsatzBuilder::build(2, &[], &[]).unwrap();
        let mut vqe = Vqe::new(StatevectorEstimator::exact(), Box::new(Cobyla::new()));
        let err = vqe
            .compute_minimum_eigenvalue(&ansatz, &toy_hamiltonian(), Some(vec![0.0; 3]), &mut ConvergenceHistory::new())
            .unwrap_err();
        assert!(matches!(err, CoreError::ParameterCountMismatch { expected: 2, got: 3 }));
    }

    #[test]
    fn test_estimator_errors_propagate() {
        let ansatz = AnsatzBuilder::build(3, &[], &[]).unwrap();
        let mut vqe = Vqe::new(StatevectorEstimator::exact(), Box::new(Cobyla::new()));
        let err = vqe
            .compute_minimum_eigenvalue(&ansatz, &toy_hamiltonian(), None, &mut ConvergenceHistory::new())
            .unwrap_err();
        assert!(matches!(err, CoreError::Sim(_)));
    }

    #[test]
    fn test_callback_sees_every_evaluation() {
        let op = toy_hamiltonian();
        let ansatz = AnsatzBuilder::build(2, &[RotationAxis::X], &[]).unwrap();
        let mut vqe = Vqe::new(StatevectorEstimator::exact(), Box::new(Cobyla::new().with_maxiter(20)));
        let mut seen = Vec::new();
        let result = vqe
            .compute_minimum_eigenvalue_with(&ansatz, &op, None, &mut |r| seen.push(r.iteration))
            .unwrap();
        assert_eq!(seen.len(), result.num_evaluations);
        assert!(seen.windows(2).all(|w| w[1] == w[0] + 1));
    }
}

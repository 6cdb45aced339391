//! End-to-end run: molecule to scored [`RunRecord`].

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use molvqe_chem::{
    ActiveSpaceTransformer, ElectronicStructureProblem, FermionicOp, HartreeFockDriver, MappingKind,
    MolecularDriver, Molecule, QubitConverter, hartree_fock_bitstring, hartree_fock_circuit,
};
use molvqe_compile::{BasisGates, transpile};
use molvqe_ir::{Circuit, SparsePauliOp};
use molvqe_sim::{Estimator, ExactEigensolver, StatevectorEstimator};

use crate::ansatz::{AnsatzBuilder, RotationAxis};
use crate::error::{CoreError, CoreResult};
use crate::history::{ConvergenceHistory, EvaluationRecord};
use crate::optimizers::OptimizerKind;
use crate::score::{DEFAULT_ACCURACY_THRESHOLD_MHA, RunLabels, RunRecord, ScoreEvaluator};
use crate::vqe::{Vqe, VqeResult};

/// Every choice that defines a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Geometry, charge and multiplicity.
    pub molecule: Molecule,
    /// Fold core orbitals into a constant.
    pub freeze_core: bool,
    /// Orbitals to drop; negative indices count from the end.
    pub remove_orbitals: Vec<isize>,
    /// Fermion-to-qubit mapping.
    pub mapping: MappingKind,
    /// Taper two qubits (parity mapping only).
    pub two_qubit_reduction: bool,
    /// Rotation layers before the ladder.
    pub opening_axes: Vec<RotationAxis>,
    /// Rotation layers after the ladder.
    pub closing_axes: Vec<RotationAxis>,
    /// Classical optimizer.
    pub optimizer: OptimizerKind,
    /// Optimizer iteration cap.
    pub maxiter: usize,
    /// Shots per Pauli term; exact expectation values when absent.
    pub shots: Option<usize>,
    /// Seed for shot sampling and stochastic optimizers.
    pub seed: u64,
    /// Pass bound on the error in milli-Hartree.
    pub accuracy_threshold_mha: f64,
    /// Starting parameters; the reference-preserving point when absent.
    pub initial_point: Option<Vec<f64>>,
}

impl Default for ExperimentConfig {
    /// LiH at 1.5474 Å with a frozen core, two virtuals removed and a
    /// tapered parity mapping: a 4-qubit problem.
    fn default() -> Self {
        Self {
            molecule: Molecule::lih(1.5474),
            freeze_core: true,
            remove_orbitals: vec![-3, -2],
            mapping: MappingKind::Parity,
            two_qubit_reduction: true,
            opening_axes: vec![RotationAxis::Z, RotationAxis::Y, RotationAxis::X],
            closing_axes: Vec::new(),
            optimizer: OptimizerKind::Cobyla,
            maxiter: 1000,
            shots: None,
            seed: 42,
            accuracy_threshold_mha: DEFAULT_ACCURACY_THRESHOLD_MHA,
            initial_point: None,
        }
    }
}

impl ExperimentConfig {
    fn converter(&self) -> QubitConverter {
        QubitConverter::new(self.mapping, self.two_qubit_reduction)
    }

    /// Reject settings no run could use.
    pub fn validate(&self) -> CoreResult<()> {
        if self.maxiter == 0 {
            return Err(CoreError::InvalidArgument("maxiter must be positive".into()));
        }
        if self.shots == Some(0) {
            return Err(CoreError::InvalidArgument("shots must be positive".into()));
        }
        if !self.accuracy_threshold_mha.is_finite() || self.accuracy_threshold_mha < 0.0 {
            return Err(CoreError::InvalidArgument(format!(
                "accuracy threshold must be a non-negative number, got {}",
                self.accuracy_threshold_mha
            )));
        }
        AnsatzBuilder::validate_axes(&self.opening_axes, &self.closing_axes)?;
        self.molecule.validate()?;
        Ok(())
    }
}

/// Everything built before optimization starts.
#[derive(Debug, Clone)]
pub struct PreparedProblem {
    /// Active-space problem.
    pub problem: ElectronicStructureProblem,
    /// Qubit Hamiltonian without constant energy.
    pub operator: SparsePauliOp,
    /// Hartree–Fock state preparation.
    pub reference: Circuit,
    /// Qubit bits the reference prepares.
    pub reference_bits: Vec<bool>,
    /// Bare ansatz.
    pub ansatz: Circuit,
    /// Reference followed by ansatz; the circuit the VQE optimizes.
    pub circuit: Circuit,
}

impl PreparedProblem {
    /// Register width.
    pub fn num_qubits(&self) -> u32 {
        self.operator.num_qubits()
    }

    /// Constant added to eigenvalues of `operator`.
    pub fn constant_energy(&self) -> f64 {
        self.problem.constant_energy()
    }

    /// Total exact ground-state energy.
    pub fn exact_energy(&self) -> CoreResult<f64> {
        let ground = ExactEigensolver::new().ground_state(&self.operator)?;
        Ok(ground.eigenvalue + self.constant_energy())
    }

    /// Ansatz angles that leave the reference state unchanged.
    pub fn reference_point(&self, config: &ExperimentConfig) -> CoreResult<Vec<f64>> {
        AnsatzBuilder::reference_point(&config.opening_axes, &config.closing_axes, &self.reference_bits)
    }

    /// Exact energy of `circuit` at `params`, constant included.
    pub fn energy_at(&self, params: &[f64]) -> CoreResult<f64> {
        let estimate = StatevectorEstimator::exact().estimate(&self.circuit, params, &self.operator)?;
        Ok(estimate.mean + self.constant_energy())
    }

    /// Two-qubit gates in `circuit` after translation to `{u, cx}`.
    pub fn two_qubit_gate_count(&self) -> CoreResult<usize> {
        Ok(transpile(&self.circuit, BasisGates::u_cx())?.num_nonlocal_gates())
    }
}

/// Result of [`Experiment::run`].
#[derive(Debug, Clone)]
pub struct ExperimentOutcome {
    /// Scored summary.
    pub record: RunRecord,
    /// Raw optimizer outcome, energies without constant.
    pub vqe: VqeResult,
    /// Total Hartree–Fock energy.
    pub hf_energy: f64,
    /// Register width.
    pub num_qubits: u32,
}

/// Drives one configured run.
#[derive(Debug, Clone)]
pub struct Experiment {
    config: ExperimentConfig,
}

impl Experiment {
    /// Validate `config` and wrap it.
    pub fn new(config: ExperimentConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Labels identifying this run in its record.
    pub fn labels(&self) -> RunLabels {
        RunLabels {
            optimizer: self.config.optimizer.to_string(),
            mapping: self.config.mapping.to_string(),
            ansatz: AnsatzBuilder::label(&self.config.opening_axes, &self.config.closing_axes),
        }
    }

    /// Molecule through qubit Hamiltonian, reference state and ansatz.
    #[instrument(skip(self), fields(molecule = %self.config.molecule))]
    pub fn prepare(&self) -> CoreResult<PreparedProblem> {
        let config = &self.config;
        let full = HartreeFockDriver::new().run(&config.molecule)?;
        let problem = ActiveSpaceTransformer::new(config.freeze_core, config.remove_orbitals.clone())
            .transform(&full)?;

        let converter = config.converter();
        let operator = converter.convert(&FermionicOp::from_problem(&problem), problem.num_particles())?;
        let reference =
            hartree_fock_circuit(problem.num_spatial_orbitals, problem.num_particles(), &converter)?;
        let reference_bits = converter.encode(&hartree_fock_bitstring(
            problem.num_spatial_orbitals,
            problem.num_particles(),
        )?)?;
        let ansatz = AnsatzBuilder::build(
            operator.num_qubits() as usize,
            &config.opening_axes,
            &config.closing_axes,
        )?;

        let mut circuit = reference.clone();
        circuit.set_name(format!("hf+{}", ansatz.name()));
        circuit.compose(&ansatz)?;

        info!(
            qubits = operator.num_qubits(),
            terms = operator.num_terms(),
            parameters = circuit.num_parameters(),
            hf_energy = problem.hf_energy,
            "problem prepared"
        );
        Ok(PreparedProblem {
            problem,
            operator,
            reference,
            reference_bits,
            ansatz,
            circuit,
        })
    }

    /// Run, appending every evaluation to `history`.
    pub fn run(&self, history: &mut ConvergenceHistory) -> CoreResult<ExperimentOutcome> {
        self.run_with(&mut |record| history.push(record.clone()))
    }

    /// Run, reporting every evaluation to `callback`.
    pub fn run_with(&self, callback: &mut dyn FnMut(&EvaluationRecord)) -> CoreResult<ExperimentOutcome> {
        let prepared = self.prepare()?;
        self.run_prepared(&prepared, callback)
    }

    /// Optimize and score an already prepared problem.
    pub fn run_prepared(
        &self,
        prepared: &PreparedProblem,
        callback: &mut dyn FnMut(&EvaluationRecord),
    ) -> CoreResult<ExperimentOutcome> {
        let config = &self.config;
        let estimator = StatevectorEstimator::new(config.shots, config.seed);
        let initial_point = match &config.initial_point {
            Some(point) => point.clone(),
            None => prepared.reference_point(config)?,
        };
        let mut vqe = Vqe::new(estimator, config.optimizer.build(config.maxiter, config.seed));
        let vqe_result = vqe.compute_minimum_eigenvalue_with(
            &prepared.circuit,
            &prepared.operator,
            Some(initial_point),
            callback,
        )?;

        let constant = prepared.constant_energy();
        let final_energy = vqe_result.optimal_value + constant;
        let exact_energy = prepared.exact_energy()?;
        let two_qubit_gates = prepared.two_qubit_gate_count()?;

        let record = ScoreEvaluator::record(
            self.labels(),
            final_energy,
            exact_energy,
            two_qubit_gates,
            prepared.circuit.num_parameters(),
            config.accuracy_threshold_mha,
        );
        info!(
            final_energy,
            exact_energy,
            error_mha = record.error_mha(),
            passed = record.passed(),
            score = record.score(),
            "run scored"
        );
        Ok(ExperimentOutcome {
            record,
            vqe: vqe_result,
            hf_energy: prepared.problem.hf_energy,
            num_qubits: prepared.num_qubits(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_reference_run() {
        let config = ExperimentConfig::default();
        assert_eq!(
            AnsatzBuilder::parameter_count(4, &config.opening_axes, &config.closing_axes),
            18
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let config = ExperimentConfig {
            maxiter: 0,
            ..ExperimentConfig::default()
        };
        assert!(matches!(Experiment::new(config), Err(CoreError::InvalidArgument(_))));

        let config = ExperimentConfig {
            accuracy_threshold_mha: -1.0,
            ..ExperimentConfig::default()
        };
        assert!(Experiment::new(config).is_err());

        let config = ExperimentConfig {
            opening_axes: vec![RotationAxis::Y, RotationAxis::Y],
            ..ExperimentConfig::default()
        };
        assert!(matches!(Experiment::new(config), Err(CoreError::InvalidArgument(_))));
    }

    #[test]
    fn test_prepare_reference_problem() {
        let prepared = Experiment::new(ExperimentConfig::default())
            .unwrap()
            .prepare()
            .unwrap();
        assert_eq!(prepared.num_qubits(), 4);
        assert_eq!(prepared.circuit.num_parameters(), 18);
        assert_eq!(prepared.two_qubit_gate_count().unwrap(), 3);
        assert!((prepared.exact_energy().unwrap() + 7.881_461).abs() < 1e-5);
        assert_eq!(prepared.reference_bits, [true, true, false, false]);
    }

    #[test]
    fn test_starting_energy() {
        let config = ExperimentConfig::default();
        let prepared = Experiment::new(config.clone()).unwrap().prepare().unwrap();
        let hf = prepared.problem.hf_energy;

        // At zero angles the CNOT chain turns |0011> into |0001>.
        let zeros = prepared.energy_at(&[0.0; 18]).unwrap();
        assert!((zeros + 7.006_984).abs() < 1e-5, "{zeros}");

        let start = prepared.energy_at(&prepared.reference_point(&config).unwrap()).unwrap();
        assert!((start - hf).abs() < 1e-8, "{start} vs {hf}");
    }
}

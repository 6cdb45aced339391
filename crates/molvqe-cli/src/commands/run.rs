//! Run command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use console::style;

use molvqe_chem::MappingKind;
use molvqe_cli::RunConfig;
use molvqe_cli::config::parse_orbitals;
use molvqe_cli::output::{
    evaluation_progress, hartree, milli_hartree, print_header, print_result, print_section,
    print_verdict,
};
use molvqe_core::{ConvergenceHistory, Experiment, OptimizerKind, parse_axes};

/// Flags for `molvqe run`. Every flag overrides the file and environment.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Configuration file (YAML)
    #[arg(short, long, env = "MOLVQE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Geometry, e.g. "Li 0 0 0; H 0 0 1.5474"
    #[arg(short, long)]
    pub geometry: Option<String>,

    /// Fermion-to-qubit mapping (parity, jordan_wigner)
    #[arg(short, long)]
    pub mapping: Option<MappingKind>,

    /// Disable the two-qubit reduction
    #[arg(long)]
    pub no_reduction: bool,

    /// Keep core orbitals in the active space
    #[arg(long)]
    pub no_freeze_core: bool,

    /// Orbitals to remove, e.g. "-3,-2"
    #[arg(long, allow_hyphen_values = true)]
    pub remove_orbitals: Option<String>,

    /// Rotation layers before the ladder (e.g. "zyx")
    #[arg(long)]
    pub opening: Option<String>,

    /// Rotation layers after the ladder
    #[arg(long)]
    pub closing: Option<String>,

    /// Classical optimizer (cobyla, spsa)
    #[arg(long)]
    pub optimizer: Option<OptimizerKind>,

    /// Optimizer iteration cap
    #[arg(long)]
    pub maxiter: Option<usize>,

    /// Shots per Pauli term (exact expectation values if omitted)
    #[arg(short, long)]
    pub shots: Option<usize>,

    /// Seed for sampling and stochastic optimizers
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pass threshold in milli-Hartree
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Write the run record to this JSON file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write every objective evaluation to this JSON file
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Hide the progress spinner
    #[arg(short, long)]
    pub quiet: bool,
}

impl RunArgs {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut RunConfig) -> Result<()> {
        if let Some(geometry) = &self.geometry {
            config.geometry.clone_from(geometry);
        }
        if let Some(mapping) = self.mapping {
            config.mapping = mapping;
        }
        if self.no_reduction {
            config.two_qubit_reduction = false;
        }
        if self.no_freeze_core {
            config.freeze_core = false;
        }
        if let Some(orbitals) = &self.remove_orbitals {
            config.remove_orbitals = parse_orbitals(orbitals)
                .map_err(|e| anyhow::anyhow!("Invalid --remove-orbitals: {e}"))?;
        }
        if let Some(opening) = &self.opening {
            config.opening_axes = parse_axes(opening).context("Invalid --opening")?;
        }
        if let Some(closing) = &self.closing {
            config.closing_axes = parse_axes(closing).context("Invalid --closing")?;
        }
        if let Some(optimizer) = self.optimizer {
            config.optimizer = optimizer;
        }
        if let Some(maxiter) = self.maxiter {
            config.maxiter = maxiter;
        }
        if self.shots.is_some() {
            config.shots = self.shots;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(threshold) = self.threshold {
            config.accuracy_threshold_mha = threshold;
        }
        if self.output.is_some() {
            config.output.clone_from(&self.output);
        }
        Ok(())
    }
}

/// Execute the run command.
pub fn execute(args: &RunArgs) -> Result<()> {
    let mut config = super::common::load_config(args.config.as_deref())?;
    args.apply(&mut config)?;
    config.validate()?;

    let experiment = Experiment::new(config.to_experiment_config()?)?;
    let labels = experiment.labels();

    print_header("molvqe run");

    print_section("Problem");
    let prepared = experiment
        .prepare()
        .context("Failed to build the qubit Hamiltonian")?;
    print_result("Molecule", style(&config.geometry).green());
    print_result("Mapping", &labels.mapping);
    print_result("Qubits", prepared.num_qubits());
    print_result("Pauli terms", prepared.operator.num_terms());
    print_result("Ansatz", &labels.ansatz);
    print_result("Parameters", prepared.circuit.num_parameters());
    print_result("Hartree-Fock", hartree(prepared.problem.hf_energy));

    print_section(&format!("Optimization ({})", labels.optimizer));
    let constant = prepared.constant_energy();
    let pb = evaluation_progress(!args.quiet)?;
    let mut history = ConvergenceHistory::new();
    let mut best = f64::INFINITY;
    let outcome = experiment.run_prepared(&prepared, &mut |record| {
        best = best.min(record.mean);
        pb.inc(1);
        pb.set_message(format!("best {}", hartree(best + constant)));
        history.push(record.clone());
    });
    pb.finish_and_clear();
    let outcome = outcome.context("VQE failed")?;
    let record = &outcome.record;

    print_result("Evaluations", outcome.vqe.num_evaluations);
    print_result("Converged", outcome.vqe.converged);

    print_section("Result");
    print_result("VQE energy", hartree(record.final_energy()));
    print_result("Exact energy", hartree(record.exact_energy()));
    print_result("Error", milli_hartree(record.error_mha()));
    print_result("Two-qubit gates", record.two_qubit_gate_count());
    print_result("Score", style(record.score()).yellow().bold());
    println!();
    print_verdict(
        record.passed(),
        record.within_symmetric(config.accuracy_threshold_mha),
        config.accuracy_threshold_mha,
    );

    if let Some(path) = &config.output {
        record
            .write_json(path)
            .with_context(|| format!("Failed to write run record: {}", path.display()))?;
        print_result("Record", style(path.display()).green());
    }
    if let Some(path) = &args.history {
        let json = serde_json::to_string_pretty(&history)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write history: {}", path.display()))?;
        print_result("History", style(path.display()).green());
    }

    Ok(())
}

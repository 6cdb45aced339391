//! Exact command implementation.

use std::path::Path;

use anyhow::{Context, Result, bail};
use console::style;

use molvqe_chem::{ActiveSpaceTransformer, FermionicOp, HartreeFockDriver, MolecularDriver, QubitConverter};
use molvqe_cli::output::{hartree, print_header, print_result, print_section};
use molvqe_sim::ExactEigensolver;

use super::common::load_config;

/// Execute the exact command.
pub fn execute(
    config_path: Option<&Path>,
    geometry: Option<&str>,
    states: usize,
    show_terms: bool,
) -> Result<()> {
    if states == 0 {
        bail!("--states must be at least 1");
    }
    let mut config = load_config(config_path)?;
    if let Some(geometry) = geometry {
        config.geometry = geometry.to_string();
    }
    let molecule = config.molecule()?;

    let full = HartreeFockDriver::new()
        .run(&molecule)
        .context("Hartree-Fock did not complete")?;
    let problem = ActiveSpaceTransformer::new(config.freeze_core, config.remove_orbitals.clone())
        .transform(&full)?;
    let converter = QubitConverter::new(config.mapping, config.two_qubit_reduction);
    let operator = converter.convert(&FermionicOp::from_problem(&problem), problem.num_particles())?;
    let constant = problem.constant_energy();

    print_header("molvqe exact");
    print_result("Molecule", style(&molecule).green());
    print_result("Nuclear repulsion", hartree(problem.nuclear_repulsion));
    print_result("Hartree-Fock", hartree(problem.hf_energy));
    print_result(
        "Active space",
        format!(
            "{} orbitals, ({}, {}) electrons",
            problem.num_spatial_orbitals, problem.num_alpha, problem.num_beta
        ),
    );
    print_result("Qubits", operator.num_qubits());
    print_result("Pauli terms", operator.num_terms());

    print_section("Eigenvalues");
    let eigenvalues = ExactEigensolver::new().eigenvalues(&operator, states)?;
    for (k, value) in eigenvalues.iter().enumerate() {
        print_result(&format!("E{k}"), hartree(value + constant));
    }
    if let Some(ground) = eigenvalues.first() {
        print_result(
            "Correlation",
            format!("{:.4} mHa", (ground + constant - problem.hf_energy) * 1000.0),
        );
    }

    if show_terms {
        print_section("Hamiltonian");
        print_result("Constant", hartree(constant));
        for (pauli, coeff) in operator.terms() {
            println!("  {pauli}  {:+.10}", coeff.re);
        }
    }

    Ok(())
}

//! molvqe command-line interface
//!
//! Runs the molecular VQE workflow end to end and exposes its building
//! blocks: the layered ansatz, run scoring and exact reference energies.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{ansatz, config, exact, run, score};

/// molvqe - variational ground-state energies for small molecules
#[derive(Parser)]
#[command(name = "molvqe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run VQE on a molecule and score the result
    Run(run::RunArgs),

    /// Build an ansatz and print its layout
    Ansatz {
        /// Number of qubits
        #[arg(short = 'n', long)]
        qubits: usize,

        /// Rotation layers before the ladder (e.g. "zyx" or "z,y,x")
        #[arg(long, default_value = "zyx")]
        opening: String,

        /// Rotation layers after the ladder
        #[arg(long, default_value = "")]
        closing: String,

        /// List every instruction
        #[arg(long)]
        show_instructions: bool,

        /// Print the circuit as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Score an optimized energy against the exact one
    Score {
        /// Optimized energy (Hartree)
        #[arg(long, allow_hyphen_values = true)]
        optimized: f64,

        /// Exact energy (Hartree)
        #[arg(long, allow_hyphen_values = true)]
        exact: f64,

        /// Two-qubit gates in the transpiled circuit
        #[arg(long)]
        two_qubit_gates: usize,

        /// Number of ansatz parameters
        #[arg(long, default_value = "0")]
        parameters: usize,

        /// Pass threshold in milli-Hartree
        #[arg(long, default_value = "4.0", allow_hyphen_values = true)]
        threshold: f64,

        /// Print the score as JSON
        #[arg(long)]
        json: bool,
    },

    /// Exact ground-state energy of a molecule's qubit Hamiltonian
    Exact {
        /// Configuration file (YAML)
        #[arg(short, long, env = "MOLVQE_CONFIG")]
        config: Option<PathBuf>,

        /// Geometry, e.g. "H 0 0 0; H 0 0 0.735" (overrides the config)
        #[arg(short, long)]
        geometry: Option<String>,

        /// Number of lowest eigenvalues to print
        #[arg(short, long, default_value = "1")]
        states: usize,

        /// Print the Pauli terms of the Hamiltonian
        #[arg(long)]
        terms: bool,
    },

    /// Print the resolved configuration as YAML
    Config {
        /// Configuration file (YAML)
        #[arg(short, long, env = "MOLVQE_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run(args) => run::execute(&args),
        Commands::Ansatz {
            qubits,
            opening,
            closing,
            show_instructions,
            json,
        } => ansatz::execute(qubits, &opening, &closing, show_instructions, json),
        Commands::Score {
            optimized,
            exact,
            two_qubit_gates,
            parameters,
            threshold,
            json,
        } => score::execute(optimized, exact, two_qubit_gates, parameters, threshold, json),
        Commands::Exact {
            config,
            geometry,
            states,
            terms,
        } => exact::execute(config.as_deref(), geometry.as_deref(), states, terms),
        Commands::Config { config } => config::execute(config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

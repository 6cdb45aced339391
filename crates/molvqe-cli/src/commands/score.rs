//! Score command implementation.

use anyhow::{Result, bail};

use molvqe_cli::output::{hartree, milli_hartree, print_header, print_result, print_verdict};
use molvqe_core::ScoreEvaluator;

/// Execute the score command.
pub fn execute(
    optimized: f64,
    exact: f64,
    two_qubit_gates: usize,
    parameters: usize,
    threshold: f64,
    json: bool,
) -> Result<()> {
    if !optimized.is_finite() || !exact.is_finite() {
        bail!("Energies must be finite numbers");
    }
    if !threshold.is_finite() || threshold < 0.0 {
        bail!("Threshold must be a non-negative number, got {threshold}");
    }

    let score = ScoreEvaluator::evaluate(optimized, exact, two_qubit_gates, parameters, threshold);

    if json {
        println!("{}", serde_json::to_string_pretty(&score)?);
        return Ok(());
    }

    print_header("molvqe score");
    print_result("Optimized", hartree(optimized));
    print_result("Exact", hartree(exact));
    print_result("Error", milli_hartree(score.error_mha));
    print_result("Score", score.score);
    println!();
    print_verdict(score.passed, score.within_symmetric(threshold), threshold);
    Ok(())
}

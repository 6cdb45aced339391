//! Console formatting shared by the subcommands.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner ticked once per objective evaluation.
///
/// Hidden when `visible` is false so quiet runs print nothing.
pub fn evaluation_progress(visible: bool) -> anyhow::Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos} evaluations {msg}")?
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );
    Ok(pb)
}

pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
}

pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a `label: value` line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

pub fn print_failure(message: &str) {
    println!("{} {}", style("✗").red().bold(), message);
}

/// Extra line for a run that passes only because the bound is one-sided.
pub fn below_exact_note(passed: bool, within_symmetric: bool) -> Option<&'static str> {
    (passed && !within_symmetric)
        .then_some("energy lies below the exact value by more than the threshold")
}

/// Pass or fail line against `threshold` mHa, plus the one-sided note if any.
pub fn print_verdict(passed: bool, within_symmetric: bool, threshold: f64) {
    if passed {
        print_success(&format!("Within {threshold} mHa of the exact energy"));
    } else {
        print_failure(&format!("Error exceeds {threshold} mHa"));
    }
    if let Some(note) = below_exact_note(passed, within_symmetric) {
        print_result("Note", note);
    }
}

/// Energy in Hartree with eight decimals.
pub fn hartree(energy: f64) -> String {
    format!("{energy:.8} Ha")
}

/// Signed error in milli-Hartree.
pub fn milli_hartree(error: f64) -> String {
    format!("{error:+.4} mHa")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_formatting() {
        assert_eq!(hartree(-1.137_306_03), "-1.13730603 Ha");
        assert_eq!(milli_hartree(2.5), "+2.5000 mHa");
        assert_eq!(milli_hartree(-10.0), "-10.0000 mHa");
    }

    #[test]
    fn test_below_exact_note() {
        assert!(below_exact_note(true, true).is_none());
        assert!(below_exact_note(false, false).is_none());
        assert!(below_exact_note(true, false).unwrap().contains("below the exact value"));
    }

    #[test]
    fn test_hidden_progress() {
        let pb = evaluation_progress(false).unwrap();
        pb.inc(3);
        assert_eq!(pb.position(), 3);
        assert!(pb.is_hidden());
    }
}

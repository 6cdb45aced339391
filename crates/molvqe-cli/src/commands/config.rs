//! Config command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;

use molvqe_cli::config::ENV_VARS;

use super::common::load_config;

/// Print the configuration a `run` would use.
pub fn execute(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;

    let overrides: Vec<&str> = ENV_VARS
        .iter()
        .copied()
        .filter(|var| std::env::var_os(var).is_some())
        .collect();
    if !overrides.is_empty() {
        eprintln!(
            "{} environment overrides: {}",
            style("ℹ").blue(),
            overrides.join(", ")
        );
    }

    print!("{}", config.to_yaml()?);
    Ok(())
}

//! Shared helpers for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};

use molvqe_cli::RunConfig;

/// Resolve defaults, the optional file and `MOLVQE_*` variables.
pub fn load_config(path: Option<&Path>) -> Result<RunConfig> {
    match path {
        Some(p) => RunConfig::load(Some(p))
            .with_context(|| format!("Failed to load configuration from {}", p.display())),
        None => RunConfig::load(None).context("Failed to resolve configuration"),
    }
}

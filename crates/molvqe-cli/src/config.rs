//! Run configuration for the `molvqe` binary.
//!
//! Values are resolved in this order (highest wins):
//! 1. Command-line flags
//! 2. Environment variables (`MOLVQE_` prefix)
//! 3. Configuration file (YAML)
//! 4. Default values
//!
//! The defaults describe the reference run: LiH at 1.5474 Å, frozen core,
//! two virtual orbitals removed, tapered parity mapping, `zyx` opening layers
//! and COBYLA.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use molvqe_chem::{ChemError, MappingKind, Molecule};
use molvqe_core::{
    CoreError, DEFAULT_ACCURACY_THRESHOLD_MHA, ExperimentConfig, OptimizerKind, RotationAxis,
    parse_axes,
};

/// Environment variables read by [`RunConfig::merge_env`].
pub const ENV_VARS: [&str; 14] = [
    "MOLVQE_GEOMETRY",
    "MOLVQE_CHARGE",
    "MOLVQE_MULTIPLICITY",
    "MOLVQE_FREEZE_CORE",
    "MOLVQE_REMOVE_ORBITALS",
    "MOLVQE_MAPPING",
    "MOLVQE_TWO_QUBIT_REDUCTION",
    "MOLVQE_OPENING_AXES",
    "MOLVQE_CLOSING_AXES",
    "MOLVQE_OPTIMIZER",
    "MOLVQE_MAXITER",
    "MOLVQE_SHOTS",
    "MOLVQE_SEED",
    "MOLVQE_THRESHOLD_MHA",
];

/// Configuration errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML for [`RunConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// An environment variable holds an unusable value.
    #[error("Invalid value '{value}' for {var}: {message}")]
    Env {
        var: &'static str,
        value: String,
        message: String,
    },

    /// Field values that cannot describe a run.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Chem(#[from] ChemError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Everything a `molvqe run` needs, as written in a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Atoms as `"Li 0 0 0; H 0 0 1.5474"` (Ångström).
    #[serde(default = "default_geometry")]
    pub geometry: String,

    #[serde(default)]
    pub charge: i32,

    /// Spin multiplicity 2S+1.
    #[serde(default = "default_multiplicity")]
    pub multiplicity: u32,

    #[serde(default = "default_true")]
    pub freeze_core: bool,

    /// Orbitals dropped from the active space; negative indices count from the end.
    #[serde(default = "default_remove_orbitals")]
    pub remove_orbitals: Vec<isize>,

    #[serde(default)]
    pub mapping: MappingKind,

    #[serde(default = "default_true")]
    pub two_qubit_reduction: bool,

    #[serde(default = "default_opening_axes")]
    pub opening_axes: Vec<RotationAxis>,

    #[serde(default)]
    pub closing_axes: Vec<RotationAxis>,

    #[serde(default)]
    pub optimizer: OptimizerKind,

    #[serde(default = "default_maxiter")]
    pub maxiter: usize,

    /// Shots per Pauli term; exact expectation values when unset.
    #[serde(default)]
    pub shots: Option<usize>,

    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default = "default_threshold")]
    pub accuracy_threshold_mha: f64,

    #[serde(default)]
    pub initial_point: Option<Vec<f64>>,

    /// Where to write the run record as JSON.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_geometry() -> String {
    "Li 0 0 0; H 0 0 1.5474".to_string()
}

fn default_multiplicity() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_remove_orbitals() -> Vec<isize> {
    vec![-3, -2]
}

fn default_opening_axes() -> Vec<RotationAxis> {
    vec![RotationAxis::Z, RotationAxis::Y, RotationAxis::X]
}

fn default_maxiter() -> usize {
    1000
}

fn default_seed() -> u64 {
    42
}

fn default_threshold() -> f64 {
    DEFAULT_ACCURACY_THRESHOLD_MHA
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            geometry: default_geometry(),
            charge: 0,
            multiplicity: default_multiplicity(),
            freeze_core: true,
            remove_orbitals: default_remove_orbitals(),
            mapping: MappingKind::default(),
            two_qubit_reduction: true,
            opening_axes: default_opening_axes(),
            closing_axes: Vec::new(),
            optimizer: OptimizerKind::default(),
            maxiter: default_maxiter(),
            shots: None,
            seed: default_seed(),
            accuracy_threshold_mha: default_threshold(),
            initial_point: None,
            output: None,
        }
    }
}

impl RunConfig {
    /// Parse a YAML document.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml_ng::from_str(source)?)
    }

    /// Load a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    /// File (or defaults) with environment overrides applied, validated.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `MOLVQE_*` variables from the process environment.
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_env_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides from `lookup`. Only variables that are set change fields.
    pub fn merge_env_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = lookup("MOLVQE_GEOMETRY") {
            self.geometry = v;
        }
        if let Some(v) = lookup("MOLVQE_CHARGE") {
            self.charge = parse_env("MOLVQE_CHARGE", &v)?;
        }
        if let Some(v) = lookup("MOLVQE_MULTIPLICITY") {
            self.multiplicity = parse_env("MOLVQE_MULTIPLICITY", &v)?;
        }
        if let Some(v) = lookup("MOLVQE_FREEZE_CORE") {
            self.freeze_core = parse_bool("MOLVQE_FREEZE_CORE", &v)?;
        }
        if let Some(v) = lookup("MOLVQE_REMOVE_ORBITALS") {
            self.remove_orbitals = parse_orbitals(&v)
                .map_err(|message| env_error("MOLVQE_REMOVE_ORBITALS", &v, message))?;
        }
        if let Some(v) = lookup("MOLVQE_MAPPING") {
            self.mapping = parse_env("MOLVQE_MAPPING", &v)?;
        }
        if let Some(v) = lookup("MOLVQE_TWO_QUBIT_REDUCTION") {
            self.two_qubit_reduction = parse_bool("MOLVQE_TWO_QUBIT_REDUCTION", &v)?;
        }
        if let Some(v) = lookup("MOLVQE_OPENING_AXES") {
            self.opening_axes =
                parse_axes(&v).map_err(|e| env_error("MOLVQE_OPENING_AXES", &v, e.to_string()))?;
        }
        if let Some(v) = lookup("MOLVQE_CLOSING_AXES") {
            self.closing_axes =
                parse_axes(&v).map_err(|e| env_error("MOLVQE_CLOSING_AXES", &v, e.to_string()))?;
        }
        if let Some(v) = lookup("MOLVQE_OPTIMIZER") {
            self.optimizer = parse_env("MOLVQE_OPTIMIZER", &v)?;
        }
        if let Some(v) = lookup("MOLVQE_MAXITER") {
            self.maxiter = parse_env("MOLVQE_MAXITER", &v)?;
        }
        if let Some(v) = lookup("MOLVQE_SHOTS") {
            self.shots = match v.trim() {
                "" | "none" | "exact" => None,
                _ => Some(parse_env("MOLVQE_SHOTS", &v)?),
            };
        }
        if let Some(v) = lookup("MOLVQE_SEED") {
            self.seed = parse_env("MOLVQE_SEED", &v)?;
        }
        if let Some(v) = lookup("MOLVQE_THRESHOLD_MHA") {
            self.accuracy_threshold_mha = parse_env("MOLVQE_THRESHOLD_MHA", &v)?;
        }
        Ok(self)
    }

    /// The molecule described by geometry, charge and multiplicity.
    pub fn molecule(&self) -> Result<Molecule, ConfigError> {
        let molecule: Molecule = self.geometry.parse()?;
        Ok(molecule
            .with_charge(self.charge)
            .with_multiplicity(self.multiplicity))
    }

    /// Reject values no run could use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.molecule()?.validate()?;
        if self.maxiter == 0 {
            return Err(ConfigError::Invalid("maxiter must be positive".into()));
        }
        if self.shots == Some(0) {
            return Err(ConfigError::Invalid("shots must be positive".into()));
        }
        if !self.accuracy_threshold_mha.is_finite() || self.accuracy_threshold_mha < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "accuracy_threshold_mha must be a non-negative number, got {}",
                self.accuracy_threshold_mha
            )));
        }
        if self.two_qubit_reduction && self.mapping != MappingKind::Parity {
            tracing::warn!(
                mapping = %self.mapping,
                "two_qubit_reduction only applies to the parity mapping and will be ignored"
            );
        }
        Ok(())
    }

    /// Translate into the library's experiment description.
    pub fn to_experiment_config(&self) -> Result<ExperimentConfig, ConfigError> {
        let config = ExperimentConfig {
            molecule: self.molecule()?,
            freeze_core: self.freeze_core,
            remove_orbitals: self.remove_orbitals.clone(),
            mapping: self.mapping,
            two_qubit_reduction: self.two_qubit_reduction,
            opening_axes: self.opening_axes.clone(),
            closing_axes: self.closing_axes.clone(),
            optimizer: self.optimizer,
            maxiter: self.maxiter,
            shots: self.shots,
            seed: self.seed,
            accuracy_threshold_mha: self.accuracy_threshold_mha,
            initial_point: self.initial_point.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

fn env_error(var: &'static str, value: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Env {
        var,
        value: value.to_string(),
        message: message.into(),
    }
}

fn parse_env<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| env_error(var, value, e.to_string()))
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(env_error(var, value, "expected true or false")),
    }
}

/// Parse `"-3,-2"` (brackets and spaces allowed).
pub fn parse_orbitals(value: &str) -> Result<Vec<isize>, String> {
    value
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<isize>().map_err(|e| format!("'{s}': {e}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_defaults_are_reference_run() {
        let config = RunConfig::default();
        config.validate().unwrap();
        let experiment = config.to_experiment_config().unwrap();
        assert_eq!(experiment, ExperimentConfig::default());
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = RunConfig::from_yaml("{}").unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_partial_yaml() {
        let config = RunConfig::from_yaml(
            "geometry: \"H 0 0 0; H 0 0 0.735\"\nfreeze_core: false\nremove_orbitals: []\nopening_axes: [y]\nclosing_axes: [z]\noptimizer: spsa\nshots: 500\n",
        )
        .unwrap();
        assert_eq!(config.molecule().unwrap(), Molecule::h2(0.735));
        assert!(!config.freeze_core);
        assert!(config.remove_orbitals.is_empty());
        assert_eq!(config.opening_axes, vec![RotationAxis::Y]);
        assert_eq!(config.closing_axes, vec![RotationAxis::Z]);
        assert_eq!(config.optimizer, OptimizerKind::Spsa);
        assert_eq!(config.shots, Some(500));
        assert_eq!(config.maxiter, 1000);
        assert_eq!(config.mapping, MappingKind::Parity);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            RunConfig::from_yaml("max_iter: 5\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let config = RunConfig::default()
            .merge_env_from(env(&[
                ("MOLVQE_MAPPING", "jordan_wigner"),
                ("MOLVQE_TWO_QUBIT_REDUCTION", "false"),
                ("MOLVQE_OPENING_AXES", "x,y"),
                ("MOLVQE_REMOVE_ORBITALS", "[-2]"),
                ("MOLVQE_MAXITER", "25"),
                ("MOLVQE_SHOTS", "exact"),
                ("MOLVQE_THRESHOLD_MHA", "1.6"),
            ]))
            .unwrap();
        assert_eq!(config.mapping, MappingKind::JordanWigner);
        assert!(!config.two_qubit_reduction);
        assert_eq!(config.opening_axes, vec![RotationAxis::X, RotationAxis::Y]);
        assert_eq!(config.remove_orbitals, vec![-2]);
        assert_eq!(config.maxiter, 25);
        assert_eq!(config.shots, None);
        assert!((config.accuracy_threshold_mha - 1.6).abs() < 1e-12);
        // Untouched fields keep their values.
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_bad_env_value() {
        let err = RunConfig::default()
            .merge_env_from(env(&[("MOLVQE_MAXITER", "many")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: "MOLVQE_MAXITER", .. }));

        let err = RunConfig::default()
            .merge_env_from(env(&[("MOLVQE_FREEZE_CORE", "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains("MOLVQE_FREEZE_CORE"));
    }

    #[test]
    fn test_validate() {
        let config = RunConfig {
            maxiter: 0,
            ..RunConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = RunConfig {
            geometry: "H 0 0 0; H 0 0 0".into(),
            ..RunConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Chem(_))));

        let config = RunConfig {
            accuracy_threshold_mha: f64::NAN,
            ..RunConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_orbitals() {
        assert_eq!(parse_orbitals("-3, -2").unwrap(), vec![-3, -2]);
        assert_eq!(parse_orbitals("[]").unwrap(), Vec::<isize>::new());
        assert!(parse_orbitals("a").is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = RunConfig {
            shots: Some(100),
            output: Some(PathBuf::from("record.json")),
            ..RunConfig::default()
        };
        let yaml = config.to_yaml().unwrap();
        assert_eq!(RunConfig::from_yaml(&yaml).unwrap(), config);
    }
}

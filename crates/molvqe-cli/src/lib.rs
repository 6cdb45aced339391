//! Library half of the `molvqe` binary.
//!
//! Holds the parts of the command-line tool that are worth testing on their
//! own: configuration loading and the console helpers shared by every
//! subcommand.

pub mod config;
pub mod output;

pub use config::{ConfigError, RunConfig};

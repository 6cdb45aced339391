//! CLI command implementations.

pub mod ansatz;
pub mod common;
pub mod config;
pub mod exact;
pub mod run;
pub mod score;

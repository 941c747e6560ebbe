//! Command line interface for lockstep release planning.
//!
//! The binary reads a Cargo workspace from disk, builds the release plan with
//! [`lockstep_release`] and prints it. It never writes to the workspace.

pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod provider;
pub mod tracing;

pub use errors::{CliError, EXIT_CLI, EXIT_OK, EXIT_PLAN, exit_code_for};

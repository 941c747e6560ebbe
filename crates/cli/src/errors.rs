//! CLI error types and exit codes.

use miette::Diagnostic;
use thiserror::Error;

/// Exit code for success
pub const EXIT_OK: i32 = 0;
/// CLI or configuration error exit code
pub const EXIT_CLI: i32 = 2;
/// Release planning error exit code
pub const EXIT_PLAN: i32 = 3;

/// Errors surfaced by the lockstep CLI.
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Bad arguments or an unusable configuration file (exit code 2)
    #[error("CLI/configuration error: {message}")]
    #[diagnostic(code(lockstep::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },

    /// The workspace could not be planned (exit code 3)
    #[error(transparent)]
    #[diagnostic(transparent)]
    Release(#[from] lockstep_release::Error),
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new configuration error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

/// Map an error to the process exit code.
#[must_use]
pub const fn exit_code_for(error: &CliError) -> i32 {
    match error {
        CliError::Config { .. } => EXIT_CLI,
        CliError::Release(_) => EXIT_PLAN,
    }
}

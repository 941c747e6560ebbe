//! Command line argument definitions.

use crate::commands::plan::{ChangelogSource, PlanOptions};
use crate::errors::CliError;
use crate::tracing::{LogLevel, TracingFormat};
use clap::{Args, Parser, Subcommand, ValueEnum};
use lockstep_release::Version;
use std::path::PathBuf;

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "lockstep")]
#[command(about = "Plan lockstep releases of Cargo workspaces")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Logging level.
    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    /// Log output format.
    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,

    /// Emit logs as JSON.
    #[arg(long, global = true, help = "Output logs in JSON format")]
    pub json: bool,
}

impl Cli {
    /// Log format to initialize tracing with; `--json` wins over `--log-format`.
    #[must_use]
    pub const fn tracing_format(&self) -> TracingFormat {
        if self.json {
            TracingFormat::Json
        } else {
            self.log_format
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information.
    #[command(about = "Show version information")]
    Version,
    /// Build the release plan for a workspace.
    #[command(about = "Build the release plan for a workspace without changing any file")]
    Plan(PlanArgs),
}

/// Plan output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Human,
    /// JSON document
    Json,
}

/// Arguments of `lockstep plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Version to release.
    #[arg(long, help = "Version to release (e.g. 1.4.0)")]
    pub release_version: String,

    /// Repository directory.
    #[arg(long, short = 'p', help = "Path to repository root", default_value = ".")]
    pub root: PathBuf,

    /// Configuration file.
    #[arg(long, help = "Path to lockstep.toml (default: <root>/lockstep.toml)")]
    pub config: Option<PathBuf>,

    /// Changelog entry text.
    #[arg(long, help = "Changelog entry (Markdown)", conflicts_with = "changelog_file")]
    pub changelog_entry: Option<String>,

    /// File holding the changelog entry.
    #[arg(long, help = "Read the changelog entry from a file")]
    pub changelog_file: Option<PathBuf>,

    /// Leave the changelog alone.
    #[arg(
        long,
        help = "Do not update the changelog",
        conflicts_with_all = ["changelog_entry", "changelog_file"]
    )]
    pub skip_changelog: bool,

    /// Output format.
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Human)]
    pub output: OutputFormat,

    /// Show unified diffs of every file the plan would change.
    #[arg(long, help = "Show the diff each update would produce")]
    pub diff: bool,
}

impl PlanArgs {
    /// Validate the arguments into plan options.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] if the release version is malformed.
    pub fn into_options(self) -> Result<PlanOptions, CliError> {
        let version = self.release_version.parse::<Version>().map_err(|e| {
            CliError::config_with_help(
                e.to_string(),
                "Pass --release-version as MAJOR.MINOR.PATCH, optionally with -prerelease or +build",
            )
        })?;

        let changelog = if self.skip_changelog {
            ChangelogSource::Skip
        } else if let Some(entry) = self.changelog_entry {
            ChangelogSource::Entry(entry)
        } else if let Some(path) = self.changelog_file {
            ChangelogSource::File(path)
        } else {
            ChangelogSource::Default
        };

        Ok(PlanOptions {
            root: self.root,
            config: self.config,
            version,
            changelog,
            output: self.output,
            diff: self.diff,
        })
    }
}

/// Parse process arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

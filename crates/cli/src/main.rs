//! lockstep CLI entry point.

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

use lockstep_cli::cli::{self, Commands};
use lockstep_cli::commands::{plan, version};
use lockstep_cli::tracing::{TracingConfig, init_tracing};
use lockstep_cli::{CliError, EXIT_OK, exit_code_for};
use tracing::instrument;

#[tokio::main]
async fn main() {
    // NOTE: eprintln! in the panic hook is intentional, tracing may be unusable by then
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();

    let tracing_config = TracingConfig {
        format: cli.tracing_format(),
        level: cli.level.into(),
    };
    if let Err(error) = init_tracing(tracing_config) {
        eprintln!("{error:?}");
    }

    match run(cli.command).await {
        Ok(output) => {
            print!("{output}");
            std::process::exit(EXIT_OK);
        }
        Err(error) => {
            let code = exit_code_for(&error);
            eprintln!("{:?}", miette::Report::new(error));
            std::process::exit(code);
        }
    }
}

#[instrument(name = "lockstep_run", skip_all)]
async fn run(command: Commands) -> Result<String, CliError> {
    match command {
        Commands::Version => Ok(version::get_version_info()),
        Commands::Plan(args) => plan::execute_plan(&args.into_options()?).await,
    }
}

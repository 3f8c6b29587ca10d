//! spec-engine CLI
//!
//! Main entry point for the `spec-engine` binary.

use std::process::ExitCode;

use clap::Parser;
use spec_engine_common_config::Environment;
use spec_engine_common_log::{LogConfig, LogLevel};

mod cli;
mod commands;
mod error;
mod prompts;

use cli::Cli;
use error::Exit;

fn main() -> ExitCode {
    let cli = Cli::parse();

    Environment::init();
    init_tracing(&cli);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Internal error: failed to start async runtime: {e}");
            return Exit::Internal.into();
        }
    };

    match runtime.block_on(cli.execute()) {
        Ok(()) => Exit::Success.into(),
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("{e}");
            e.exit_code()
        }
    }
}

/// Logging follows the environment unless `-v` or `-q` was given.
fn init_tracing(cli: &Cli) {
    let mut config = LogConfig::from_env();
    if cli.verbose > 0 || cli.quiet {
        config.level = LogLevel::from_verbosity(cli.verbose, cli.quiet);
    }
    if let Err(e) = spec_engine_common_log::init(config) {
        eprintln!("Warning: logging disabled: {e}");
    }
}

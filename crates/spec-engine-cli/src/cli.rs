//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::commands::{ConfigCommand, GenerateCommand, MenuCommand, ValidateCommand};
use crate::error::CliError;

/// spec-engine - turn a free-form project prompt into a structured spec
///
/// Without a subcommand the interactive menu starts.
#[derive(Debug, Parser)]
#[command(
    name = "spec-engine",
    author,
    version,
    about,
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding `.spec-engine/` (config and run logs)
    #[arg(
        long,
        global = true,
        env = "SPEC_ENGINE_HOME",
        default_value = ".",
        value_hint = ValueHint::DirPath
    )]
    pub home: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a spec from a prompt
    Generate(GenerateCommand),

    /// Check a spec document against the required structure
    Validate(ValidateCommand),

    /// Manage stored API keys
    Config(ConfigCommand),

    /// Start the interactive menu
    Menu(MenuCommand),
}

/// Shared state handed to every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub home: PathBuf,
}

impl Cli {
    pub async fn execute(self) -> Result<(), CliError> {
        let ctx = CommandContext { home: self.home };

        match self.command {
            Some(Command::Generate(cmd)) => cmd.execute(&ctx).await,
            Some(Command::Validate(cmd)) => cmd.execute(&ctx).await,
            Some(Command::Config(cmd)) => cmd.execute(&ctx).await,
            Some(Command::Menu(cmd)) => cmd.execute(&ctx).await,
            None => MenuCommand::default().execute(&ctx).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_is_accepted() {
        let cli = Cli::try_parse_from(["spec-engine"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.home, PathBuf::from("."));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["spec-engine", "-q", "-v", "menu"]).is_err());
    }
}

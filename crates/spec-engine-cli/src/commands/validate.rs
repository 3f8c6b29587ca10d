//! Validate command implementation.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueHint};
use spec_engine_spec::{coerce_to_list_markdown, validate_spec_markdown};
use tracing::info;

use crate::cli::CommandContext;
use crate::error::CliError;

/// Check a spec document against the required heading and list structure
#[derive(Debug, Parser)]
pub struct ValidateCommand {
    /// Markdown file to check
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: PathBuf,

    /// Rewrite prose section content as list items before checking
    #[arg(long)]
    pub fix: bool,
}

impl ValidateCommand {
    pub async fn execute(&self, _ctx: &CommandContext) -> Result<(), CliError> {
        let original = std::fs::read_to_string(&self.file)
            .with_context(|| format!("failed to read {}", self.file.display()))?;

        let content = if self.fix {
            let coerced = coerce_to_list_markdown(&original);
            if coerced != original {
                std::fs::write(&self.file, &coerced)
                    .with_context(|| format!("failed to write {}", self.file.display()))?;
                info!(path = %self.file.display(), "Rewrote section content as lists");
            }
            coerced
        } else {
            original
        };

        let errors = validate_spec_markdown(&content);
        if !errors.is_empty() {
            return Err(CliError::InvalidDocument(errors));
        }

        println!("{}: valid", self.file.display());
        Ok(())
    }
}

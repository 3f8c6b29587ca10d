//! Command implementations.

mod config;
mod generate;
mod menu;
mod validate;

pub use config::ConfigCommand;
pub use generate::GenerateCommand;
pub use menu::MenuCommand;
pub use validate::ValidateCommand;

use spec_engine_common_config::ProviderName;

/// Clap value parser for provider names.
pub(crate) fn parse_provider(s: &str) -> Result<ProviderName, String> {
    ProviderName::parse(s).ok_or_else(|| format!("unsupported provider '{s}' (expected openai or openrouter)"))
}

//! Config command implementation.

use clap::{Parser, Subcommand};
use spec_engine_common_config::{is_valid_api_key, mask_api_key, ConfigStore, ProviderName};

use super::parse_provider;
use crate::cli::CommandContext;
use crate::error::CliError;
use crate::prompts::Prompter;

/// Manage stored API keys
#[derive(Debug, Parser)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Store an API key for a provider
    SetKey {
        /// Provider name (openai, openrouter)
        #[arg(value_parser = parse_provider)]
        provider: ProviderName,

        /// Key to store; prompted for without echo when omitted
        #[arg(long)]
        key: Option<String>,
    },

    /// Show stored keys, masked
    Show,
}

impl ConfigCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let store = ConfigStore::new(&ctx.home);
        match &self.action {
            ConfigAction::SetKey { provider, key } => {
                let key = match key {
                    Some(key) => key.trim().to_string(),
                    None => read_key(&mut Prompter::stdio(), *provider)?,
                };
                save_key(&store, *provider, &key)?;
                println!("{provider} API token saved.");
            }
            ConfigAction::Show => {
                println!("Config: {}", store.path().display());
                for provider in ProviderName::ALL {
                    let shown = store
                        .get_api_key(provider.as_str())
                        .map(|key| mask_api_key(&key))
                        .unwrap_or_else(|| "(not set)".to_string());
                    println!("{}: {shown}", provider.display_name());
                }
            }
        }
        Ok(())
    }
}

/// Prompt for a provider token.
pub(crate) fn read_key<R, W>(
    prompter: &mut Prompter<R, W>,
    provider: ProviderName,
) -> Result<String, CliError>
where
    R: std::io::BufRead,
    W: std::io::Write,
{
    Ok(prompter.password(&format!("Enter {provider} API token:"))?)
}

/// Check the key format, then store it.
pub(crate) fn save_key(store: &ConfigStore, provider: ProviderName, key: &str) -> Result<(), CliError> {
    if !is_valid_api_key(provider, key) {
        return Err(CliError::invalid_input("Invalid API key format."));
    }
    store.set_api_key(provider.as_str(), key)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_save_key_checks_format() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path());

        let err = save_key(&store, ProviderName::OpenAi, "not-a-key").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Invalid API key format.");
        assert!(store.get_api_key("openai").is_none());

        save_key(&store, ProviderName::OpenRouter, "sk-or-v1-abc").unwrap();
        assert_eq!(store.get_api_key("openrouter").as_deref(), Some("sk-or-v1-abc"));
    }

    #[test]
    fn test_read_key_from_prompt() {
        let mut p = Prompter::new(Cursor::new(b"sk-typed\n".to_vec()), Vec::new());
        assert_eq!(read_key(&mut p, ProviderName::OpenAi).unwrap(), "sk-typed");

        let mut p = Prompter::new(Cursor::new(Vec::new()), Vec::new());
        assert!(matches!(
            read_key(&mut p, ProviderName::OpenAi),
            Err(CliError::InvalidInput(_))
        ));
    }
}

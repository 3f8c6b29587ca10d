//! Interactive menu.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use spec_engine_backends_core::resolve_client_config;
use spec_engine_common_config::{is_valid_api_key, ConfigStore, Environment, ProviderName};
use tracing::debug;

use super::config::{read_key, save_key};
use super::generate::{run_generation, Generation, StrategyChoice, DEFAULT_JSON_OUTPUT, DEFAULT_OUTPUT};
use crate::cli::CommandContext;
use crate::error::CliError;
use crate::prompts::{PromptError, Prompter};

/// Start the interactive menu
#[derive(Debug, Default, Parser)]
pub struct MenuCommand {}

impl MenuCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        run_main_menu(ctx, &mut Prompter::stdio()).await
    }
}

/// Main menu loop. Ends on Exit, after one guided generation, or when input
/// closes.
pub async fn run_main_menu<R, W>(
    ctx: &CommandContext,
    prompter: &mut Prompter<R, W>,
) -> Result<(), CliError>
where
    R: BufRead + Send,
    W: Write + Send,
{
    let store = ConfigStore::new(&ctx.home);
    loop {
        prompter.say("")?;
        let choice = match prompter.select("Main Menu", &["API Keys", "Generate Spec", "Exit"]) {
            Err(PromptError::Cancelled) => return Ok(()),
            other => other?,
        };
        match choice {
            Some(0) => run_api_keys_menu(&store, prompter)?,
            Some(1) => return run_guided_generate(ctx, &store, prompter).await,
            Some(2) => return Ok(()),
            _ => prompter.say("Invalid selection.")?,
        }
    }
}

fn run_api_keys_menu<R: BufRead, W: Write>(
    store: &ConfigStore,
    prompter: &mut Prompter<R, W>,
) -> Result<(), CliError> {
    loop {
        prompter.say("")?;
        let choice = match prompter.select("API Keys", &["OpenAI", "OpenRouter", "Back"]) {
            Err(PromptError::Cancelled) => return Ok(()),
            other => other?,
        };
        let provider = match choice {
            Some(0) => ProviderName::OpenAi,
            Some(1) => ProviderName::OpenRouter,
            Some(2) => return Ok(()),
            _ => {
                prompter.say("Invalid selection.")?;
                continue;
            }
        };

        let key = read_key(prompter, provider)?;
        match save_key(store, provider, &key) {
            Ok(()) => prompter.say(&format!("{provider} API token saved."))?,
            Err(CliError::InvalidInput(msg)) => prompter.say(&msg)?,
            Err(e) => return Err(e),
        }
    }
}

async fn run_guided_generate<R, W>(
    ctx: &CommandContext,
    store: &ConfigStore,
    prompter: &mut Prompter<R, W>,
) -> Result<(), CliError>
where
    R: BufRead + Send,
    W: Write + Send,
{
    let choice = if prompter.confirm("Use an LLM? (y/n)")? {
        let provider = ask_provider(prompter)?;
        let key = store
            .get_api_key(provider.as_str())
            .filter(|key| is_valid_api_key(provider, key))
            .ok_or(CliError::MissingApiKey(provider))?;
        let config = resolve_client_config(Some(provider.as_str()), Some(&key), Environment::get)?;
        StrategyChoice::llm(config, None)
    } else {
        StrategyChoice::Heuristic
    };

    let prompt = prompter.ask("Enter the prompt:")?;
    if prompt.is_empty() {
        return Err(CliError::invalid_input("prompt is required."));
    }

    let output = prompter.ask(&format!("Enter output file path (default: {DEFAULT_OUTPUT}):"))?;
    let as_json = ask_json_output(prompter)?;
    let output = match output.as_str() {
        "" | DEFAULT_OUTPUT if as_json => DEFAULT_JSON_OUTPUT,
        "" => DEFAULT_OUTPUT,
        other => other,
    };
    debug!(output, as_json, "Guided generation");

    let generation = Generation {
        prompt,
        output: PathBuf::from(output),
        as_json,
        interactive: true,
    };
    run_generation(ctx, &generation, || Ok(choice), prompter).await?;
    Ok(())
}

fn ask_provider<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<ProviderName, CliError> {
    loop {
        match prompter.select("Select API key provider", &["OpenRouter", "OpenAI"])? {
            Some(0) => return Ok(ProviderName::OpenRouter),
            Some(1) => return Ok(ProviderName::OpenAi),
            _ => prompter.say("Invalid selection.")?,
        }
    }
}

fn ask_json_output<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<bool, CliError> {
    loop {
        match prompter.select("Select output representation", &["Markdown", "JSON"])? {
            Some(0) => return Ok(false),
            Some(1) => return Ok(true),
            _ => prompter.say("Invalid selection.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn setup() -> (TempDir, CommandContext) {
        let dir = TempDir::new().unwrap();
        let ctx = CommandContext {
            home: dir.path().to_path_buf(),
        };
        (dir, ctx)
    }

    fn prompter(input: String) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.into_bytes()), Vec::new())
    }

    #[tokio::test]
    async fn test_exit_and_invalid_selection() {
        let (_dir, ctx) = setup();
        let mut p = prompter("7\n3\n".to_string());
        run_main_menu(&ctx, &mut p).await.unwrap();

        let out = String::from_utf8(p.into_writer()).unwrap();
        assert!(out.contains("Main Menu\n1. API Keys\n2. Generate Spec\n3. Exit\n> "));
        assert!(out.contains("Invalid selection."));
    }

    #[tokio::test]
    async fn test_closed_input_leaves_menu() {
        let (_dir, ctx) = setup();
        run_main_menu(&ctx, &mut prompter(String::new())).await.unwrap();
    }

    #[tokio::test]
    async fn test_api_keys_menu_saves_valid_key() {
        let (dir, ctx) = setup();
        let mut p = prompter("1\n2\nbad-key\n2\nsk-or-v1-123\n3\n3\n".to_string());
        run_main_menu(&ctx, &mut p).await.unwrap();

        let out = String::from_utf8(p.into_writer()).unwrap();
        assert!(out.contains("Invalid API key format."));
        assert!(out.contains("openrouter API token saved."));
        assert_eq!(
            ConfigStore::new(dir.path()).get_api_key("openrouter").as_deref(),
            Some("sk-or-v1-123")
        );
    }

    #[tokio::test]
    async fn test_llm_without_stored_key_fails() {
        let (_dir, ctx) = setup();
        let mut p = prompter("2\ny\n1\n".to_string());
        let err = run_main_menu(&ctx, &mut p).await.unwrap_err();
        assert!(matches!(err, CliError::MissingApiKey(ProviderName::OpenRouter)));
    }

    #[tokio::test]
    async fn test_empty_prompt_is_invalid_input() {
        let (_dir, ctx) = setup();
        let err = run_main_menu(&ctx, &mut prompter("2\nn\n\n".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: prompt is required.");
    }

    #[tokio::test]
    async fn test_guided_generation_writes_json() {
        let (dir, ctx) = setup();
        let output = dir.path().join("spec.json");
        // Follow-up questions read closed input as blank answers.
        let answers = format!("2\nn\nA cli that reconciles bank CSV exports\n{}\n2\n", output.display());

        let mut p = prompter(answers);
        run_main_menu(&ctx, &mut p).await.unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert!(json["fields"].is_object());
        let out = String::from_utf8(p.into_writer()).unwrap();
        assert!(out.contains(&format!("Generated: {}", output.display())));
    }
}

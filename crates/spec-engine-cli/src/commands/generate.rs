//! Spec generation, shared by `generate` and the interactive menu.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueHint};
use spec_engine_backends_core::{resolve_client_config, ClientConfig, LlmStrategy, OpenAiResponsesClient};
use spec_engine_common_config::{ApiKeys, ConfigStore, Environment, ProviderName};
use spec_engine_common_log::RunLogger;
use spec_engine_spec::{
    build_spec_draft, coerce_to_list_markdown, render_spec_markdown, validate_spec_markdown,
    ExtractionStrategy, HeuristicStrategy, ProviderError, SpecDraft,
};
use tracing::{debug, info, warn};

use super::parse_provider;
use crate::cli::CommandContext;
use crate::error::CliError;
use crate::prompts::Prompter;

pub const DEFAULT_OUTPUT: &str = "./SPEC.md";
pub const DEFAULT_JSON_OUTPUT: &str = "./SPEC.json";

/// Generate a spec document from a prompt
#[derive(Debug, Parser)]
pub struct GenerateCommand {
    /// Free-form project description
    #[arg(long)]
    pub prompt: Option<String>,

    /// Where to write the document
    #[arg(long, default_value = DEFAULT_OUTPUT, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Write the field map as JSON instead of markdown
    #[arg(long)]
    pub json: bool,

    /// Ask follow-up questions for missing or ambiguous fields (default)
    #[arg(long, overrides_with = "no_interactive")]
    pub interactive: bool,

    /// Never ask; fail when required fields are missing
    #[arg(long, overrides_with = "interactive")]
    pub no_interactive: bool,

    /// Extract with an LLM provider instead of local heuristics
    #[arg(long)]
    pub use_llm: bool,

    /// Model name (defaults to the provider's default, gpt-5-mini for OpenAI)
    #[arg(long)]
    pub model: Option<String>,

    /// Provider to use with --use-llm (openai, openrouter)
    #[arg(long, value_parser = parse_provider)]
    pub provider: Option<ProviderName>,

    /// Override the provider API base URL
    #[arg(long, env = "SPEC_ENGINE_BASE_URL", value_hint = ValueHint::Url)]
    pub base_url: Option<String>,
}

impl GenerateCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let generation = Generation {
            prompt: self.prompt.clone().unwrap_or_default(),
            output: self.output.clone(),
            as_json: self.json,
            interactive: !self.no_interactive,
        };

        let mut prompter = Prompter::stdio();
        run_generation(ctx, &generation, || self.strategy_choice(ctx), &mut prompter).await?;
        Ok(())
    }

    fn strategy_choice(&self, ctx: &CommandContext) -> Result<StrategyChoice, CliError> {
        if !self.use_llm {
            return Ok(StrategyChoice::Heuristic);
        }

        let mut config = match self.provider {
            None => resolve_client_config(None, None, Environment::get)?,
            Some(provider) => {
                let key = ConfigStore::new(&ctx.home)
                    .get_api_key(provider.as_str())
                    .or_else(|| ApiKeys::for_provider(provider.as_str()))
                    .ok_or_else(|| {
                        ProviderError::Credentials(format!(
                            "Missing API key for {provider}. Set {} or run `spec-engine config set-key {provider}`.",
                            provider.env_var()
                        ))
                    })?;
                resolve_client_config(Some(provider.as_str()), Some(&key), Environment::get)?
            }
        };

        if let Some(url) = &self.base_url {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        Ok(StrategyChoice::llm(config, self.model.clone()))
    }
}

/// One generation request.
#[derive(Debug, Clone)]
pub struct Generation {
    pub prompt: String,
    pub output: PathBuf,
    pub as_json: bool,
    pub interactive: bool,
}

/// Which extraction strategy a run uses.
#[derive(Debug)]
pub enum StrategyChoice {
    Heuristic,
    Llm { config: ClientConfig, model: String },
}

impl StrategyChoice {
    /// LLM choice; without a model the provider default is used.
    pub fn llm(config: ClientConfig, model: Option<String>) -> Self {
        let model = model.unwrap_or_else(|| config.provider.default_model().to_string());
        Self::Llm { config, model }
    }
}

/// Run one generation and record it in the run log, whatever the outcome.
///
/// `choose` is called only once the prompt has been accepted, so an empty
/// prompt is reported before any credential problem.
pub async fn run_generation<R, W, C>(
    ctx: &CommandContext,
    generation: &Generation,
    choose: C,
    prompter: &mut Prompter<R, W>,
) -> Result<PathBuf, CliError>
where
    R: BufRead + Send,
    W: Write + Send,
    C: FnOnce() -> Result<StrategyChoice, CliError>,
{
    let logger = Arc::new(
        RunLogger::new("generate", generation.output.display().to_string()).with_base_dir(&ctx.home),
    );

    let outcome = generate(generation, choose, Arc::clone(&logger), prompter).await;

    let (label, code) = match &outcome {
        Ok(_) => ("success", 0),
        Err(e) => (e.outcome(), e.exit() as i32),
    };
    match logger.finalize(label, code) {
        Ok(path) => debug!(path = %path.display(), "Run log written"),
        Err(e) => warn!(error = %e, "Failed to write run log"),
    }

    let path = outcome?;
    prompter
        .say(&format!("Generated: {}", path.display()))
        .context("failed to write to stdout")?;
    Ok(path)
}

async fn generate<R, W, C>(
    generation: &Generation,
    choose: C,
    logger: Arc<RunLogger>,
    prompter: &mut Prompter<R, W>,
) -> Result<PathBuf, CliError>
where
    R: BufRead + Send,
    W: Write + Send,
    C: FnOnce() -> Result<StrategyChoice, CliError>,
{
    if generation.prompt.trim().is_empty() {
        return Err(CliError::invalid_input(
            "prompt is required and must be non-empty.",
        ));
    }

    let strategy: Box<dyn ExtractionStrategy> = match choose()? {
        StrategyChoice::Heuristic => Box::new(HeuristicStrategy::new()),
        StrategyChoice::Llm { config, model } => {
            let client = OpenAiResponsesClient::new(&config)?;
            let strategy = LlmStrategy::new(Arc::new(client), model).with_observer(logger);
            info!(provider = %config.provider, model = strategy.model(), "Using LLM extraction");
            Box::new(strategy)
        }
    };

    let mut ask = |question: &str| match prompter.ask(question) {
        Ok(answer) => answer,
        Err(e) => {
            debug!(error = %e, "No answer read");
            String::new()
        }
    };
    let result = build_spec_draft(
        &generation.prompt,
        generation.interactive,
        strategy.as_ref(),
        &mut ask,
    )
    .await?;

    if !generation.interactive {
        result.ensure_complete()?;
    }

    let content = if generation.as_json {
        result
            .to_json_pretty()
            .context("failed to serialize spec")?
    } else {
        checked_markdown(strategy.as_ref(), &result.draft).await?
    };

    write_output(&generation.output, &content)?;
    Ok(generation.output.clone())
}

/// Markdown from the strategy, or the local renderer, that passes
/// validation. One coercion pass is allowed before giving up.
async fn checked_markdown(
    strategy: &dyn ExtractionStrategy,
    draft: &SpecDraft,
) -> Result<String, CliError> {
    let markdown = match strategy.generate_markdown(draft).await? {
        Some(markdown) => markdown,
        None => render_spec_markdown(draft),
    };

    if validate_spec_markdown(&markdown).is_empty() {
        return Ok(markdown);
    }

    warn!("Generated markdown failed validation, coercing list structure");
    let coerced = coerce_to_list_markdown(&markdown);
    let errors = validate_spec_markdown(&coerced);
    if !errors.is_empty() {
        return Err(CliError::Validation(errors));
    }
    Ok(coerced)
}

fn write_output(path: &Path, content: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, format!("{}\n", content.trim_end()))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

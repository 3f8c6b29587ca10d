//! LLM-backed extraction strategy.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use spec_engine_common_log::CallEvent;
use spec_engine_spec::{ExtractionStrategy, FieldName, ProviderError, SpecDraft, EXPECTED_HEADINGS};
use tracing::{debug, warn};

use crate::client::{CompletionClient, CompletionRequest, TokenUsage};
use crate::cost::estimate_cost_usd;
use crate::observer::CallObserver;
use crate::retry::RetryPolicy;
use crate::schema;

/// Follow-up questions allowed per run.
pub const LLM_FOLLOWUP_LIMIT: usize = 3;

/// Strategy delegating every stage to a completion client.
///
/// Failures are never papered over with local heuristics: once the retry
/// budget is spent the error reaches the caller.
pub struct LlmStrategy {
    client: Arc<dyn CompletionClient>,
    model: String,
    retry: RetryPolicy,
    observer: Option<Arc<dyn CallObserver>>,
}

impl LlmStrategy {
    /// Create a strategy calling `model` through `client` with the default
    /// retry policy and no observer.
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            retry: RetryPolicy::default(),
            observer: None,
        }
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Report every completion call to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn CallObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Model name sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Call the client and parse its JSON reply, retrying the whole
    /// call-and-validate sequence under the retry policy.
    async fn call_json<T, P>(
        &self,
        stage: &str,
        instructions: &str,
        input: &str,
        parse: P,
    ) -> Result<T, ProviderError>
    where
        P: Fn(&Map<String, Value>) -> Result<T, ProviderError> + Send + Sync,
        T: Send,
    {
        let request = CompletionRequest {
            model: self.model.clone(),
            stage: stage.to_string(),
            instructions: ensure_json_keyword(instructions),
            input: ensure_json_keyword(input),
        };
        let attempts = self.retry.attempts();
        let mut last_error = None;

        for attempt in 0..attempts {
            let started = Instant::now();
            let outcome = async {
                let response = self.client.complete(request.clone()).await?;
                let payload = schema::parse_object(&response.output_text)?;
                Ok::<_, ProviderError>((parse(&payload)?, response.usage))
            }
            .await;

            match outcome {
                Ok((value, usage)) => {
                    self.emit(stage, started, usage, attempt, true);
                    return Ok(value);
                }
                Err(e) => {
                    warn!(stage, attempt = attempt + 1, attempts, error = %e, "LLM call failed");
                    if attempt + 1 == attempts {
                        self.emit(stage, started, TokenUsage::default(), attempt, false);
                    }
                    last_error = Some(e);
                    self.retry.pause(attempt).await;
                }
            }
        }

        Err(ProviderError::Exhausted {
            attempts,
            last: Box::new(last_error.unwrap_or(ProviderError::EmptyResponse)),
        })
    }

    fn emit(&self, stage: &str, started: Instant, usage: TokenUsage, attempt: u32, schema_valid: bool) {
        let Some(observer) = &self.observer else {
            return;
        };
        observer.on_call(CallEvent {
            stage: stage.to_string(),
            model: self.model.clone(),
            latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
            estimated_cost_usd: estimate_cost_usd(
                &self.model,
                usage.prompt_tokens,
                usage.completion_tokens,
            ),
            retry_count: attempt,
            schema_valid,
        });
    }
}

fn extraction_schema_instructions() -> String {
    let keys = FieldName::ALL
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Return JSON object with keys: {keys}. Each key must map to object: \
         {{\"value\": string, \"confidence\": number, \"rationale\": string}}. \
         confidence must be between 0 and 1. No extra keys."
    )
}

/// Append a json hint when the text does not mention it; JSON mode on the
/// Responses API rejects requests without one.
fn ensure_json_keyword(text: &str) -> String {
    let value = text.trim();
    if value.to_lowercase().contains("json") {
        value.to_string()
    } else {
        format!("{value}\nReturn valid json.")
    }
}

fn draft_json(draft: &SpecDraft) -> Result<String, ProviderError> {
    serde_json::to_string(draft).map_err(|e| ProviderError::MalformedJson(e.to_string()))
}

#[async_trait]
impl ExtractionStrategy for LlmStrategy {
    fn name(&self) -> &str {
        "llm"
    }

    async fn extract_requirements(&self, prompt: &str) -> Result<SpecDraft, ProviderError> {
        let instructions = format!(
            "Extract required spec fields from the prompt. {}",
            extraction_schema_instructions()
        );
        self.call_json("parse_prompt", &instructions, prompt, schema::draft_from_payload)
            .await
    }

    async fn generate_followup(
        &self,
        field: FieldName,
        draft: &SpecDraft,
    ) -> Result<String, ProviderError> {
        let instructions = "Generate one concise follow-up question. \
            Ask for exactly one missing or ambiguous field. \
            No preamble. One sentence. Return JSON: {\"question\": \"...\"}.";
        let input = json!({
            "target_field": field.as_str(),
            "existing_fields": draft,
        })
        .to_string();
        debug!(field = %field, "Generating follow-up");
        self.call_json("generate_followup", instructions, &input, schema::question_from_payload)
            .await
    }

    async fn normalize_spec(&self, draft: SpecDraft) -> Result<SpecDraft, ProviderError> {
        let instructions = format!(
            "Normalize terminology and wording for consistency. \
             Do not invent missing facts. {}",
            extraction_schema_instructions()
        );
        let input = draft_json(&draft)?;
        self.call_json("normalize", &instructions, &input, schema::draft_from_payload)
            .await
    }

    async fn generate_markdown(&self, draft: &SpecDraft) -> Result<Option<String>, ProviderError> {
        let instructions = format!(
            "Write a project specification in markdown from the given fields. \
             Use exactly these headings, each on its own line, in this order: {}. \
             Under headings write only '- ' bullets or 'N. ' numbered items. \
             Do not invent missing facts. Return JSON: {{\"markdown\": \"...\"}}.",
            EXPECTED_HEADINGS.join(" | ")
        );
        let input = draft_json(draft)?;
        self.call_json("generate_markdown", &instructions, &input, schema::markdown_from_payload)
            .await
            .map(Some)
    }

    fn followup_limit(&self) -> Option<usize> {
        Some(LLM_FOLLOWUP_LIMIT)
    }
}

//! Completion clients.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use spec_engine_common_config::ProviderName;
use spec_engine_common_http::{parse_json, HttpClient, RequestBuilder};
use spec_engine_spec::ProviderError;

use crate::config::ClientConfig;

/// One JSON-mode completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    /// Pipeline stage, e.g. `parse_prompt`. Used for logging only.
    pub stage: String,
    pub instructions: String,
    pub input: String,
}

/// Token usage reported by the provider. Zero when not reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionResponse {
    pub output_text: String,
    pub usage: TokenUsage,
}

/// Text completion constrained to a JSON object.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError>;
}

/// Client for `POST {base_url}/responses`.
pub struct OpenAiResponsesClient {
    http: HttpClient,
    request: RequestBuilder,
    provider: String,
}

impl OpenAiResponsesClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ProviderError> {
        let http = HttpClient::new().map_err(|e| ProviderError::Transport(e.to_string()))?;
        let mut request = RequestBuilder::new()
            .base_url(config.base_url.clone())
            .bearer_auth(&config.api_key)
            .json_content();
        if config.provider == ProviderName::OpenRouter {
            // OpenRouter attributes traffic by app title.
            request = request.header("X-Title", "spec-engine");
        }
        Ok(Self {
            http,
            request,
            provider: config.provider.as_str().to_string(),
        })
    }
}

#[derive(Serialize)]
struct ResponsesBody<'a> {
    model: &'a str,
    instructions: &'a str,
    input: &'a str,
    text: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsesReply {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
    #[serde(default)]
    usage: Option<UsageReply>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentItem>,
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UsageReply {
    input_tokens: Option<u64>,
    prompt_tokens: Option<u64>,
    output_tokens: Option<u64>,
    completion_tokens: Option<u64>,
    total_tokens: Option<u64>,
}

impl ResponsesReply {
    /// `output_text` when present, otherwise the concatenated
    /// `output_text` content items.
    fn text(&self) -> String {
        if let Some(text) = self.output_text.as_deref().filter(|t| !t.is_empty()) {
            return text.to_string();
        }
        self.output
            .iter()
            .flat_map(|item| &item.content)
            .filter(|content| content.kind == "output_text")
            .filter_map(|content| content.text.as_deref())
            .collect()
    }

    fn usage(&self) -> TokenUsage {
        let Some(usage) = &self.usage else {
            return TokenUsage::default();
        };
        let prompt_tokens = usage.input_tokens.or(usage.prompt_tokens).unwrap_or(0);
        let completion_tokens = usage.output_tokens.or(usage.completion_tokens).unwrap_or(0);
        TokenUsage {
            prompt_tokens,
            completion_tokens,
            total_tokens: usage
                .total_tokens
                .unwrap_or(prompt_tokens + completion_tokens),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiResponsesClient {
    fn name(&self) -> &str {
        &self.provider
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let body = ResponsesBody {
            model: &request.model,
            instructions: &request.instructions,
            input: &request.input,
            text: json!({"format": {"type": "json_object"}}),
        };

        tracing::debug!(provider = %self.provider, stage = %request.stage, model = %request.model, "Requesting completion");
        let response = self
            .http
            .post_json(&self.request, "/responses", &body)
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let reply: ResponsesReply = parse_json(response)
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(CompletionResponse {
            output_text: reply.text(),
            usage: reply.usage(),
        })
    }
}

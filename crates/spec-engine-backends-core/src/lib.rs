//! LLM integration for spec-engine.
//!
//! [`LlmStrategy`] implements the extraction contract on top of any
//! [`CompletionClient`]; [`OpenAiResponsesClient`] talks to OpenAI-compatible
//! Responses endpoints (OpenAI itself and OpenRouter).

pub mod client;
pub mod config;
pub mod cost;
pub mod observer;
pub mod retry;
pub mod schema;
pub mod strategy;

pub use client::{CompletionClient, CompletionRequest, CompletionResponse, OpenAiResponsesClient, TokenUsage};
pub use config::{resolve_client_config, ClientConfig};
pub use cost::estimate_cost_usd;
pub use observer::CallObserver;
pub use retry::RetryPolicy;
pub use strategy::LlmStrategy;

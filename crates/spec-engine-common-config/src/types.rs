//! Configuration types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::env::vars;

/// Root of `.spec-engine/config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecEngineConfig {
    /// Stored API keys by provider name. Entries are kept as raw JSON so
    /// foreign values survive a save.
    #[serde(default)]
    pub api_keys: BTreeMap<String, Value>,
    /// Any other top-level keys, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SpecEngineConfig {
    /// Build from an arbitrary JSON document, falling back to defaults for
    /// anything with the wrong shape.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut root) = value else {
            return Self::default();
        };
        let api_keys = match root.remove("api_keys") {
            Some(Value::Object(keys)) => keys.into_iter().collect(),
            _ => BTreeMap::new(),
        };
        Self {
            api_keys,
            extra: root,
        }
    }

    /// Stored key for a provider, if it is a string.
    pub fn api_key(&self, provider: &str) -> Option<&str> {
        self.api_keys.get(provider).and_then(Value::as_str)
    }

    /// Store a key for a provider.
    pub fn set_api_key(&mut self, provider: &str, key: impl Into<String>) {
        self.api_keys
            .insert(provider.to_string(), Value::String(key.into()));
    }
}

/// Supported completion providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderName {
    OpenAi,
    OpenRouter,
}

impl ProviderName {
    pub const ALL: [ProviderName; 2] = [ProviderName::OpenAi, ProviderName::OpenRouter];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::OpenRouter => "openrouter",
        }
    }

    /// Case-insensitive parse; surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "openrouter" => Some(Self::OpenRouter),
            _ => None,
        }
    }

    /// Base URL of the OpenAI-compatible API.
    pub fn base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::OpenRouter => "https://openrouter.ai/api/v1",
        }
    }

    /// Model used when none is given.
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-5-mini",
            Self::OpenRouter => "openai/gpt-4o-mini",
        }
    }

    /// Environment variable holding the provider's key.
    pub fn env_var(self) -> &'static str {
        match self {
            Self::OpenAi => vars::OPENAI_API_KEY,
            Self::OpenRouter => vars::OPENROUTER_API_KEY,
        }
    }

    /// Human-facing name used in menus.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::OpenRouter => "OpenRouter",
        }
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format check for a provider key. Does not contact the provider.
pub fn is_valid_api_key(provider: ProviderName, key: &str) -> bool {
    let key = key.trim();
    match provider {
        ProviderName::OpenAi => key.starts_with("sk-"),
        // `sk-or-` keys also start with `sk-`.
        ProviderName::OpenRouter => key.starts_with("sk-"),
    }
}

/// Mask a key for display, keeping a short prefix and suffix.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

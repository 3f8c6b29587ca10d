//! Client configuration resolution.

use spec_engine_common_config::{vars, ProviderName};
use spec_engine_spec::ProviderError;

/// Connection settings for one completion provider.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub provider: ProviderName,
    pub api_key: String,
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(provider: ProviderName, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            base_url: provider.base_url().to_string(),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Pick provider and key.
///
/// An explicit provider with a key wins. Otherwise `OPENROUTER_API_KEY` is
/// preferred over `OPENAI_API_KEY`, read through `lookup` so callers decide
/// where environment values come from.
pub fn resolve_client_config(
    provider: Option<&str>,
    api_key: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ClientConfig, ProviderError> {
    if let (Some(provider), Some(api_key)) = (provider, api_key) {
        let name = ProviderName::parse(provider)
            .ok_or_else(|| ProviderError::UnsupportedProvider(provider.to_string()))?;
        let key = api_key.trim();
        if key.is_empty() {
            return Err(ProviderError::Credentials("API key is empty.".to_string()));
        }
        return Ok(ClientConfig::new(name, key));
    }

    let from_env = |var: &str| {
        lookup(var)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if let Some(key) = from_env(vars::OPENROUTER_API_KEY) {
        return Ok(ClientConfig::new(ProviderName::OpenRouter, key));
    }
    if let Some(key) = from_env(vars::OPENAI_API_KEY) {
        return Ok(ClientConfig::new(ProviderName::OpenAi, key));
    }

    Err(ProviderError::Credentials(
        "Missing API key. Set OPENAI_API_KEY or OPENROUTER_API_KEY when --use-llm is enabled."
            .to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_explicit_provider_wins() {
        let config = resolve_client_config(
            Some("OpenRouter"),
            Some(" sk-or-1 "),
            env(&[("OPENAI_API_KEY", "sk-env")]),
        )
        .unwrap();
        assert_eq!(config.provider, ProviderName::OpenRouter);
        assert_eq!(config.api_key, "sk-or-1");
        assert_eq!(config.base_url, "https://openrouter.ai/api/v1");
    }

    #[test]
    fn test_explicit_empty_key_is_rejected() {
        let err = resolve_client_config(Some("openai"), Some("  "), env(&[])).unwrap_err();
        assert_eq!(err.to_string(), "API key is empty.");
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let err = resolve_client_config(Some("anthropic"), Some("sk-1"), env(&[])).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported provider: anthropic");
    }

    #[test]
    fn test_openrouter_env_takes_precedence() {
        let config = resolve_client_config(
            None,
            None,
            env(&[("OPENAI_API_KEY", "sk-a"), ("OPENROUTER_API_KEY", "sk-or-b")]),
        )
        .unwrap();
        assert_eq!(config.provider, ProviderName::OpenRouter);
        assert_eq!(config.api_key, "sk-or-b");

        let config =
            resolve_client_config(None, None, env(&[("OPENROUTER_API_KEY", " "), ("OPENAI_API_KEY", "sk-a")]))
                .unwrap();
        assert_eq!(config.provider, ProviderName::OpenAi);
        assert_eq!(config.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_missing_keys() {
        let err = resolve_client_config(None, None, env(&[])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing API key. Set OPENAI_API_KEY or OPENROUTER_API_KEY when --use-llm is enabled."
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ClientConfig::new(ProviderName::OpenAi, "sk-secret");
        assert!(!format!("{config:?}").contains("sk-secret"));
    }
}

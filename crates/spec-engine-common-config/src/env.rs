//! Environment variable handling.

use std::env;

/// Environment variable names.
pub mod vars {
    // API keys
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";

    // Logging
    pub const SPEC_ENGINE_LOG_LEVEL: &str = "SPEC_ENGINE_LOG_LEVEL";
    pub const SPEC_ENGINE_LOG_FORMAT: &str = "SPEC_ENGINE_LOG_FORMAT";
    pub const SPEC_ENGINE_LOG_FILE: &str = "SPEC_ENGINE_LOG_FILE";
    pub const RUST_LOG: &str = "RUST_LOG";
}

/// Process environment, seeded from `.env` files.
pub struct Environment {
    _guard: (),
}

impl Environment {
    /// Load `.env` then `.env.local` from the working directory. Variables
    /// already set in the process win; missing files are ignored.
    pub fn init() -> Self {
        for file in [".env", ".env.local"] {
            if dotenvy::from_filename(file).is_ok() {
                tracing::debug!(file, "Loaded environment file");
            }
        }
        Self { _guard: () }
    }

    /// Get a variable, treating blank values as unset.
    pub fn get(var: &str) -> Option<String> {
        env::var(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// API key lookup from the environment.
pub struct ApiKeys;

impl ApiKeys {
    pub fn openai() -> Option<String> {
        Environment::get(vars::OPENAI_API_KEY)
    }

    pub fn openrouter() -> Option<String> {
        Environment::get(vars::OPENROUTER_API_KEY)
    }

    /// Key for a provider by name.
    pub fn for_provider(provider: &str) -> Option<String> {
        match provider.trim().to_lowercase().as_str() {
            "openai" => Self::openai(),
            "openrouter" => Self::openrouter(),
            _ => None,
        }
    }
}

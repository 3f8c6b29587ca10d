//! Config file loading and saving.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::types::SpecEngineConfig;

/// Directory holding spec-engine state under the base directory.
pub const CONFIG_DIR_NAME: &str = ".spec-engine";
/// Config file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Config store errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reads and writes `.spec-engine/config.json`.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    base_path: PathBuf,
}

impl ConfigStore {
    /// Create a store rooted at `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Full path of the config file.
    pub fn path(&self) -> PathBuf {
        self.base_path.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
    }

    /// Load the config. Missing, unreadable or malformed files yield the
    /// empty default.
    pub fn load(&self) -> SpecEngineConfig {
        let path = self.path();
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return SpecEngineConfig::default();
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read config, using defaults");
                return SpecEngineConfig::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(value) => SpecEngineConfig::from_value(value),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Config is not valid JSON, using defaults");
                SpecEngineConfig::default()
            }
        }
    }

    /// Write the config as pretty JSON with a trailing newline.
    pub fn save(&self, config: &SpecEngineConfig) -> Result<(), ConfigError> {
        let path = self.path();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let mut json = serde_json::to_string_pretty(config)?;
        json.push('\n');
        std::fs::write(&path, json).map_err(|source| ConfigError::Io { path, source })
    }

    /// Store a key for `provider`, keeping everything else in the file.
    pub fn set_api_key(&self, provider: &str, api_key: &str) -> Result<(), ConfigError> {
        let mut config = self.load();
        config.set_api_key(provider, api_key);
        self.save(&config)
    }

    /// Stored key for `provider`, if present and a string.
    pub fn get_api_key(&self, provider: &str) -> Option<String> {
        self.load().api_key(provider).map(str::to_string)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

//! CLI error types.

use std::process::ExitCode;

use spec_engine_common_config::{ConfigError, ProviderName};
use spec_engine_spec::{FieldName, ProviderError, SpecError};
use thiserror::Error;

use crate::prompts::PromptError;

/// Process exit statuses.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success = 0,
    /// Required fields missing, or a checked document is invalid.
    MissingFields = 1,
    /// Unusable user input.
    InvalidInput = 2,
    /// Provider, validation or I/O failure.
    Internal = 3,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing required information: {}", join_fields(.0))]
    MissingFields(Vec<FieldName>),

    /// `validate` found structural problems.
    #[error("{}", .0.join("\n"))]
    InvalidDocument(Vec<String>),

    #[error("No valid {} API key configured. Add it in API Keys menu.", .0.as_str())]
    MissingApiKey(ProviderName),

    #[error("Internal error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Internal error: spec markdown failed structural validation:\n{}", .0.join("\n"))]
    Validation(Vec<String>),

    #[error("Internal error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl From<SpecError> for CliError {
    fn from(err: SpecError) -> Self {
        match err {
            SpecError::InvalidInput(msg) => Self::InvalidInput(msg),
            SpecError::IncompleteSpec { missing } => Self::MissingFields(missing),
            SpecError::Provider(e) => Self::Provider(e),
            SpecError::Validation { errors } => Self::Validation(errors),
        }
    }
}

impl From<PromptError> for CliError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::Cancelled => Self::invalid_input("input closed before an answer was given."),
            PromptError::Io(e) => Self::Internal(e.into()),
        }
    }
}

impl CliError {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Exit status for this error.
    pub fn exit(&self) -> Exit {
        match self {
            Self::InvalidInput(_) => Exit::InvalidInput,
            Self::MissingFields(_) | Self::InvalidDocument(_) => Exit::MissingFields,
            Self::MissingApiKey(_)
            | Self::Provider(_)
            | Self::Validation(_)
            | Self::Config(_)
            | Self::Internal(_) => Exit::Internal,
        }
    }

    /// Get the process exit code.
    pub fn exit_code(&self) -> ExitCode {
        self.exit().into()
    }

    /// Outcome label written to the run log.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::MissingFields(_) => "missing_fields",
            Self::InvalidDocument(_) | Self::Validation(_) => "validation_error",
            Self::MissingApiKey(_) | Self::Provider(_) => "provider_error",
            Self::Config(_) | Self::Internal(_) => "internal_error",
        }
    }
}

fn join_fields(fields: &[FieldName]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

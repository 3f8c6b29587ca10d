//! Error types for spec generation.

use thiserror::Error;

use crate::model::FieldName;

/// Errors raised while building or checking a spec.
#[derive(Debug, Error)]
pub enum SpecError {
    /// The prompt (or another user input) was unusable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Required fields are still missing after a non-interactive run.
    #[error("Missing required information: {}", join_fields(.missing))]
    IncompleteSpec { missing: Vec<FieldName> },

    /// The extraction strategy failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The rendered document does not follow the required structure.
    #[error("Spec markdown failed structural validation:\n{}", .errors.join("\n"))]
    Validation { errors: Vec<String> },
}

impl SpecError {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Failures of an external extraction provider.
///
/// Every variant is fatal for the current run once the retry budget is spent;
/// callers never fall back to local heuristics.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Credentials are absent or malformed.
    #[error("{0}")]
    Credentials(String),

    /// The configured provider is unknown.
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// The request did not complete.
    #[error("LLM request failed: {0}")]
    Transport(String),

    /// The completion contained no text.
    #[error("LLM returned empty response.")]
    EmptyResponse,

    /// The completion text was not a JSON object.
    #[error("LLM returned malformed JSON: {0}")]
    MalformedJson(String),

    /// The JSON payload violated the expected schema.
    #[error("{0}")]
    Schema(String),

    /// Follow-up generation produced no question.
    #[error("LLM follow-up generation returned empty question.")]
    EmptyQuestion,

    /// Generated markdown lacks part of the heading skeleton.
    #[error("LLM markdown is missing required headings: {}", .0.join(", "))]
    MissingHeadings(Vec<String>),

    /// All attempts failed; carries the last failure.
    #[error("LLM request failed after {attempts} attempt(s): {last}")]
    Exhausted {
        attempts: u32,
        last: Box<ProviderError>,
    },
}

impl ProviderError {
    /// Create a schema violation error.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }
}

fn join_fields(fields: &[FieldName]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_spec_lists_fields_in_order() {
        let err = SpecError::IncompleteSpec {
            missing: vec![FieldName::ProjectName, FieldName::NonGoals],
        };
        assert_eq!(
            err.to_string(),
            "Missing required information: project_name, non_goals"
        );
    }

    #[test]
    fn test_exhausted_wraps_last_failure() {
        let err = ProviderError::Exhausted {
            attempts: 2,
            last: Box::new(ProviderError::EmptyResponse),
        };
        let message = err.to_string();
        assert!(message.contains("after 2 attempt(s)"));
        assert!(message.contains("empty response"));
    }

    #[test]
    fn test_provider_error_converts_into_spec_error() {
        let err: SpecError = ProviderError::EmptyQuestion.into();
        assert!(matches!(err, SpecError::Provider(ProviderError::EmptyQuestion)));
    }
}

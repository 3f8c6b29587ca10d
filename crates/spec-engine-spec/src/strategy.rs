//! Extraction strategy contract and the local heuristic implementation.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::model::{FieldName, SpecDraft};
use crate::parsing::PromptParser;

/// Turns prompts into drafts and drives follow-ups for a run.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Extract a full draft from the raw prompt.
    async fn extract_requirements(&self, prompt: &str) -> Result<SpecDraft, ProviderError>;

    /// Produce a follow-up question for one field.
    async fn generate_followup(
        &self,
        field: FieldName,
        draft: &SpecDraft,
    ) -> Result<String, ProviderError>;

    /// Final normalization pass over the whole draft.
    async fn normalize_spec(&self, draft: SpecDraft) -> Result<SpecDraft, ProviderError>;

    /// Generate the document directly. `None` means the caller renders it.
    async fn generate_markdown(&self, _draft: &SpecDraft) -> Result<Option<String>, ProviderError> {
        Ok(None)
    }

    /// Maximum follow-up questions per run, if capped.
    fn followup_limit(&self) -> Option<usize> {
        None
    }
}

/// Fixed follow-up question for a field.
pub fn followup_question(field: FieldName) -> &'static str {
    match field {
        FieldName::ProjectName => "What is the project name?",
        FieldName::ProjectType => {
            "What is the project type? (library, service, CLI tool, web app, backend API, frontend UI, full-stack app)"
        }
        FieldName::PrimaryGoal => "What is the primary goal in one sentence?",
        FieldName::TargetUsers => "Who are the target users?",
        FieldName::Inputs => "What inputs does the system receive?",
        FieldName::Outputs => "What outputs does the system produce?",
        FieldName::Constraints => {
            "What constraints must be followed? (language/runtime/performance/security/platform)"
        }
        FieldName::NonGoals => "What is explicitly out of scope (non-goals)?",
    }
}

/// Regex and keyword extraction with no external calls.
#[derive(Default)]
pub struct HeuristicStrategy {
    parser: PromptParser,
}

impl HeuristicStrategy {
    /// Create a heuristic strategy.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExtractionStrategy for HeuristicStrategy {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn extract_requirements(&self, prompt: &str) -> Result<SpecDraft, ProviderError> {
        Ok(self.parser.parse(prompt))
    }

    async fn generate_followup(
        &self,
        field: FieldName,
        _draft: &SpecDraft,
    ) -> Result<String, ProviderError> {
        Ok(followup_question(field).to_string())
    }

    async fn normalize_spec(&self, draft: SpecDraft) -> Result<SpecDraft, ProviderError> {
        Ok(draft)
    }
}

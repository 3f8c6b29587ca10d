//! Gap resolution: ask for what the prompt left out, then finalize.

use tracing::{debug, info, warn};

use crate::error::SpecError;
use crate::model::{BuildResult, FieldCandidate, FieldName, SpecDraft, ACCEPTED_CONFIDENCE};
use crate::normalize::normalize_user_field_value;
use crate::strategy::ExtractionStrategy;

/// Rationale recorded for values supplied by the user.
pub const USER_ANSWER_RATIONALE: &str = "interactive_user_answer";

/// Walk the fields in order and ask about every one that still needs an
/// answer. Returns the fields whose candidate was replaced.
///
/// At most one question per field; stops early at the strategy's follow-up
/// limit. Blank answers leave the field as it was.
pub async fn resolve_gaps<F>(
    draft: &mut SpecDraft,
    strategy: &dyn ExtractionStrategy,
    ask: &mut F,
) -> Result<Vec<FieldName>, SpecError>
where
    F: FnMut(&str) -> String + Send,
{
    let limit = strategy.followup_limit();
    let mut asked = 0usize;
    let mut resolved = Vec::new();

    for field in FieldName::ALL {
        if !draft.get(field).needs_answer() {
            continue;
        }
        if limit.is_some_and(|max| asked >= max) {
            debug!(limit = ?limit, "Follow-up limit reached");
            break;
        }

        let question = strategy.generate_followup(field, draft).await?;
        asked += 1;

        let answer = ask(&question);
        if answer.trim().is_empty() {
            debug!(field = %field, "Blank answer, keeping current value");
            continue;
        }

        let (value, confidence) = normalize_user_field_value(field, &answer);
        draft.set(
            field,
            FieldCandidate::new(value, confidence, USER_ANSWER_RATIONALE),
        );
        resolved.push(field);
    }

    Ok(resolved)
}

/// Run extraction, optional gap resolution and the final normalization pass.
pub async fn build_spec_draft<F>(
    prompt: &str,
    interactive: bool,
    strategy: &dyn ExtractionStrategy,
    ask: &mut F,
) -> Result<BuildResult, SpecError>
where
    F: FnMut(&str) -> String + Send,
{
    if prompt.trim().is_empty() {
        return Err(SpecError::invalid_input(
            "prompt is required and must be non-empty.",
        ));
    }

    info!(strategy = strategy.name(), interactive, "Extracting requirements");
    let mut draft = strategy.extract_requirements(prompt).await?;

    let resolved = if interactive {
        resolve_gaps(&mut draft, strategy, ask).await?
    } else {
        Vec::new()
    };

    let draft = strategy.normalize_spec(draft).await?;

    for field in &resolved {
        let candidate = draft.get(*field);
        if candidate.confidence < ACCEPTED_CONFIDENCE {
            warn!(
                field = %field,
                confidence = candidate.confidence,
                "Normalization lowered a resolved field below the acceptance threshold"
            );
        }
    }

    let result = BuildResult::from_draft(draft);
    debug!(
        missing = result.missing_fields.len(),
        ambiguous = result.ambiguous_fields.len(),
        "Draft finalized"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::ProviderError;
    use crate::strategy::HeuristicStrategy;

    /// Strategy returning a fixed draft, recording every follow-up request.
    struct FixedStrategy {
        draft: SpecDraft,
        limit: Option<usize>,
        normalized: Option<SpecDraft>,
        requested: Mutex<Vec<FieldName>>,
    }

    impl FixedStrategy {
        fn new(draft: SpecDraft) -> Self {
            Self {
                draft,
                limit: None,
                normalized: None,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<FieldName> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ExtractionStrategy for FixedStrategy {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn extract_requirements(&self, _prompt: &str) -> Result<SpecDraft, ProviderError> {
            Ok(self.draft.clone())
        }

        async fn generate_followup(
            &self,
            field: FieldName,
            _draft: &SpecDraft,
        ) -> Result<String, ProviderError> {
            self.requested.lock().unwrap().push(field);
            Ok(format!("q:{field}"))
        }

        async fn normalize_spec(&self, draft: SpecDraft) -> Result<SpecDraft, ProviderError> {
            Ok(self.normalized.clone().unwrap_or(draft))
        }

        fn followup_limit(&self) -> Option<usize> {
            self.limit
        }
    }

    fn answers(values: &[&str]) -> impl FnMut(&str) -> String + Send {
        let mut queue: VecDeque<String> = values.iter().map(|s| s.to_string()).collect();
        move |_question| queue.pop_front().unwrap_or_default()
    }

    fn accepted_draft() -> SpecDraft {
        FieldName::ALL.into_iter().fold(SpecDraft::new(), |draft, field| {
            draft.with(field, FieldCandidate::new("set", 0.95, "explicit_label"))
        })
    }

    #[tokio::test]
    async fn test_empty_prompt_is_rejected() {
        let strategy = HeuristicStrategy::new();
        let err = build_spec_draft("   ", true, &strategy, &mut answers(&[]))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: prompt is required and must be non-empty."
        );
    }

    #[tokio::test]
    async fn test_accepted_fields_are_never_asked() {
        let draft = accepted_draft().with(
            FieldName::Inputs,
            FieldCandidate::new("maybe", 0.6, "guess"),
        );
        let strategy = FixedStrategy::new(draft);

        let result = build_spec_draft("x", true, &strategy, &mut answers(&["csv files"]))
            .await
            .unwrap();

        assert_eq!(strategy.requested(), vec![FieldName::Inputs]);
        let inputs = result.draft.get(FieldName::Inputs);
        assert_eq!(inputs.value, "csv files");
        assert_eq!(inputs.confidence, 1.0);
        assert_eq!(inputs.rationale, USER_ANSWER_RATIONALE);
        assert!(result.is_complete());
        assert!(result.ambiguous_fields.is_empty());
    }

    #[tokio::test]
    async fn test_fields_asked_in_order_once_each() {
        let strategy = FixedStrategy::new(SpecDraft::new());
        let mut questions = Vec::new();
        let mut ask = |question: &str| {
            questions.push(question.to_string());
            String::new()
        };

        let result = build_spec_draft("x", true, &strategy, &mut ask).await.unwrap();

        assert_eq!(strategy.requested(), FieldName::ALL.to_vec());
        assert_eq!(questions.len(), 8);
        assert_eq!(questions[0], "q:project_name");
        assert_eq!(result.missing_fields, FieldName::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_blank_answer_keeps_existing_candidate() {
        let draft = accepted_draft().with(
            FieldName::ProjectName,
            FieldCandidate::new("Build Something", 0.55, "title_inference"),
        );
        let strategy = FixedStrategy::new(draft);

        let result = build_spec_draft("x", true, &strategy, &mut answers(&["  "]))
            .await
            .unwrap();

        let name = result.draft.get(FieldName::ProjectName);
        assert_eq!(name.value, "Build Something");
        assert_eq!(name.rationale, "title_inference");
        assert_eq!(result.ambiguous_fields, vec![FieldName::ProjectName]);
    }

    #[tokio::test]
    async fn test_followup_limit_caps_questions() {
        let mut strategy = FixedStrategy::new(SpecDraft::new());
        strategy.limit = Some(3);

        let mut draft = SpecDraft::new();
        let resolved = resolve_gaps(&mut draft, &strategy, &mut answers(&["a", "", "c", "d"]))
            .await
            .unwrap();

        assert_eq!(
            strategy.requested(),
            vec![FieldName::ProjectName, FieldName::ProjectType, FieldName::PrimaryGoal]
        );
        assert_eq!(resolved, vec![FieldName::ProjectName, FieldName::PrimaryGoal]);
        assert_eq!(draft.value(FieldName::TargetUsers), "");
    }

    #[tokio::test]
    async fn test_unrecognized_type_answer_stays_missing() {
        let strategy = FixedStrategy::new(
            accepted_draft().with(FieldName::ProjectType, FieldCandidate::default()),
        );

        let result = build_spec_draft("x", true, &strategy, &mut answers(&["game mod"]))
            .await
            .unwrap();

        let project_type = result.draft.get(FieldName::ProjectType);
        assert_eq!(project_type.value, "game mod");
        assert_eq!(result.missing_fields, vec![FieldName::ProjectType]);
    }

    #[tokio::test]
    async fn test_non_interactive_skips_questions() {
        let strategy = HeuristicStrategy::new();
        let mut ask = |_: &str| -> String { panic!("must not ask in non-interactive mode") };

        let result = build_spec_draft("Build something", false, &strategy, &mut ask)
            .await
            .unwrap();

        assert_eq!(result.missing_fields.len(), 6);
        assert!(!result.missing_fields.contains(&FieldName::ProjectName));
        assert_eq!(
            result.ambiguous_fields,
            vec![FieldName::ProjectName, FieldName::ProjectType]
        );
        assert!(result.ensure_complete().is_err());
    }

    #[tokio::test]
    async fn test_normalization_runs_after_resolution() {
        let mut strategy = FixedStrategy::new(accepted_draft().with(
            FieldName::Outputs,
            FieldCandidate::default(),
        ));
        strategy.normalized = Some(accepted_draft().with(
            FieldName::Outputs,
            FieldCandidate::new("report", 0.7, "llm_normalized"),
        ));

        let result = build_spec_draft("x", true, &strategy, &mut answers(&["a report"]))
            .await
            .unwrap();

        // Single finalization pass: no second round of questions.
        assert_eq!(strategy.requested(), vec![FieldName::Outputs]);
        assert_eq!(result.ambiguous_fields, vec![FieldName::Outputs]);
    }

    #[tokio::test]
    async fn test_heuristic_interactive_run_completes() {
        let strategy = HeuristicStrategy::new();
        let mut ask = answers(&[
            "CSV Guard",
            "cli tool",
            "Validate CSV files",
            "Developers",
            "File paths",
            "A report",
            "Rust",
            "No GUI",
        ]);

        let result = build_spec_draft("Build something", true, &strategy, &mut ask)
            .await
            .unwrap();

        assert!(result.is_complete());
        assert!(result.ambiguous_fields.is_empty());
        assert_eq!(result.draft.value(FieldName::ProjectType), "CLI tool");
        assert_eq!(result.draft.value(FieldName::ProjectName), "CSV Guard");
    }
}

//! Heuristic prompt parsing.
//!
//! Extracts `Label: value` lines and falls back to keyword and excerpt
//! inference for the fields the prompt does not label explicitly.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{FieldCandidate, FieldName, SpecDraft};
use crate::project_type::ProjectType;

/// Confidence for an explicitly labelled value.
pub const EXPLICIT_LABEL_CONFIDENCE: f64 = 0.95;
/// Confidence for a project type inferred from keywords.
pub const KEYWORD_INFERENCE_CONFIDENCE: f64 = 0.7;
/// Confidence for a project name built from the leading words.
pub const TITLE_INFERENCE_CONFIDENCE: f64 = 0.55;
/// Confidence for the prompt excerpt used as a goal.
pub const EXCERPT_CONFIDENCE: f64 = 0.4;
/// Maximum characters in the goal excerpt.
pub const EXCERPT_MAX_CHARS: usize = 220;
/// Leading words used for an inferred project name.
const TITLE_WORDS: usize = 4;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9\-]+").unwrap());

/// Label patterns in field order. A label must open the line, after an
/// optional `-` or `*` bullet.
static LABELS: Lazy<Vec<(FieldName, Regex)>> = Lazy::new(|| {
    let label = |synonyms: &str| {
        Regex::new(&format!(r"(?i)^(?:[-*]\s*)?(?:{synonyms})\s*:\s*(.+)$")).unwrap()
    };
    vec![
        (FieldName::ProjectName, label(r"project\s*name|name")),
        (FieldName::ProjectType, label(r"project\s*type|type")),
        (FieldName::PrimaryGoal, label(r"primary\s*goal|goal")),
        (FieldName::TargetUsers, label(r"target\s*users|users")),
        (FieldName::Inputs, label(r"inputs?")),
        (FieldName::Outputs, label(r"outputs?")),
        (FieldName::Constraints, label(r"constraints?")),
        (FieldName::NonGoals, label(r"non[-\s]*goals?")),
    ]
});

/// Prompt parser over the shared label patterns.
pub struct PromptParser {
    labels: &'static [(FieldName, Regex)],
}

impl PromptParser {
    /// Create a parser. The label patterns are compiled once per process.
    pub fn new() -> Self {
        Self {
            labels: LABELS.as_slice(),
        }
    }

    /// Parse a prompt into a draft. Never fails: anything not found stays
    /// empty at zero confidence.
    pub fn parse(&self, prompt: &str) -> SpecDraft {
        let lines: Vec<&str> = prompt
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let joined = lines.join(" ");
        let mut draft = SpecDraft::new();

        for (field, pattern) in self.labels {
            if let Some(value) = first_labelled_value(&lines, pattern) {
                draft.set(
                    *field,
                    FieldCandidate::new(value, EXPLICIT_LABEL_CONFIDENCE, "explicit_label"),
                );
            }
        }

        if !draft.get(FieldName::ProjectType).has_value() {
            if let Some(inferred) = ProjectType::infer(&joined) {
                draft.set(
                    FieldName::ProjectType,
                    FieldCandidate::new(
                        inferred.as_str(),
                        KEYWORD_INFERENCE_CONFIDENCE,
                        "keyword_inference",
                    ),
                );
            }
        }

        if !draft.get(FieldName::ProjectName).has_value() {
            if let Some(name) = infer_project_name(&joined) {
                draft.set(
                    FieldName::ProjectName,
                    FieldCandidate::new(name, TITLE_INFERENCE_CONFIDENCE, "title_inference"),
                );
            }
        }

        if !draft.get(FieldName::PrimaryGoal).has_value() && !joined.is_empty() {
            let excerpt: String = joined.chars().take(EXCERPT_MAX_CHARS).collect();
            draft.set(
                FieldName::PrimaryGoal,
                FieldCandidate::new(excerpt, EXCERPT_CONFIDENCE, "fallback_prompt_excerpt"),
            );
        }

        draft
    }
}

impl Default for PromptParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a prompt with the default [`PromptParser`].
pub fn parse_prompt(prompt: &str) -> SpecDraft {
    PromptParser::new().parse(prompt)
}

fn first_labelled_value(lines: &[&str], pattern: &Regex) -> Option<String> {
    lines.iter().find_map(|line| {
        let caps = pattern.captures(line)?;
        let value = caps.get(1)?.as_str().trim().trim_end_matches('.').trim_end();
        (!value.is_empty()).then(|| value.to_string())
    })
}

fn infer_project_name(text: &str) -> Option<String> {
    let words: Vec<String> = WORD
        .find_iter(text)
        .take(TITLE_WORDS)
        .map(|m| capitalize(m.as_str()))
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

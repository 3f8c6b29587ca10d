//! Field model for extracted requirements.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::SpecError;

/// Below this confidence a field counts as missing.
pub const MIN_CONFIDENCE: f64 = 0.5;

/// At or above this confidence a non-empty field is accepted without a follow-up.
pub const ACCEPTED_CONFIDENCE: f64 = 0.8;

/// The required spec fields, in their fixed resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    ProjectName,
    ProjectType,
    PrimaryGoal,
    TargetUsers,
    Inputs,
    Outputs,
    Constraints,
    NonGoals,
}

impl FieldName {
    /// Every required field in order.
    pub const ALL: [FieldName; 8] = [
        FieldName::ProjectName,
        FieldName::ProjectType,
        FieldName::PrimaryGoal,
        FieldName::TargetUsers,
        FieldName::Inputs,
        FieldName::Outputs,
        FieldName::Constraints,
        FieldName::NonGoals,
    ];

    /// Key used in structured output and provider payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProjectName => "project_name",
            Self::ProjectType => "project_type",
            Self::PrimaryGoal => "primary_goal",
            Self::TargetUsers => "target_users",
            Self::Inputs => "inputs",
            Self::Outputs => "outputs",
            Self::Constraints => "constraints",
            Self::NonGoals => "non_goals",
        }
    }

    /// Parse from the snake_case key.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extracted requirement value with its confidence and provenance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldCandidate {
    /// Extracted value (may be empty).
    pub value: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Why the value was chosen, e.g. `explicit_label`.
    pub rationale: String,
}

impl FieldCandidate {
    /// Create a candidate. Confidence is clamped into `[0, 1]`.
    pub fn new(value: impl Into<String>, confidence: f64, rationale: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            confidence: confidence.clamp(0.0, 1.0),
            rationale: rationale.into(),
        }
    }

    /// Whether the value has any non-whitespace content.
    pub fn has_value(&self) -> bool {
        !self.value.trim().is_empty()
    }

    /// Empty, or too uncertain to use.
    pub fn is_missing(&self) -> bool {
        !self.has_value() || self.confidence < MIN_CONFIDENCE
    }

    /// Present but not yet accepted.
    pub fn is_ambiguous(&self) -> bool {
        self.has_value()
            && self.confidence >= MIN_CONFIDENCE
            && self.confidence < ACCEPTED_CONFIDENCE
    }

    /// Whether the gap-resolution loop should ask about this field.
    pub fn needs_answer(&self) -> bool {
        !self.has_value() || self.confidence < ACCEPTED_CONFIDENCE
    }
}

/// The complete set of required fields for one generation run.
///
/// Every [`FieldName`] always has a candidate; only the content can be
/// partial. Candidates are replaced wholesale with [`SpecDraft::set`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecDraft {
    fields: [FieldCandidate; 8],
}

impl SpecDraft {
    /// Create a draft with every field empty at zero confidence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the candidate for a field.
    pub fn get(&self, name: FieldName) -> &FieldCandidate {
        &self.fields[name.index()]
    }

    /// Shorthand for the value of a field.
    pub fn value(&self, name: FieldName) -> &str {
        &self.get(name).value
    }

    /// Replace the candidate for a field.
    pub fn set(&mut self, name: FieldName, candidate: FieldCandidate) {
        self.fields[name.index()] = candidate;
    }

    /// Builder-style [`SpecDraft::set`].
    pub fn with(mut self, name: FieldName, candidate: FieldCandidate) -> Self {
        self.set(name, candidate);
        self
    }

    /// Iterate fields in the fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &FieldCandidate)> {
        FieldName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }

    /// Fields that are empty or below [`MIN_CONFIDENCE`].
    pub fn missing_fields(&self) -> Vec<FieldName> {
        self.iter()
            .filter(|(_, c)| c.is_missing())
            .map(|(name, _)| name)
            .collect()
    }

    /// Fields that are present with confidence in `[0.5, 0.8)`.
    pub fn ambiguous_fields(&self) -> Vec<FieldName> {
        self.iter()
            .filter(|(_, c)| c.is_ambiguous())
            .map(|(name, _)| name)
            .collect()
    }
}

impl Serialize for SpecDraft {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FieldName::ALL.len()))?;
        for (name, candidate) in self.iter() {
            map.serialize_entry(name.as_str(), candidate)?;
        }
        map.end()
    }
}

/// Outcome of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildResult {
    /// The finalized draft.
    #[serde(rename = "fields")]
    pub draft: SpecDraft,
    /// Fields still missing, in field order.
    pub missing_fields: Vec<FieldName>,
    /// Fields present but not accepted, in field order.
    pub ambiguous_fields: Vec<FieldName>,
}

impl BuildResult {
    /// Derive the missing and ambiguous lists from a draft.
    pub fn from_draft(draft: SpecDraft) -> Self {
        let missing_fields = draft.missing_fields();
        let ambiguous_fields = draft.ambiguous_fields();
        Self {
            draft,
            missing_fields,
            ambiguous_fields,
        }
    }

    /// No required field is missing.
    pub fn is_complete(&self) -> bool {
        self.missing_fields.is_empty()
    }

    /// Fail with [`SpecError::IncompleteSpec`] when fields are missing.
    pub fn ensure_complete(&self) -> Result<(), SpecError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(SpecError::IncompleteSpec {
                missing: self.missing_fields.clone(),
            })
        }
    }

    /// Pretty JSON structured form.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

//! Canonicalization of free-text answers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::FieldName;
use crate::project_type::ProjectKind;

/// Confidence assigned to a project type outside the supported set.
pub const UNRECOGNIZED_TYPE_CONFIDENCE: f64 = 0.4;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(raw: &str) -> String {
    WHITESPACE.replace_all(raw.trim(), " ").into_owned()
}

/// Normalize a user answer for `field`, returning the stored value and its
/// confidence.
pub fn normalize_user_field_value(field: FieldName, raw: &str) -> (String, f64) {
    let value = collapse_whitespace(raw);

    if field == FieldName::ProjectType {
        return match ProjectKind::classify(&value) {
            ProjectKind::Known(t) => (t.as_str().to_string(), 1.0),
            ProjectKind::Unrecognized(raw) => (raw, UNRECOGNIZED_TYPE_CONFIDENCE),
        };
    }

    let confidence = if value.is_empty() { 0.0 } else { 1.0 };
    (value, confidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project_type::ProjectType;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(
            normalize_user_field_value(FieldName::Inputs, "  csv \n\t files "),
            ("csv files".to_string(), 1.0)
        );
    }

    #[test]
    fn test_empty_answer_has_zero_confidence() {
        assert_eq!(
            normalize_user_field_value(FieldName::Outputs, "   "),
            (String::new(), 0.0)
        );
    }

    #[test]
    fn test_project_type_is_canonicalized() {
        assert_eq!(
            normalize_user_field_value(FieldName::ProjectType, "  cli   TOOL "),
            ("CLI tool".to_string(), 1.0)
        );
    }

    #[test]
    fn test_canonical_project_type_is_idempotent() {
        for t in ProjectType::ALL {
            let (value, confidence) = normalize_user_field_value(FieldName::ProjectType, t.as_str());
            assert_eq!(value, t.as_str());
            assert_eq!(confidence, 1.0);
            assert_eq!(
                normalize_user_field_value(FieldName::ProjectType, &value),
                (value.clone(), 1.0)
            );
        }
    }

    #[test]
    fn test_unrecognized_project_type_keeps_text() {
        assert_eq!(
            normalize_user_field_value(FieldName::ProjectType, "browser  extension"),
            ("browser extension".to_string(), UNRECOGNIZED_TYPE_CONFIDENCE)
        );
    }
}

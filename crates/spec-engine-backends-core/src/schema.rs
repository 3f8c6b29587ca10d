//! Strict validation of provider JSON payloads.

use serde_json::{Map, Value};
use spec_engine_spec::{missing_headings, FieldCandidate, FieldName, ProviderError, SpecDraft};

/// Parse completion text into a JSON object.
pub fn parse_object(raw: &str) -> Result<Map<String, Value>, ProviderError> {
    if raw.trim().is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(ProviderError::schema("LLM payload must be a JSON object.")),
        Err(e) => Err(ProviderError::MalformedJson(e.to_string())),
    }
}

/// Build a draft from a field payload. Any violation rejects the whole
/// payload.
pub fn draft_from_payload(payload: &Map<String, Value>) -> Result<SpecDraft, ProviderError> {
    let mut draft = SpecDraft::new();
    for field in FieldName::ALL {
        draft.set(field, candidate_from_payload(field, payload.get(field.as_str()))?);
    }
    Ok(draft)
}

fn candidate_from_payload(
    field: FieldName,
    entry: Option<&Value>,
) -> Result<FieldCandidate, ProviderError> {
    let Some(Value::Object(entry)) = entry else {
        return Err(ProviderError::schema(format!(
            "LLM payload missing object for field: {field}"
        )));
    };

    let value = entry
        .get("value")
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::schema(format!("Field {field}.value must be string.")))?;

    let confidence = match entry.get("confidence") {
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
            ProviderError::schema(format!("Field {field}.confidence must be number."))
        })?,
        _ => {
            return Err(ProviderError::schema(format!(
                "Field {field}.confidence must be number."
            )))
        }
    };
    if !(0.0..=1.0).contains(&confidence) {
        return Err(ProviderError::schema(format!(
            "Field {field}.confidence out of range [0,1]."
        )));
    }

    let rationale = entry
        .get("rationale")
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::schema(format!("Field {field}.rationale must be string.")))?;

    Ok(FieldCandidate::new(value.trim(), confidence, rationale.trim()))
}

/// Extract a non-empty `question`.
pub fn question_from_payload(payload: &Map<String, Value>) -> Result<String, ProviderError> {
    payload
        .get("question")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .ok_or(ProviderError::EmptyQuestion)
}

/// Extract `markdown` and check that every skeleton heading is present.
pub fn markdown_from_payload(payload: &Map<String, Value>) -> Result<String, ProviderError> {
    let markdown = payload
        .get("markdown")
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::schema("LLM payload field markdown must be string."))?;

    let missing = missing_headings(markdown);
    if !missing.is_empty() {
        return Err(ProviderError::MissingHeadings(missing));
    }
    Ok(markdown.to_string())
}

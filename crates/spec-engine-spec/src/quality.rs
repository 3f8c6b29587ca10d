//! Structural validation of the rendered document.
//!
//! A conforming document has exactly the [`EXPECTED_HEADINGS`] in order and
//! nothing but headings, `- ` bullets and `N. ` numbered items in between.

use once_cell::sync::Lazy;
use regex::Regex;

/// The required heading skeleton, in order.
pub const EXPECTED_HEADINGS: [&str; 13] = [
    "# Project Specification",
    "## 1. Overview",
    "## 2. Problem Statement",
    "## 3. Scope",
    "### In Scope",
    "### Out of Scope",
    "## 4. Functional Requirements",
    "## 5. Non-Functional Requirements",
    "## 6. Inputs",
    "## 7. Outputs",
    "## 8. Constraints",
    "## 9. Assumptions",
    "## 10. Acceptance Criteria",
];

const TITLE_ERROR: &str = "First non-empty line must be '# Project Specification'.";
const HEADINGS_ERROR: &str = "Headings must match strict required structure and ordering.";

static ALLOWED_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#|-\s|\d+\.\s)").unwrap());
static NUMBERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\.\s").unwrap());

/// Check a document against the skeleton and list-only body rule.
///
/// Returns one message per violation; an empty list means the document
/// conforms.
pub fn validate_spec_markdown(content: &str) -> Vec<String> {
    let mut errors = Vec::new();

    let first = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");
    if first != EXPECTED_HEADINGS[0] {
        errors.push(TITLE_ERROR.to_string());
    }

    if headings(content) != EXPECTED_HEADINGS {
        errors.push(HEADINGS_ERROR.to_string());
    }

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if !line.is_empty() && !ALLOWED_PREFIX.is_match(line) {
            errors.push(format!(
                "Line {} contains non-list prose or unsupported formatting: {line}",
                index + 1
            ));
        }
    }

    errors
}

/// Headings from the skeleton that do not appear as a line of `content`.
pub fn missing_headings(content: &str) -> Vec<String> {
    let present = headings(content);
    EXPECTED_HEADINGS
        .iter()
        .filter(|heading| !present.contains(heading))
        .map(|heading| heading.to_string())
        .collect()
}

/// Rewrite prose lines as list items. Headings are left alone.
///
/// Inside a section that already has numbered items, prose continues the
/// numbering; elsewhere it becomes a `- ` bullet. The trailing newline state
/// of the input is preserved.
pub fn coerce_to_list_markdown(content: &str) -> String {
    let mut out = Vec::new();
    let mut last_number: Option<u64> = None;

    for raw in content.lines() {
        let line = raw.trim();
        if line.starts_with('#') {
            last_number = section_uses_numbering(content, out.len()).then_some(0);
            out.push(raw.to_string());
            continue;
        }
        if line.is_empty() || ALLOWED_PREFIX.is_match(line) {
            if let Some(n) = item_number(line) {
                last_number = Some(last_number.map_or(n, |prev| prev.max(n)));
            }
            out.push(raw.to_string());
            continue;
        }
        match last_number {
            Some(n) => {
                out.push(format!("{}. {line}", n + 1));
                last_number = Some(n + 1);
            }
            None => out.push(format!("- {line}")),
        }
    }

    let mut coerced = out.join("\n");
    if content.ends_with('\n') {
        coerced.push('\n');
    }
    coerced
}

fn headings(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('#'))
        .collect()
}

fn item_number(line: &str) -> Option<u64> {
    NUMBERED_ITEM
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Whether the section under the heading at line `heading_index` has any
/// numbered item.
fn section_uses_numbering(content: &str, heading_index: usize) -> bool {
    content
        .lines()
        .skip(heading_index + 1)
        .map(str::trim)
        .take_while(|line| !line.starts_with('#'))
        .any(|line| item_number(line).is_some())
}

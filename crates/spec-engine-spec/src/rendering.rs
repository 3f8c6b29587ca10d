//! Markdown rendering of a finalized draft.

use crate::model::{FieldName, SpecDraft};
use crate::normalize::collapse_whitespace;

const PERFORMANCE_HINTS: &[&str] = &["performance", "latency", "throughput", "fast"];
const RELIABILITY_HINTS: &[&str] = &["reliable", "availability", "uptime", "fault"];
const SECURITY_HINTS: &[&str] = &["security", "auth", "encryption", "privacy"];
const MAINTAINABILITY_HINTS: &[&str] = &["maintain", "readable", "modular", "test"];

/// Render the document in the fixed section layout. Ends with a newline.
///
/// Field values are collapsed onto a single line first, so every value stays
/// inside the list item it is rendered into.
pub fn render_spec_markdown(draft: &SpecDraft) -> String {
    let field = |name: FieldName| collapse_whitespace(draft.value(name));
    let name = field(FieldName::ProjectName);
    let project_type = field(FieldName::ProjectType);
    let goal = field(FieldName::PrimaryGoal);
    let users = field(FieldName::TargetUsers);
    let inputs = field(FieldName::Inputs);
    let outputs = field(FieldName::Outputs);
    let constraints = field(FieldName::Constraints);
    let non_goals = field(FieldName::NonGoals);

    let in_scope = split_items(&format!(
        "Deliver core {project_type} behavior aligned to goal: {goal}. \
         Support primary user group: {users}. \
         Handle defined inputs and produce defined outputs."
    ));

    let mut lines: Vec<String> = vec![
        "# Project Specification".into(),
        String::new(),
        "## 1. Overview".into(),
        format!("- Project Name: {name}"),
        format!("- Project Type: {project_type}"),
        format!("- Primary Goal: {goal}"),
        format!("- Target Users: {users}"),
        String::new(),
        "## 2. Problem Statement".into(),
        format!("- The current workflow does not reliably satisfy this objective: {goal}."),
        String::new(),
        "## 3. Scope".into(),
        "### In Scope".into(),
    ];
    lines.extend(in_scope.iter().map(|item| format!("- {item}")));
    lines.push(String::new());
    lines.push("### Out of Scope".into());
    lines.extend(split_items(&non_goals).iter().map(|item| format!("- {item}")));
    lines.push(String::new());

    lines.push("## 4. Functional Requirements".into());
    lines.extend(
        functional_requirements(&inputs, &outputs, &goal)
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {item}", i + 1)),
    );
    lines.push(String::new());

    lines.push("## 5. Non-Functional Requirements".into());
    lines.extend(
        non_functional_requirements(&constraints)
            .iter()
            .map(|item| format!("- {item}")),
    );
    lines.push(String::new());

    for (heading, value) in [
        ("## 6. Inputs", &inputs),
        ("## 7. Outputs", &outputs),
        ("## 8. Constraints", &constraints),
    ] {
        lines.push(heading.into());
        lines.push(format!("- {}", or_none(value)));
        lines.push(String::new());
    }

    lines.push("## 9. Assumptions".into());
    lines.push("- User-provided answers are accurate and complete at generation time.".into());
    lines.push("- Requirements may require refinement if domain constraints change.".into());
    lines.push(String::new());

    lines.push("## 10. Acceptance Criteria".into());
    lines.push(format!("- `{name}` generates the expected output: {outputs}."));
    lines.push("- All required fields are present and non-ambiguous in the generated specification.".into());
    lines.push("- The specification follows the mandated section order and headings.".into());

    let mut markdown = lines.join("\n");
    markdown.push('\n');
    markdown
}

const NONE_SPECIFIED: &str = "None specified.";

fn or_none(value: &str) -> &str {
    if value.is_empty() {
        NONE_SPECIFIED
    } else {
        value
    }
}

/// Split on `,` and `;`, dropping blank parts.
fn split_items(value: &str) -> Vec<String> {
    let items: Vec<String> = value
        .split([',', ';'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        vec![NONE_SPECIFIED.to_string()]
    } else {
        items
    }
}

fn functional_requirements(inputs: &str, outputs: &str, goal: &str) -> [String; 4] {
    [
        format!("The system SHALL accept and validate the defined inputs: {inputs}."),
        format!("The system SHALL produce outputs in the defined format: {outputs}."),
        format!("The system SHALL implement behavior that directly supports this goal: {goal}."),
        "The system SHALL return deterministic results for identical valid inputs.".to_string(),
    ]
}

fn non_functional_requirements(constraints: &str) -> Vec<&'static str> {
    let lowered = constraints.to_lowercase();
    let mentions = |hints: &[&str]| hints.iter().any(|hint| lowered.contains(hint));

    let mut items = Vec::new();
    if mentions(PERFORMANCE_HINTS) {
        items.push("Performance: Must satisfy declared performance expectations.");
    }
    if mentions(RELIABILITY_HINTS) {
        items.push("Reliability: Must handle errors predictably and recover safely.");
    }
    if mentions(SECURITY_HINTS) {
        items.push("Security: Must enforce relevant security controls and data protections.");
    }
    if mentions(MAINTAINABILITY_HINTS) {
        items.push("Maintainability: Code and interfaces must remain testable and maintainable.");
    }
    if items.is_empty() {
        items.push("Maintainability: Implementation must remain testable and readable.");
    }
    items
}

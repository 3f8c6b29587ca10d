//! Project type classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of supported project types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectType {
    #[serde(rename = "library")]
    Library,
    #[serde(rename = "service")]
    Service,
    #[serde(rename = "CLI tool")]
    CliTool,
    #[serde(rename = "web app")]
    WebApp,
    #[serde(rename = "backend API")]
    BackendApi,
    #[serde(rename = "frontend UI")]
    FrontendUi,
    #[serde(rename = "full-stack app")]
    FullStackApp,
}

impl ProjectType {
    /// All project types, in declaration order.
    pub const ALL: [ProjectType; 7] = [
        ProjectType::Library,
        ProjectType::Service,
        ProjectType::CliTool,
        ProjectType::WebApp,
        ProjectType::BackendApi,
        ProjectType::FrontendUi,
        ProjectType::FullStackApp,
    ];

    /// Canonical display text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Library => "library",
            Self::Service => "service",
            Self::CliTool => "CLI tool",
            Self::WebApp => "web app",
            Self::BackendApi => "backend API",
            Self::FrontendUi => "frontend UI",
            Self::FullStackApp => "full-stack app",
        }
    }

    /// Case-insensitive exact match against the canonical text.
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().to_lowercase() == wanted)
    }

    /// Keywords that suggest this type when scanning a whole prompt.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::FullStackApp => &["full stack", "frontend and backend", "end-to-end app"],
            Self::BackendApi => &["api", "endpoint", "rest", "graphql"],
            Self::FrontendUi => &["frontend", "ui", "single-page", "spa"],
            Self::WebApp => &["web app", "website", "browser app"],
            Self::CliTool => &["cli", "command line", "terminal tool"],
            Self::Service => &["service", "daemon", "worker"],
            Self::Library => &["library", "sdk", "package"],
        }
    }

    /// Order in which keyword buckets are tried; the first hit wins.
    pub const INFERENCE_PRIORITY: [ProjectType; 7] = [
        ProjectType::FullStackApp,
        ProjectType::BackendApi,
        ProjectType::FrontendUi,
        ProjectType::WebApp,
        ProjectType::CliTool,
        ProjectType::Service,
        ProjectType::Library,
    ];

    /// Infer a type from free text. A keyword matches anywhere in the
    /// lower-cased text, including inside a longer word.
    pub fn infer(text: &str) -> Option<Self> {
        let lowered = text.to_lowercase();
        Self::INFERENCE_PRIORITY
            .into_iter()
            .find(|t| t.keywords().iter().any(|kw| lowered.contains(kw)))
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a free-text project type answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectKind {
    /// Matched one of the supported types.
    Known(ProjectType),
    /// Outside the closed set; keeps the original text.
    Unrecognized(String),
}

impl ProjectKind {
    /// Classify free text.
    pub fn classify(text: &str) -> Self {
        match ProjectType::parse(text) {
            Some(t) => Self::Known(t),
            None => Self::Unrecognized(text.to_string()),
        }
    }

    /// Text to store in the draft.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(t) => t.as_str(),
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Whether the text matched a supported type.
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

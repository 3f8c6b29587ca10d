//! Common test utilities for CLI testing.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Output;

use assert_cmd::Command;
use serde_json::{json, Map, Value};
use tempfile::{tempdir, TempDir};

/// Environment variables that would leak the developer's setup into a run.
const SCRUBBED_VARS: &[&str] = &[
    "OPENAI_API_KEY",
    "OPENROUTER_API_KEY",
    "SPEC_ENGINE_HOME",
    "SPEC_ENGINE_BASE_URL",
    "SPEC_ENGINE_LOG_LEVEL",
    "SPEC_ENGINE_LOG_FORMAT",
    "SPEC_ENGINE_LOG_FILE",
    "RUST_LOG",
];

/// Prompt labelling every field.
pub const LABELLED_PROMPT: &str = "Project name: Ledger\n\
    Project type: cli\n\
    Goal: Track expenses\n\
    Users: freelancers\n\
    Inputs: CSV files\n\
    Outputs: monthly report\n\
    Constraints: offline\n\
    Non-goals: no GUI";

/// Test context with temporary working directory
pub struct TestContext {
    pub temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Get path to temp directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path inside the temp directory
    pub fn file(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }

    /// Read a file from the temp directory
    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.file(name)).expect("Failed to read file")
    }

    /// Contents of every run log file, concatenated
    pub fn run_logs(&self) -> String {
        let dir = self.path().join(".spec-engine").join("logs");
        let mut out = String::new();
        for entry in std::fs::read_dir(dir).expect("No run logs") {
            let path = entry.expect("Bad dir entry").path();
            out.push_str(&std::fs::read_to_string(path).expect("Failed to read log"));
        }
        out
    }

    /// Create a command configured for this context
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("spec-engine").expect("Binary not found");
        cmd.current_dir(self.path()).env("NO_COLOR", "1");
        for var in SCRUBBED_VARS {
            cmd.env_remove(var);
        }
        cmd
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert helpers for CLI output
pub trait OutputAssertions {
    fn assert_success(&self);
    fn assert_failure(&self);
    fn assert_stdout_contains(&self, text: &str);
    fn assert_stderr_contains(&self, text: &str);
    fn assert_exit_code(&self, code: i32);
}

impl OutputAssertions for Output {
    fn assert_success(&self) {
        assert!(
            self.status.success(),
            "Command failed with status: {}\nstderr: {}",
            self.status,
            String::from_utf8_lossy(&self.stderr)
        );
    }

    fn assert_failure(&self) {
        assert!(
            !self.status.success(),
            "Command succeeded unexpectedly\nstdout: {}",
            String::from_utf8_lossy(&self.stdout)
        );
    }

    fn assert_stdout_contains(&self, text: &str) {
        let stdout = String::from_utf8_lossy(&self.stdout);
        assert!(
            stdout.contains(text),
            "stdout did not contain '{text}'\nstdout: {stdout}"
        );
    }

    fn assert_stderr_contains(&self, text: &str) {
        let stderr = String::from_utf8_lossy(&self.stderr);
        assert!(
            stderr.contains(text),
            "stderr did not contain '{text}'\nstderr: {stderr}"
        );
    }

    fn assert_exit_code(&self, code: i32) {
        assert_eq!(
            self.status.code(),
            Some(code),
            "Expected exit code {code}, got {:?}\nstderr: {}",
            self.status.code(),
            String::from_utf8_lossy(&self.stderr)
        );
    }
}

/// Mock provider serving the responses endpoint
pub struct MockBackend {
    server: mockito::ServerGuard,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            server: mockito::Server::new(),
        }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Answer every call with `payload` as the completion text
    pub fn mock_payload(&mut self, payload: &Value) -> mockito::Mock {
        let body = json!({
            "output_text": payload.to_string(),
            "usage": {"input_tokens": 120, "output_tokens": 40}
        });
        self.server
            .mock("POST", "/responses")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create()
    }

    /// Mock an error response
    pub fn mock_error(&mut self, status: usize, message: &str) -> mockito::Mock {
        self.server
            .mock("POST", "/responses")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(json!({"error": {"message": message}}).to_string())
            .create()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Field payload with every field filled at `confidence`.
pub fn field_payload(confidence: f64) -> Value {
    let fields = [
        ("project_name", "Ledger"),
        ("project_type", "cli"),
        ("primary_goal", "Track expenses"),
        ("target_users", "freelancers"),
        ("inputs", "CSV files"),
        ("outputs", "monthly report"),
        ("constraints", "offline"),
        ("non_goals", "no GUI"),
    ];
    let mut map = Map::new();
    for (name, value) in fields {
        map.insert(
            name.to_string(),
            json!({"value": value, "confidence": confidence, "rationale": "stated in prompt"}),
        );
    }
    Value::Object(map)
}

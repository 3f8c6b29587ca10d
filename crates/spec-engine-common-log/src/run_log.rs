//! JSON-lines run log.
//!
//! Each run appends one `run_summary` line followed by one `llm_call` line
//! per recorded call to `.spec-engine/logs/YYYY-MM-DD.jsonl` (UTC date).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::LogError;

/// Log directory relative to the base directory.
pub const LOGS_DIR: &str = ".spec-engine/logs";

/// Round a USD amount to 8 decimal places.
pub fn round_usd(amount: f64) -> f64 {
    (amount * 1e8).round() / 1e8
}

/// One completion call as observed by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallEvent {
    pub stage: String,
    pub model: String,
    pub latency_ms: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    pub estimated_cost_usd: f64,
    pub retry_count: u32,
    pub schema_valid: bool,
}

#[derive(Serialize)]
struct SummaryLine<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    run_id: String,
    timestamp: String,
    mode: &'a str,
    output_path: &'a str,
    result: &'a str,
    exit_code: i32,
    total_tokens: u64,
    estimated_total_cost_usd: f64,
    total_latency_ms: u64,
}

#[derive(Serialize)]
struct CallLine<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    run_id: String,
    #[serde(flatten)]
    event: &'a CallEvent,
}

/// Collects call events for one run and writes them out at the end.
#[derive(Debug)]
pub struct RunLogger {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    mode: String,
    output_path: String,
    base_dir: PathBuf,
    calls: Mutex<Vec<CallEvent>>,
}

impl RunLogger {
    /// Start a run log rooted at the current directory.
    pub fn new(mode: impl Into<String>, output_path: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            mode: mode.into(),
            output_path: output_path.into(),
            base_dir: PathBuf::from("."),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Root the log directory somewhere else.
    pub fn with_base_dir(mut self, base_dir: impl AsRef<Path>) -> Self {
        self.base_dir = base_dir.as_ref().to_path_buf();
        self
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Record one call event.
    pub fn record(&self, event: CallEvent) {
        tracing::debug!(
            stage = %event.stage,
            latency_ms = event.latency_ms,
            schema_valid = event.schema_valid,
            "LLM call recorded"
        );
        self.lock_calls().push(event);
    }

    /// Events recorded so far.
    pub fn calls(&self) -> Vec<CallEvent> {
        self.lock_calls().clone()
    }

    /// Path of the log file for `date`.
    pub fn log_path(&self, date: DateTime<Utc>) -> PathBuf {
        self.base_dir
            .join(LOGS_DIR)
            .join(format!("{}.jsonl", date.format("%Y-%m-%d")))
    }

    /// Append the summary and call lines. Returns the file written.
    pub fn finalize(&self, result: &str, exit_code: i32) -> Result<PathBuf, LogError> {
        let calls = self.calls();
        let run_id = self.run_id.to_string();

        let summary = SummaryLine {
            kind: "run_summary",
            run_id: run_id.clone(),
            timestamp: self.started_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            mode: &self.mode,
            output_path: &self.output_path,
            result,
            exit_code,
            total_tokens: calls.iter().map(|c| c.total_tokens).sum(),
            estimated_total_cost_usd: round_usd(calls.iter().map(|c| c.estimated_cost_usd).sum()),
            total_latency_ms: calls.iter().map(|c| c.latency_ms).sum(),
        };

        let mut lines = vec![serde_json::to_string(&summary)?];
        for event in &calls {
            lines.push(serde_json::to_string(&CallLine {
                kind: "llm_call",
                run_id: run_id.clone(),
                event,
            })?);
        }

        let path = self.log_path(Utc::now());
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        for line in lines {
            writeln!(file, "{line}")?;
        }
        Ok(path)
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<CallEvent>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

//! Request history log.
//!
//! Every completed summarization request (success or failure) is appended as
//! one JSON line to `~/.precis/request-log.jsonl`. The log backs the
//! `precis history` and `precis health` commands. Write failures are ignored
//! — telemetry must never fail the user's request.

use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request log entry (JSONL)
// ---------------------------------------------------------------------------

/// A single entry in the request history log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLogEntry {
    pub timestamp: String,
    /// Endpoint hit: `"/upload"` or `"/summarize-text"`.
    pub endpoint: String,
    /// Number of documents submitted (1 for raw text).
    pub documents: usize,
    /// The `summary_length` sent with the request.
    pub summary_length: u32,
    /// Whether the request completed and was rendered.
    pub success: bool,
    /// Wall-clock request duration in milliseconds.
    pub latency_ms: u64,
    /// Error description for failed requests.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Record a completed request.
pub fn log_request(
    endpoint: &str,
    documents: usize,
    summary_length: u32,
    success: bool,
    latency_ms: u64,
    error: Option<String>,
) {
    let entry = RequestLogEntry {
        timestamp: Utc::now().to_rfc3339(),
        endpoint: endpoint.to_string(),
        documents,
        summary_length,
        success,
        latency_ms,
        error,
    };

    let _ = append_log_entry(&entry);
}

// ---------------------------------------------------------------------------
// Reading log entries
// ---------------------------------------------------------------------------

/// Read all request log entries from `~/.precis/request-log.jsonl`.
///
/// Silently skips malformed lines. Returns an empty vec if the file does not
/// exist or cannot be read.
pub fn read_all_entries() -> Vec<RequestLogEntry> {
    let Some(path) = request_log_path() else {
        return Vec::new();
    };

    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    let reader = BufReader::new(file);
    reader
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<RequestLogEntry>(&line).ok())
        .collect()
}

/// Read the most recent `limit` entries, newest first.
pub fn read_recent_entries(limit: usize) -> Vec<RequestLogEntry> {
    let mut entries = read_all_entries();
    entries.reverse();
    entries.truncate(limit);
    entries
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

fn append_log_entry(entry: &RequestLogEntry) -> Result<()> {
    let Some(path) = request_log_path() else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

/// Return the path to the request log file.
pub fn request_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".precis").join("request-log.jsonl"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_round_trips_through_json() {
        let entry = RequestLogEntry {
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
            endpoint: "/upload".to_string(),
            documents: 3,
            summary_length: 150,
            success: true,
            latency_ms: 420,
            error: None,
        };

        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("error"));

        let parsed: RequestLogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.endpoint, "/upload");
        assert_eq!(parsed.documents, 3);
        assert!(parsed.success);
    }

    #[test]
    fn failed_entry_keeps_error_text() {
        let entry = RequestLogEntry {
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
            endpoint: "/summarize-text".to_string(),
            documents: 1,
            summary_length: 150,
            success: false,
            latency_ms: 12,
            error: Some("connection refused".to_string()),
        };

        let json = serde_json::to_string(&entry).unwrap();
        let parsed: RequestLogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn entry_without_error_field_deserializes() {
        let json = r#"{"timestamp":"t","endpoint":"/upload","documents":1,"summary_length":150,"success":true,"latency_ms":5}"#;
        let parsed: RequestLogEntry = serde_json::from_str(json).unwrap();
        assert!(parsed.error.is_none());
    }
}

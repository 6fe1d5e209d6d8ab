//! HTTP client for the summarization server.
//!
//! Communicates with the server using the synchronous `ureq` client.
//! Provides:
//!
//! - **Health check**: verify the server is reachable.
//! - **Upload**: submit one or more document files for summarization.
//! - **Summarize text**: submit a raw text snippet.
//!
//! Both submission endpoints take multipart form bodies (see [`multipart`])
//! and return the same JSON contract: index-aligned `original_texts` and
//! `summaries`, plus an optional pairwise `similarity_matrix`.

pub mod multipart;

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::PrecisConfig;
use multipart::MultipartForm;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// One document file queued for upload: original filename plus raw bytes.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    /// Read a document from disk, preserving the filename for the server.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("failed to read file: {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("path has no file name: {}", path.display()))?;
        Ok(Self { name, bytes })
    }
}

/// Response body shared by `POST /upload` and `POST /summarize-text`.
///
/// All fields are optional on the wire so that a response with missing
/// pieces deserializes cleanly and the shape check happens at render time,
/// where it can be reported inline instead of as a parse failure. The server
/// sends `similarity_matrix: null` for single-text requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizeResponse {
    #[serde(default)]
    pub original_texts: Option<Vec<String>>,
    #[serde(default)]
    pub summaries: Option<Vec<String>>,
    #[serde(default)]
    pub similarity_matrix: Option<Vec<Vec<f64>>>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous summarization server client.
///
/// Created from the resolved config and reused for the lifetime of a single
/// `precis` invocation.
#[derive(Debug)]
pub struct SummaryClient {
    base_url: String,
    timeout: Duration,
    summary_length: u32,
}

impl SummaryClient {
    /// Build a client from the resolved config.
    pub fn from_config(config: &PrecisConfig) -> Self {
        Self {
            base_url: config.server.url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(config.server.timeout_ms),
            summary_length: config.summary.length,
        }
    }

    /// Check whether the summarization server is reachable.
    ///
    /// Uses a short timeout (5 s) so `precis health` doesn't stall when the
    /// server is down. Resolves `localhost` to `127.0.0.1` to avoid IPv6 DNS
    /// delays on Windows.
    pub fn is_healthy(&self) -> bool {
        let url = resolve_localhost(&self.base_url);
        ureq::get(&url).timeout(Duration::from_secs(5)).call().is_ok()
    }

    /// Submit document files to `POST /upload` and return the parsed response.
    ///
    /// Emits one `files` part per document (insertion order preserved — the
    /// server aligns response entries by position) plus a `summary_length`
    /// field. Any non-2xx status, transport failure, or JSON parse failure is
    /// a hard error.
    pub fn upload(&self, files: &[DocumentFile]) -> Result<SummarizeResponse> {
        let mut form = MultipartForm::new();
        for file in files {
            form = form.file(
                "files",
                &file.name,
                multipart::content_type_for(&file.name),
                &file.bytes,
            );
        }
        form = form.text("summary_length", &self.summary_length.to_string());

        self.post_form("/upload", form)
            .context("file upload request failed")
    }

    /// Submit raw text to `POST /summarize-text` and return the parsed
    /// response.
    pub fn summarize_text(&self, text: &str) -> Result<SummarizeResponse> {
        let form = MultipartForm::new()
            .text("text", text)
            .text("summary_length", &self.summary_length.to_string());

        self.post_form("/summarize-text", form)
            .context("text summarization request failed")
    }

    /// POST a multipart form to an endpoint and parse the JSON response.
    fn post_form(&self, endpoint: &str, form: MultipartForm) -> Result<SummarizeResponse> {
        let url = resolve_localhost(&format!("{}{}", self.base_url, endpoint));
        let (content_type, body) = form.finish();

        let resp = ureq::post(&url)
            .timeout(self.timeout)
            .set("Content-Type", &content_type)
            .send_bytes(&body)
            .with_context(|| format!("POST {endpoint} failed"))?;

        resp.into_json()
            .with_context(|| format!("failed to parse JSON response from {endpoint}"))
    }

    /// The configured summary length, for logging.
    pub fn summary_length(&self) -> u32 {
        self.summary_length
    }

    /// The configured server base URL, for diagnostics.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Rewrite `localhost` to `127.0.0.1`.
///
/// On Windows, "localhost" may try IPv6 (::1) first, causing timeouts when
/// the server only binds to IPv4.
fn resolve_localhost(url: &str) -> String {
    url.replace("://localhost", "://127.0.0.1")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_default_config() {
        let config = PrecisConfig::default();
        let client = SummaryClient::from_config(&config);
        assert_eq!(client.base_url, "http://127.0.0.1:8000");
        assert_eq!(client.timeout, Duration::from_millis(30_000));
        assert_eq!(client.summary_length, 150);
    }

    #[test]
    fn client_strips_trailing_slash() {
        let mut config = PrecisConfig::default();
        config.server.url = "http://127.0.0.1:8000/".to_string();
        let client = SummaryClient::from_config(&config);
        assert_eq!(client.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn localhost_is_rewritten() {
        assert_eq!(
            resolve_localhost("http://localhost:8000/upload"),
            "http://127.0.0.1:8000/upload"
        );
        assert_eq!(
            resolve_localhost("http://summarizer.internal/upload"),
            "http://summarizer.internal/upload"
        );
    }

    #[test]
    fn response_with_missing_fields_deserializes() {
        let resp: SummarizeResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.original_texts.is_none());
        assert!(resp.summaries.is_none());
        assert!(resp.similarity_matrix.is_none());
    }

    #[test]
    fn response_with_null_matrix_deserializes() {
        let json = r#"{
            "original_texts": ["some text"],
            "summaries": ["a summary"],
            "similarity_matrix": null
        }"#;
        let resp: SummarizeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.original_texts.unwrap().len(), 1);
        assert_eq!(resp.summaries.unwrap(), vec!["a summary"]);
        assert!(resp.similarity_matrix.is_none());
    }

    #[test]
    fn response_with_matrix_deserializes() {
        let json = r#"{
            "original_texts": ["a", "b"],
            "summaries": ["sa", "sb"],
            "similarity_matrix": [[1.0, 0.42], [0.42, 1.0]]
        }"#;
        let resp: SummarizeResponse = serde_json::from_str(json).unwrap();
        let matrix = resp.similarity_matrix.unwrap();
        assert_eq!(matrix.len(), 2);
        assert!((matrix[0][1] - 0.42).abs() < f64::EPSILON);
    }
}

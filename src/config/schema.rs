//! Configuration schema and defaults for precis.
//!
//! Defines the TOML-serializable configuration structure with all sections:
//! `[server]`, `[summary]`, `[output]`, and `[logging]`.
//!
//! Every field has a sensible built-in default. Users only need to set the
//! values they want to override.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level precis configuration.
///
/// Maps directly to the `~/.precis/config.toml` and `.precis.toml` file
/// schemas. All sections and fields are optional — missing values fall back
/// to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecisConfig {
    pub server: ServerConfig,
    pub summary: SummaryConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

/// Summarization server connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the summarization server.
    pub url: String,
    /// Request timeout in milliseconds. Summarization of large documents can
    /// take a while, so the default is generous.
    pub timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8000".to_string(),
            timeout_ms: 30_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [summary]
// ---------------------------------------------------------------------------

/// Summary generation settings sent along with every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Requested maximum summary length in tokens, sent as the
    /// `summary_length` form field. Overridable per invocation with
    /// `--summary-length`.
    pub length: u32,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self { length: 150 }
    }
}

// ---------------------------------------------------------------------------
// [output]
// ---------------------------------------------------------------------------

/// Default rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format: `"table"`, `"html"`, or `"json"`.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "table".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Request history logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether request history logging is enabled.
    pub enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl PrecisConfig {
    /// Generate the annotated default TOML config file content.
    ///
    /// Used by `precis config init` to create a starting config file with
    /// all settings documented.
    pub fn default_toml() -> String {
        r#"# precis Configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (PRECIS_*)
#   2. Project config (.precis.toml in current directory)
#   3. User global config (~/.precis/config.toml)
#   4. Built-in defaults

[server]
url = "http://127.0.0.1:8000"
timeout_ms = 30000

[summary]
length = 150          # Requested summary length in tokens

[output]
format = "table"      # table | html | json

[logging]
enabled = true        # Append requests to ~/.precis/request-log.jsonl
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

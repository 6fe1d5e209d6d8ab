//! CLI command implementations for precis.
//!
//! Provides subcommand handlers for:
//! - `precis files <PATHS...>` — summarize local documents via `/upload`
//! - `precis text [TEXT]` — summarize raw text via `/summarize-text`
//! - `precis health` — check server reachability and config status
//! - `precis history` — show recent summarization requests
//! - `precis config show|init|set|reset` — configuration management

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::client::{DocumentFile, SummaryClient};
use crate::config;
use crate::controller::{Controller, Notice, Notifier};
use crate::history;
use crate::render::{RenderFormat, RenderTarget};

// ---------------------------------------------------------------------------
// Per-invocation overrides
// ---------------------------------------------------------------------------

/// Command-line overrides applied on top of the resolved config.
#[derive(Debug, Default, Clone)]
pub struct RequestOverrides {
    pub summary_length: Option<u32>,
    pub server: Option<String>,
    pub format: Option<String>,
    pub output: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Console notifier
// ---------------------------------------------------------------------------

/// Marker error for failures the notifier has already reported on stderr.
///
/// `main` exits non-zero without printing it, so the user sees exactly one
/// failure message.
#[derive(Debug)]
pub struct ReportedFailure;

impl std::fmt::Display for ReportedFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("request failed")
    }
}

impl std::error::Error for ReportedFailure {}

/// Prints controller notices to stderr, colored by severity.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        match notice {
            Notice::Validation(message) | Notice::Busy(message) => {
                eprintln!("{} {}", "!".yellow().bold(), message.yellow());
            }
            Notice::Failure(message) => {
                eprintln!("{} {}", "✗".red().bold(), message.red());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// precis files
// ---------------------------------------------------------------------------

/// Summarize one or more local document files.
pub fn run_files(paths: &[PathBuf], overrides: &RequestOverrides) -> Result<()> {
    let files = paths
        .iter()
        .map(|p| DocumentFile::from_path(p))
        .collect::<Result<Vec<_>>>()?;

    let mut controller = build_controller(overrides);
    if controller.submit_files(&files) {
        emit(controller.target().content(), overrides.output.as_deref())
    } else {
        Err(ReportedFailure.into())
    }
}

// ---------------------------------------------------------------------------
// precis text
// ---------------------------------------------------------------------------

/// Summarize raw text, read from the argument or from stdin.
pub fn run_text(text: Option<String>, overrides: &RequestOverrides) -> Result<()> {
    let text = match text {
        Some(t) => t,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read text from stdin")?;
            buffer
        }
    };

    let mut controller = build_controller(overrides);
    if controller.submit_text(&text) {
        emit(controller.target().content(), overrides.output.as_deref())
    } else {
        Err(ReportedFailure.into())
    }
}

/// Assemble a controller from config plus per-invocation overrides.
fn build_controller(overrides: &RequestOverrides) -> Controller<ConsoleNotifier> {
    let mut cfg = config::load();
    if let Some(url) = &overrides.server {
        cfg.server.url = url.clone();
    }
    if let Some(length) = overrides.summary_length {
        cfg.summary.length = length;
    }
    if let Some(format) = &overrides.format {
        cfg.output.format = format.clone();
    }

    let client = SummaryClient::from_config(&cfg);
    let target = RenderTarget::new(RenderFormat::from_str_opt(Some(&cfg.output.format)));
    Controller::new(client, target, ConsoleNotifier).with_logging(cfg.logging.enabled)
}

/// Print rendered content to stdout, or write it to a file.
fn emit(content: String, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            println!("{} Report written to {}", "✓".green().bold(), path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// precis health
// ---------------------------------------------------------------------------

/// Check system health: config files, server reachability, request log.
pub fn run_health() -> Result<()> {
    println!("{}", "precis Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    // Config file status
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.precis/config.toml found"
        } else {
            "not found (run `precis config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".precis.toml found"
        } else {
            "none (optional)"
        },
    );

    // Server connectivity
    let cfg = config::load();
    let client = SummaryClient::from_config(&cfg);
    let server_ok = client.is_healthy();
    let server_detail = if server_ok {
        format!("reachable at {}", client.base_url())
    } else {
        format!("not reachable at {} — is the server running?", client.base_url())
    };
    print_health_item("Server", server_ok, &server_detail);

    print_health_item(
        "Summary length",
        true,
        &format!("{} tokens", cfg.summary.length),
    );

    // Request log
    let log_exists = history::request_log_path()
        .map(|p| p.exists())
        .unwrap_or(false);
    let log_entries = if log_exists {
        history::read_all_entries().len()
    } else {
        0
    };
    print_health_item(
        "Request log",
        log_exists,
        &if log_exists {
            format!("{log_entries} entries")
        } else {
            "no log file yet".to_string()
        },
    );

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// precis history
// ---------------------------------------------------------------------------

/// Show the most recent summarization requests.
pub fn run_history(limit: usize, format: &str) -> Result<()> {
    let entries = history::read_recent_entries(limit);

    if entries.is_empty() {
        println!(
            "{}",
            "No requests yet. Summarize something to see history here.".yellow()
        );
        return Ok(());
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{}", "precis Request History".bold().cyan());
    println!("{}", "=".repeat(72));
    println!(
        "  {:<20} {:<17} {:>5} {:>8} {:>9}  Status",
        "Time", "Endpoint", "Docs", "Length", "Latency"
    );
    println!("  {}", "-".repeat(70));

    for (i, entry) in entries.iter().enumerate() {
        let status = if entry.success {
            "ok".green()
        } else {
            entry
                .error
                .as_deref()
                .unwrap_or("failed")
                .red()
        };
        let line = format!(
            "  {:<20} {:<17} {:>5} {:>8} {:>7}ms  {}",
            truncate(&entry.timestamp, 19),
            entry.endpoint,
            entry.documents,
            entry.summary_length,
            entry.latency_ms,
            status,
        );

        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// precis config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective precis Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.precis/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            "~/.precis/config.toml (not found)".dimmed()
        );
    }
    if project_exists {
        println!("  {} {}", "✓".green(), ".precis.toml".dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), ".precis.toml (not found)".dimmed());
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "PRECIS_* environment variables".dimmed()
    );

    Ok(())
}

/// Initialize a default config file at `~/.precis/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!(
        "  {}",
        "Edit the file to point precis at your summarization server.".dimmed()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("ab", 2), "ab");
    }

    #[test]
    fn failed_submission_returns_marker_error() {
        let overrides = RequestOverrides {
            server: Some("http://127.0.0.1:9".to_string()),
            ..Default::default()
        };

        // Empty selection is rejected by the controller; the error must be
        // the quiet marker, not a second printable message.
        let err = run_files(&[], &overrides).unwrap_err();
        assert!(err.downcast_ref::<ReportedFailure>().is_some());
    }

    #[test]
    fn overrides_apply_to_config() {
        let overrides = RequestOverrides {
            summary_length: Some(80),
            server: Some("http://127.0.0.1:9000".to_string()),
            format: Some("json".to_string()),
            output: None,
        };

        let controller = build_controller(&overrides);
        assert_eq!(controller.client().base_url(), "http://127.0.0.1:9000");
        assert_eq!(controller.client().summary_length(), 80);
        assert_eq!(controller.target().format(), RenderFormat::Json);
    }
}

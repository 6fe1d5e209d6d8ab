//! Configuration system for precis.
//!
//! Provides a layered configuration hierarchy:
//!
//! 1. **Built-in defaults** — hardcoded in [`schema::PrecisConfig::default()`]
//! 2. **User global config** — `~/.precis/config.toml`
//! 3. **Project local config** — `.precis.toml` in the current working directory
//! 4. **Environment variables** — `PRECIS_*` overrides (highest precedence)
//!
//! Later layers override earlier ones. Missing sections in a TOML file fall
//! back to the previous layer's values.

pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::PrecisConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved precis configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. This is the primary entry point for all modules that need
/// configuration.
pub fn load() -> PrecisConfig {
    let mut config = PrecisConfig::default();

    // Layer 2: user global config (~/.precis/config.toml)
    if let Some(global) = load_toml_value(global_config_path()) {
        merge_layer(&mut config, &global);
    }

    // Layer 3: project local config (.precis.toml)
    if let Some(project) = load_toml_value(project_config_path()) {
        merge_layer(&mut config, &project);
    }

    // Layer 4: environment variable overrides
    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file as a raw value tree (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed. A broken config file must never keep the tool from
/// running with defaults.
fn load_toml_value(path: Option<PathBuf>) -> Option<toml::Value> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge one config layer into the resolved config.
///
/// The layer stays a raw `toml::Value` so only the keys the file actually
/// sets are applied; everything the file leaves out keeps the value from the
/// layers below it. An overlay that produces an invalid config is ignored.
fn merge_layer(base: &mut PrecisConfig, overlay: &toml::Value) {
    let Ok(mut root) = toml::Value::try_from(&*base) else {
        return;
    };
    merge_toml(&mut root, overlay);
    if let Ok(merged) = root.try_into() {
        *base = merged;
    }
}

/// Recursively merge an overlay value tree into a base tree.
///
/// Tables merge key by key; any other value in the overlay replaces the base
/// value outright.
fn merge_toml(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(existing) if existing.is_table() && value.is_table() => {
                        merge_toml(existing, value);
                    }
                    _ => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.precis/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".precis").join("config.toml"))
}

/// Path to the project local config: `.precis.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".precis.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `PRECIS_SERVER_URL` — summarization server base URL
/// - `PRECIS_TIMEOUT_MS` — request timeout in milliseconds
/// - `PRECIS_SUMMARY_LENGTH` — requested summary length in tokens
/// - `PRECIS_FORMAT` — output format (`table`, `html`, `json`)
/// - `PRECIS_LOGGING` — request history logging (`1`/`true`/`yes`/`on`)
fn apply_env_overrides(config: &mut PrecisConfig) {
    if let Ok(val) = std::env::var("PRECIS_SERVER_URL")
        && !val.is_empty()
    {
        config.server.url = val;
    }
    if let Ok(val) = std::env::var("PRECIS_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.server.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("PRECIS_SUMMARY_LENGTH")
        && let Ok(len) = val.parse::<u32>()
    {
        config.summary.length = len;
    }
    if let Ok(val) = std::env::var("PRECIS_FORMAT")
        && !val.is_empty()
    {
        config.output.format = val;
    }
    if let Ok(val) = std::env::var("PRECIS_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.precis/config.toml`.
///
/// Creates the `~/.precis/` directory if it doesn't exist. Returns an error
/// if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.precis/ directory")?;
    }

    fs::write(&path, PrecisConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Reads the current global config (or defaults), updates the specified key,
/// and writes the result back. Supports dotted keys like `summary.length`.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let mut value_table: toml::Value = if path.exists() {
        let content = fs::read_to_string(&path).context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config as TOML value")?
    } else {
        let defaults = toml::to_string_pretty(&PrecisConfig::default())
            .context("failed to serialize default config")?;
        toml::from_str(&defaults).context("failed to parse serialized defaults")?
    };

    set_toml_value(&mut value_table, key, value)?;

    let output =
        toml::to_string_pretty(&value_table).context("failed to serialize updated config")?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.is_empty() {
        anyhow::bail!("empty config key");
    }

    // Navigate to the parent table
    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    // Determine the type of the existing value to parse correctly
    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("yes"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn project_layer_keeps_unset_global_values() {
        let mut config = PrecisConfig::default();

        let global: toml::Value = toml::from_str(
            r#"
[server]
url = "http://global-server:1234"
"#,
        )
        .unwrap();
        merge_layer(&mut config, &global);

        let project: toml::Value = toml::from_str(
            r#"
[summary]
length = 80
"#,
        )
        .unwrap();
        merge_layer(&mut config, &project);

        // The project file only set summary.length; the global url survives.
        assert_eq!(config.server.url, "http://global-server:1234");
        assert_eq!(config.summary.length, 80);
        assert_eq!(config.server.timeout_ms, 30_000);
    }

    #[test]
    fn layer_overrides_only_keys_it_sets() {
        let mut config = PrecisConfig::default();

        let layer: toml::Value = toml::from_str(
            r#"
[server]
timeout_ms = 5000
"#,
        )
        .unwrap();
        merge_layer(&mut config, &layer);

        assert_eq!(config.server.timeout_ms, 5000);
        // url lives in the same section but was not set by the layer.
        assert_eq!(config.server.url, "http://127.0.0.1:8000");
    }

    #[test]
    fn merge_toml_replaces_scalars_and_merges_tables() {
        let mut base: toml::Value = toml::from_str(
            r#"
[a]
x = 1
y = 2
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[a]
y = 9
"#,
        )
        .unwrap();
        merge_toml(&mut base, &overlay);

        let a = base["a"].as_table().unwrap();
        assert_eq!(a["x"].as_integer(), Some(1));
        assert_eq!(a["y"].as_integer(), Some(9));
    }

    #[test]
    fn set_toml_value_updates_string() {
        let toml_str = r#"
[server]
url = "http://127.0.0.1:8000"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "server.url", "http://summarizer:9000").unwrap();

        let table = root.as_table().unwrap();
        let server = table["server"].as_table().unwrap();
        assert_eq!(server["url"].as_str(), Some("http://summarizer:9000"));
    }

    #[test]
    fn set_toml_value_updates_integer() {
        let toml_str = r#"
[summary]
length = 150
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "summary.length", "80").unwrap();

        let table = root.as_table().unwrap();
        let summary = table["summary"].as_table().unwrap();
        assert_eq!(summary["length"].as_integer(), Some(80));
    }

    #[test]
    fn set_toml_value_updates_bool() {
        let toml_str = r#"
[logging]
enabled = true
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "logging.enabled", "false").unwrap();

        let table = root.as_table().unwrap();
        let logging = table["logging"].as_table().unwrap();
        assert_eq!(logging["enabled"].as_bool(), Some(false));
    }

    #[test]
    fn set_toml_value_rejects_invalid_key() {
        let toml_str = r#"
[server]
url = "http://127.0.0.1:8000"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        let result = set_toml_value(&mut root, "nonexistent.key", "value");
        assert!(result.is_err());
    }

    #[test]
    fn set_toml_value_rejects_non_numeric_integer() {
        let toml_str = r#"
[summary]
length = 150
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        let result = set_toml_value(&mut root, "summary.length", "lots");
        assert!(result.is_err());
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let result = show_effective_config();
        assert!(result.is_ok());
        let toml_str = result.unwrap();
        // Should be parseable back
        let _: PrecisConfig = toml::from_str(&toml_str).unwrap();
    }
}

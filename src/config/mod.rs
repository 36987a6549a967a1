//! Configuration system for shelfwatch.
//!
//! Provides a layered configuration hierarchy:
//!
//! 1. **Built-in defaults** — hardcoded in [`schema::ShelfwatchConfig::default()`]
//! 2. **User global config** — `~/.shelfwatch/config.toml`
//! 3. **Project local config** — `.shelfwatch.toml` in the current working directory
//! 4. **Environment variables** — `SHELFWATCH_*` overrides (highest precedence)
//!
//! Later layers override earlier ones. Missing sections in a TOML file fall
//! back to the previous layer's values.
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::ShelfwatchConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved shelfwatch configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. This is the primary entry point for all modules that need
/// configuration.
pub fn load() -> ShelfwatchConfig {
    let mut config = ShelfwatchConfig::default();

    // Layer 2: user global config (~/.shelfwatch/config.toml)
    if let Some(global) = load_toml_file(global_config_path()) {
        merge_config(&mut config, &global);
    }

    // Layer 3: project local config (.shelfwatch.toml)
    if let Some(project) = load_toml_file(project_config_path()) {
        merge_config(&mut config, &project);
    }

    // Layer 4: environment variable overrides
    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed. A broken config file must never take the dashboard
/// down, so malformed files are silently ignored.
fn load_toml_file(path: Option<PathBuf>) -> Option<ShelfwatchConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge a loaded config layer into the base config.
///
/// Each TOML file deserializes with `serde(default)`, so unset keys carry
/// the built-in defaults — which match the base's defaults. Replacing the
/// base wholesale therefore applies exactly the keys the user set.
fn merge_config(base: &mut ShelfwatchConfig, overlay: &ShelfwatchConfig) {
    *base = overlay.clone();
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.shelfwatch/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".shelfwatch").join("config.toml"))
}

/// Path to the project local config: `.shelfwatch.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".shelfwatch.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `SHELFWATCH_API_URL` — estimation service base URL
/// - `SHELFWATCH_TIMEOUT_SECS` — upload request timeout
/// - `SHELFWATCH_CONFIDENCE_THRESHOLD` — confidence threshold sent upstream
/// - `SHELFWATCH_LOW_STOCK` — low-stock classification cutoff
/// - `SHELFWATCH_STORE_DIR` — state directory
/// - `SHELFWATCH_WEB_ADDR` — dashboard listen address
/// - `SHELFWATCH_LOGGING` — upload journal on/off (`1`/`true`/`yes`/`on`)
fn apply_env_overrides(config: &mut ShelfwatchConfig) {
    if let Ok(val) = std::env::var("SHELFWATCH_API_URL")
        && !val.is_empty()
    {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("SHELFWATCH_TIMEOUT_SECS")
        && let Ok(secs) = val.parse::<u64>()
    {
        config.api.timeout_secs = secs;
    }
    if let Ok(val) = std::env::var("SHELFWATCH_CONFIDENCE_THRESHOLD")
        && let Ok(threshold) = val.parse::<f64>()
    {
        config.api.confidence_threshold = threshold;
    }
    if let Ok(val) = std::env::var("SHELFWATCH_LOW_STOCK")
        && let Ok(threshold) = val.parse::<f64>()
    {
        config.thresholds.low_stock = threshold;
    }
    if let Ok(val) = std::env::var("SHELFWATCH_STORE_DIR")
        && !val.is_empty()
    {
        config.store.dir = val;
    }
    if let Ok(val) = std::env::var("SHELFWATCH_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
    if let Ok(val) = std::env::var("SHELFWATCH_LOGGING") {
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

/// Write the default annotated config to `~/.shelfwatch/config.toml`.
///
/// Creates the `~/.shelfwatch/` directory if it doesn't exist. Returns an
/// error if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.shelfwatch/ directory")?;
    }

    fs::write(&path, ShelfwatchConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Reads the current global config (or defaults), updates the specified key,
/// and writes the result back. Supports dotted keys like `thresholds.low_stock`.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&ShelfwatchConfig::default())
            .context("failed to serialize default config")?
    };

    let mut value_table: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;

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
    let existing = table.get(leaf);
    let new_value = match existing {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(toml::Value::Array(_)) => {
            // Parse as comma-separated list
            let items: Vec<toml::Value> = raw_value
                .split(',')
                .map(|s| toml::Value::String(s.trim().to_string()))
                .collect();
            toml::Value::Array(items)
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
        assert!(!is_truthy(""));
    }

    #[test]
    fn expand_home_passes_absolute_paths_through() {
        assert_eq!(expand_home("/tmp/x"), PathBuf::from("/tmp/x"));
    }

    #[test]
    fn expand_home_resolves_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/.shelfwatch"), home.join(".shelfwatch"));
        }
    }

    #[test]
    fn set_toml_value_updates_string() {
        let toml_str = r#"
[api]
base_url = "http://localhost:8000"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "api.base_url", "http://other:9000").unwrap();

        let table = root.as_table().unwrap();
        let api = table["api"].as_table().unwrap();
        assert_eq!(api["base_url"].as_str(), Some("http://other:9000"));
    }

    #[test]
    fn set_toml_value_updates_float() {
        let toml_str = r#"
[thresholds]
low_stock = 0.3
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "thresholds.low_stock", "0.25").unwrap();

        let table = root.as_table().unwrap();
        let thresholds = table["thresholds"].as_table().unwrap();
        assert!((thresholds["low_stock"].as_float().unwrap() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn set_toml_value_updates_integer() {
        let toml_str = r#"
[store]
history_capacity = 10
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "store.history_capacity", "5").unwrap();

        let table = root.as_table().unwrap();
        let store = table["store"].as_table().unwrap();
        assert_eq!(store["history_capacity"].as_integer(), Some(5));
    }

    #[test]
    fn set_toml_value_updates_array() {
        let toml_str = r#"
[api]
products = ["banana"]
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "api.products", "banana, tomato").unwrap();

        let table = root.as_table().unwrap();
        let api = table["api"].as_table().unwrap();
        let products = api["products"].as_array().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].as_str(), Some("tomato"));
    }

    #[test]
    fn set_toml_value_rejects_invalid_key() {
        let toml_str = r#"
[api]
base_url = "http://localhost:8000"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        let result = set_toml_value(&mut root, "nonexistent.key", "value");
        assert!(result.is_err());
    }
}

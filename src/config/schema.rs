/// Configuration schema and defaults for shelfwatch.
///
/// Defines the TOML-serializable configuration structure with all sections:
/// `[api]`, `[thresholds]`, `[store]`, `[web]`, and `[logging]`.
///
/// Every field has a sensible built-in default. Users only need to set the
/// values they want to override. The two magic numbers the product depends
/// on — the 0.3 low-stock cutoff and the 0.7 confidence threshold — live
/// here and nowhere else.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level shelfwatch configuration.
///
/// Maps directly to the `~/.shelfwatch/config.toml` and `.shelfwatch.toml`
/// file schemas. All sections and fields are optional — missing values fall
/// back to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfwatchConfig {
    pub api: ApiConfig,
    pub thresholds: ThresholdsConfig,
    pub store: StoreConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Remote estimation service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the estimation service.
    pub base_url: String,
    /// Request timeout in seconds. Generous because the remote step is AI
    /// inference, not a plain file transfer.
    pub timeout_secs: u64,
    /// Minimum confidence the service should apply, sent with every upload.
    pub confidence_threshold: f64,
    /// Product hints sent as a comma-separated list.
    pub products: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 300,
            confidence_threshold: 0.7,
            products: vec![
                "banana".to_string(),
                "broccoli".to_string(),
                "avocado".to_string(),
                "tomato".to_string(),
                "onion".to_string(),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// [thresholds]
// ---------------------------------------------------------------------------

/// Stock classification thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdsConfig {
    /// Results below this stock fraction count as low when the service sent
    /// no explicit status.
    pub low_stock: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self { low_stock: 0.3 }
    }
}

// ---------------------------------------------------------------------------
// [store]
// ---------------------------------------------------------------------------

/// State store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// State directory. `~` is expanded to the home directory.
    pub dir: String,
    /// Maximum retained history entries before the oldest is evicted.
    pub history_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: "~/.shelfwatch/state".to_string(),
            history_capacity: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

/// Embedded dashboard server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listen address for `shelfwatch web`.
    pub addr: String,
    /// Open the dashboard in the default browser on startup.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9748".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Upload journal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether upload journaling is enabled.
    pub enabled: bool,
    /// Path to the journal file. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.shelfwatch/upload-log.jsonl".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl ShelfwatchConfig {
    /// Generate the annotated default TOML config file content.
    ///
    /// Used by `shelfwatch config init` to create a starting config file
    /// with all settings documented.
    pub fn default_toml() -> String {
        r#"# shelfwatch Configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (SHELFWATCH_*)
#   2. Project config (.shelfwatch.toml in current directory)
#   3. User global config (~/.shelfwatch/config.toml)
#   4. Built-in defaults

[api]
base_url = "http://localhost:8000"
timeout_secs = 300                    # 5 minutes — the remote step is AI inference
confidence_threshold = 0.7
products = ["banana", "broccoli", "avocado", "tomato", "onion"]

[thresholds]
low_stock = 0.3                       # Below 30% counts as low when no explicit status

[store]
dir = "~/.shelfwatch/state"
history_capacity = 10                 # Oldest history entries are evicted beyond this

[web]
addr = "127.0.0.1:9748"
open_browser = true

[logging]
enabled = true
path = "~/.shelfwatch/upload-log.jsonl"
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

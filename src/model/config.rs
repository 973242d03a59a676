use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Configuration from scenes.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub editing: EditingConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Data file, relative to the data directory
    #[serde(default = "default_store_file")]
    pub file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            file: default_store_file(),
        }
    }
}

fn default_store_file() -> String {
    "scenes.json".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditingConfig {
    /// Quiet period before a free-text cell is saved
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Near-matches offered by the custom value dialog
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    /// Rows visible in a dropdown panel before it scrolls
    #[serde(default = "default_dropdown_rows")]
    pub dropdown_rows: u16,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl EditingConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for EditingConfig {
    fn default() -> Self {
        EditingConfig {
            debounce_ms: default_debounce_ms(),
            max_suggestions: default_max_suggestions(),
            dropdown_rows: default_dropdown_rows(),
            placeholder: default_placeholder(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_max_suggestions() -> usize {
    3
}

fn default_dropdown_rows() -> u16 {
    8
}

fn default_placeholder() -> String {
    "Type to search...".into()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Color overrides by theme key, e.g. `highlight = "#FB4196"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Width of the navigation sidebar in cells
    #[serde(default)]
    pub sidebar_width: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_file")]
    pub file: String,
    /// Default filter directive; RUST_LOG takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

fn default_log_file() -> String {
    ".scenes.log".into()
}

fn default_log_level() -> String {
    "info".into()
}

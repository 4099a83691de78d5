use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration from remark.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Missing `[store]` is a fatal startup error, reported by config_io.
    #[serde(default)]
    pub store: Option<StoreConfig>,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the shared JSON document, relative to the config file's directory.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Theme overrides keyed by theme slot (e.g. "background" = "#000000").
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Replacement category palette. Entries that fail to parse are ignored.
    #[serde(default)]
    pub palette: Vec<String>,
    /// Show key hints on the selected row and in the status row.
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
}

fn default_true() -> bool {
    true
}

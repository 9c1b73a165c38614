//! Application Configuration
//! Optional JSON settings file named by `EDA_EXPLORER_CONFIG`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable holding the path of the JSON configuration file.
pub const CONFIG_ENV_VAR: &str = "EDA_EXPLORER_CONFIG";

/// User-tunable settings. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Literal used by "Fill Missing Values" until the user edits it.
    pub fill_value: String,
    /// Rows scanned by the CSV reader to infer column types.
    pub infer_schema_length: usize,
    /// Maximum rows rendered per table in the report viewer.
    pub preview_rows: usize,
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fill_value: "xf".to_string(),
            infer_schema_length: 10000,
            preview_rows: 200,
            window_size: [1400.0, 800.0],
        }
    }
}

impl AppConfig {
    /// Parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Load from `EDA_EXPLORER_CONFIG`, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Self::default();
        };

        match Self::from_file(Path::new(&path)) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                log::warn!("{e:#}; using default configuration");
                Self::default()
            }
        }
    }
}

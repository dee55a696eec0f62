use crate::error::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;

/// Optional settings file; every field falls back to `GeneratorOptions::default()`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub debug_mode: Option<bool>,
    pub max_widget_depth: Option<usize>,
    pub write_retries: Option<u32>,
    pub retry_backoff_ms: Option<u64>,
    pub clean_output: Option<bool>,
    pub emit_custom_widgets: Option<bool>,
    pub output_directory: Option<String>,
}

pub fn load(config_path: &str) -> Result<ConfigFile> {
    let config_content = fs::read_to_string(config_path).map_err(|e| GeneratorError::FileNotFound {
        path: format!("Config file {}: {}", config_path, e),
    })?;
    let config = parse(config_path, &config_content)?;
    log::info!("Loaded configuration from {}", config_path);
    Ok(config)
}

fn parse(config_path: &str, config_content: &str) -> Result<ConfigFile> {
    if config_path.ends_with(".json") {
        serde_json::from_str(config_content).map_err(|e| GeneratorError::InvalidFormat {
            message: format!("Invalid JSON config: {}", e),
        })
    } else if config_path.ends_with(".toml") {
        toml::from_str(config_content).map_err(|e| GeneratorError::InvalidFormat {
            message: format!("Invalid TOML config: {}", e),
        })
    } else {
        Err(GeneratorError::InvalidFormat {
            message: "Config file must be .json or .toml format".to_string(),
        })
    }
}

//! Configuration discovery and loading.
//!
//! Configuration lives in `~/.spread-pipeline/config.json` unless the
//! `SPREAD_CONFIG` environment variable points elsewhere. A missing file is
//! not an error: callers receive the `Default` configuration.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::validation::{ValidationError, ValidationResult};

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "SPREAD_CONFIG";

/// Get the configuration directory.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".spread-pipeline"),
        |dirs| dirs.home_dir().join(".spread-pipeline"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => expand_path(&path),
        _ => config_dir().join("config.json"),
    }
}

/// Expand `~` and environment variables in a configured path.
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(raw).as_ref()),
    }
}

/// Load a JSON configuration document.
///
/// Returns `T::default()` when the file does not exist.
pub fn load_json_config<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        tracing::info!(path = %path.display(), "Config file not found, using defaults");
        return Ok(T::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))
}

/// Overwrite `target` with the parsed value of environment variable `name`.
///
/// Returns `Ok(true)` when an override was applied and `Ok(false)` when the
/// variable is unset. A value that does not parse is a configuration error.
pub fn env_override<T: FromStr>(name: &str, target: &mut T) -> ValidationResult<bool> {
    let Ok(raw) = std::env::var(name) else {
        return Ok(false);
    };

    let value = raw
        .trim()
        .parse::<T>()
        .map_err(|_| ValidationError::invalid(name, format!("cannot parse {:?}", raw)))?;
    *target = value;
    tracing::debug!(env = name, "Applied environment override");
    Ok(true)
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, compact, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets held at `warn`.
    #[serde(default)]
    pub exclude_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            exclude_targets: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

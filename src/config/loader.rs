// src/config/loader.rs
//! Layered configuration loading with environment overrides
//!
//! Configuration is assembled from the crate defaults, then any existing
//! file from the discovered path list (later paths win, tables merge
//! recursively), then `PROBE_`-prefixed environment variables. Validation
//! happens once, on the fully merged value, so a partial override file never
//! has to restate fields it does not change.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::constants::{env as env_consts, paths};
use crate::config::trigger::{RawTriggerConfig, TriggerConfig, TriggerConfigError};
use crate::config::ProbeConfig;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// The file is not well-formed TOML or does not match the schema.
    #[error("configuration parse error: {0}")]
    Parse(String),

    /// The trigger limits violate a range or ordering constraint.
    #[error("invalid trigger limits: {0}")]
    Validation(#[from] TriggerConfigError),

    /// Underlying filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Merged view of all configuration sections before validation.
#[derive(Debug, Default, Deserialize)]
struct RawProbeConfig {
    #[serde(default)]
    trigger: RawTriggerConfig,
}

/// Loads probe configuration from layered TOML files and the environment.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader over the standard configuration path list.
    pub fn new() -> Self {
        Self {
            config_paths: Self::discover_config_paths(),
        }
    }

    /// Create a loader over an explicit path list (first to last, later
    /// files override earlier ones).
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
        }
    }

    /// Paths consulted by [`load`](Self::load), in merge order.
    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    /// Load, merge, and validate the probe configuration.
    ///
    /// Missing files are skipped; a present-but-invalid file aborts the
    /// load. With no files and no environment overrides this returns
    /// `ProbeConfig::default()`.
    pub fn load(&self) -> Result<ProbeConfig, ConfigError> {
        let mut merged = toml::Value::try_from(ProbeConfig::default())
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        for path in &self.config_paths {
            if !path.exists() {
                debug!(path = %path.display(), "config file absent, skipping");
                continue;
            }
            let overlay = Self::read_config_file(path)?;
            merge_toml_values(&mut merged, overlay);
            debug!(path = %path.display(), "config file merged");
        }

        apply_environment_overrides(&mut merged);

        Self::into_config(merged)
    }

    /// Parse and fully validate a single configuration file without
    /// loading it.
    pub fn validate_config_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let value = Self::read_config_file(path.as_ref())?;
        Self::into_config(value)?;
        Ok(())
    }

    /// Write a configuration out as pretty-printed TOML.
    pub fn export_config<P: AsRef<Path>>(
        &self,
        config: &ProbeConfig,
        path: P,
    ) -> Result<(), ConfigError> {
        let toml_content =
            toml::to_string_pretty(config).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    fn into_config(merged: toml::Value) -> Result<ProbeConfig, ConfigError> {
        let raw: RawProbeConfig = merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Parse(e.to_string()))?;
        let trigger = TriggerConfig::try_from(raw.trigger)?;
        Ok(ProbeConfig { trigger })
    }

    fn read_config_file(path: &Path) -> Result<toml::Value, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn discover_config_paths() -> Vec<PathBuf> {
        let mut config_paths = Vec::new();

        config_paths.push(PathBuf::from(paths::SYSTEM_CONFIG_PATH));

        if let Some(home_dir) = dirs::home_dir() {
            config_paths.push(
                home_dir
                    .join(paths::USER_CONFIG_DIR)
                    .join(paths::LOCAL_CONFIG_FILE),
            );
        }

        // Local configurations, in order of precedence
        config_paths.push(PathBuf::from(paths::DEFAULT_CONFIG_FILE));
        config_paths.push(PathBuf::from(paths::LOCAL_CONFIG_FILE));

        config_paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_toml_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml_values(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value;
        }
    }
}

/// Apply `PROBE_`-prefixed environment variables on top of the merged value.
///
/// The first `_` after the prefix separates the section from the field name,
/// which may itself contain underscores:
/// `PROBE_TRIGGER_INTENSITY_IN_MAX` targets `trigger.intensity_in_max`.
fn apply_environment_overrides(config: &mut toml::Value) {
    for (key, value) in env::vars() {
        let Some(rest) = key.strip_prefix(env_consts::ENV_PREFIX) else {
            continue;
        };
        let Some((section, field)) = rest.split_once('_') else {
            continue;
        };
        if section.is_empty() || field.is_empty() {
            continue;
        }

        debug!(%key, "applying environment override");
        set_section_value(
            config,
            &section.to_lowercase(),
            &field.to_lowercase(),
            parse_env_value(&value),
        );
    }
}

fn parse_env_value(value: &str) -> toml::Value {
    if let Ok(int_val) = value.parse::<i64>() {
        toml::Value::Integer(int_val)
    } else if let Ok(float_val) = value.parse::<f64>() {
        toml::Value::Float(float_val)
    } else if let Ok(bool_val) = value.parse::<bool>() {
        toml::Value::Boolean(bool_val)
    } else {
        toml::Value::String(value.to_string())
    }
}

fn set_section_value(config: &mut toml::Value, section: &str, field: &str, value: toml::Value) {
    if let toml::Value::Table(root) = config {
        let entry = root
            .entry(section.to_string())
            .or_insert_with(|| toml::Value::Table(toml::value::Table::new()));
        if let toml::Value::Table(table) = entry {
            table.insert(field.to_string(), value);
        }
    }
}

// Cross-platform home directory discovery
mod dirs {
    use std::path::PathBuf;

    pub fn home_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var_os("USERPROFILE").map(PathBuf::from)
        }
        #[cfg(not(target_os = "windows"))]
        {
            std::env::var_os("HOME").map(PathBuf::from)
        }
    }
}

// src/config/mod.rs
//! Configuration management for the probe driver

pub mod constants;
pub mod loader;
pub mod trigger;

pub use loader::{ConfigError, ConfigLoader};
pub use trigger::{RawTriggerConfig, TriggerConfig, TriggerConfigError};

use serde::{Deserialize, Serialize};

/// Complete probe driver configuration.
///
/// One section per driver subsystem; currently only the trigger input
/// stage. Serialized as a sectioned TOML document (`[trigger]` table).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Trigger detection limits for the input stage.
    #[serde(default)]
    pub trigger: TriggerConfig,
}

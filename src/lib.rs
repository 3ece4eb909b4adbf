//! Probe-Core: trigger-detection configuration for hardware probe drivers
//!
//! This library holds the validated trigger-detection limits a probe driver
//! pipeline consumes: a threshold level, a qualifying pulse-width window in
//! clock cycles, and an accepted intensity window bounded to the unsigned
//! 16-bit range. It features:
//!
//! - A validated, immutable [`TriggerConfig`] value type: every range and
//!   ordering constraint is enforced at construction, so downstream code
//!   never re-checks
//! - Layered TOML configuration loading with environment overrides
//! - Descriptive validation errors naming the offending field and constraint
//!
//! # Quick Start
//!
//! ```rust
//! use probe_core::TriggerConfig;
//!
//! fn main() -> Result<(), probe_core::TriggerConfigError> {
//!     let trigger = TriggerConfig::new(1.5, 2, 8, 0, 4095)?;
//!
//!     assert_eq!(trigger.trigger_in_duration_min(), 2);
//!     assert_eq!(trigger.intensity_in_max(), 4095);
//!     Ok(())
//! }
//! ```
//!
//! Loading from a configuration file instead:
//!
//! ```rust,no_run
//! use probe_core::ConfigLoader;
//!
//! fn main() -> Result<(), probe_core::ConfigError> {
//!     let config = ConfigLoader::new().load()?;
//!     println!("threshold: {}", config.trigger.trigger_in_threshold());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;

// Re-export commonly used types for convenience
pub use config::{
    ConfigError, ConfigLoader, ProbeConfig, RawTriggerConfig, TriggerConfig, TriggerConfigError,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

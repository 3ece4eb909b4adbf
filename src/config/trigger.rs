// src/config/trigger.rs
//! Trigger detection limits for the probe input stage
//!
//! [`TriggerConfig`] is the validated record the rest of the driver consumes:
//! a threshold level, a qualifying pulse-width window in clock cycles, and an
//! accepted intensity window. All range and ordering constraints are enforced
//! when the value is constructed, so a `TriggerConfig` held anywhere in the
//! system is known to be internally consistent.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::constants::trigger::*;

/// Validation errors raised while constructing trigger limits
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriggerConfigError {
    /// A scalar value lies outside its permitted domain.
    #[error("field '{field}' value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The raw value that was supplied.
        value: i64,
        /// Smallest permitted value.
        min: i64,
        /// Largest permitted value.
        max: i64,
    },

    /// A min/max pair is internally inconsistent.
    #[error("field '{min_field}' value {min} exceeds field '{max_field}' value {max}")]
    InvalidRange {
        /// Name of the lower-bound field.
        min_field: &'static str,
        /// Name of the upper-bound field.
        max_field: &'static str,
        /// Supplied lower bound.
        min: i64,
        /// Supplied upper bound.
        max: i64,
    },
}

/// Validated trigger detection limits.
///
/// Construct via [`TriggerConfig::new`] or by deserializing a `[trigger]`
/// table; both paths run the same checks. The value is immutable once
/// built; to change a field, construct a new instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTriggerConfig")]
pub struct TriggerConfig {
    trigger_in_threshold: f64,
    trigger_in_duration_min: u32,
    trigger_in_duration_max: u32,
    intensity_in_min: u16,
    intensity_in_max: u16,
}

/// Unvalidated trigger limits as they appear in configuration sources.
///
/// Fields are wide raw types (`i64`, the native TOML integer) so that
/// out-of-domain values can be represented and rejected with a descriptive
/// error instead of failing opaquely during integer narrowing. Missing
/// fields fall back to the crate defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawTriggerConfig {
    /// Signal level at which a trigger event is recognized.
    #[serde(default = "defaults::threshold")]
    pub trigger_in_threshold: f64,

    /// Minimum qualifying pulse width, in clock cycles.
    #[serde(default = "defaults::duration_min")]
    pub trigger_in_duration_min: i64,

    /// Maximum qualifying pulse width, in clock cycles.
    #[serde(default = "defaults::duration_max")]
    pub trigger_in_duration_max: i64,

    /// Lower bound of accepted intensity.
    #[serde(default = "defaults::intensity_min")]
    pub intensity_in_min: i64,

    /// Upper bound of accepted intensity.
    #[serde(default = "defaults::intensity_max")]
    pub intensity_in_max: i64,
}

/// Default value providers using constants
mod defaults {
    use crate::config::constants::trigger::*;

    pub fn threshold() -> f64 { DEFAULT_THRESHOLD }
    pub fn duration_min() -> i64 { DEFAULT_DURATION_MIN_CYCLES as i64 }
    pub fn duration_max() -> i64 { DEFAULT_DURATION_MAX_CYCLES as i64 }
    pub fn intensity_min() -> i64 { DEFAULT_INTENSITY_MIN as i64 }
    pub fn intensity_max() -> i64 { DEFAULT_INTENSITY_MAX as i64 }
}

impl TriggerConfig {
    /// Validate five raw scalars and build trigger limits from them.
    ///
    /// Checks run in order: intensity domains, duration domains, then the
    /// two min/max orderings. The first violated constraint is reported.
    pub fn new(
        threshold: f64,
        duration_min: i64,
        duration_max: i64,
        intensity_min: i64,
        intensity_max: i64,
    ) -> Result<Self, TriggerConfigError> {
        check_range(
            "intensity_in_min",
            intensity_min,
            INTENSITY_DOMAIN_MIN,
            INTENSITY_DOMAIN_MAX,
        )?;
        check_range(
            "intensity_in_max",
            intensity_max,
            INTENSITY_DOMAIN_MIN,
            INTENSITY_DOMAIN_MAX,
        )?;
        check_range(
            "trigger_in_duration_min",
            duration_min,
            DURATION_DOMAIN_MIN,
            DURATION_DOMAIN_MAX,
        )?;
        check_range(
            "trigger_in_duration_max",
            duration_max,
            DURATION_DOMAIN_MIN,
            DURATION_DOMAIN_MAX,
        )?;

        if duration_min > duration_max {
            return Err(TriggerConfigError::InvalidRange {
                min_field: "trigger_in_duration_min",
                max_field: "trigger_in_duration_max",
                min: duration_min,
                max: duration_max,
            });
        }

        if intensity_min > intensity_max {
            return Err(TriggerConfigError::InvalidRange {
                min_field: "intensity_in_min",
                max_field: "intensity_in_max",
                min: intensity_min,
                max: intensity_max,
            });
        }

        Ok(Self {
            trigger_in_threshold: threshold,
            trigger_in_duration_min: duration_min as u32,
            trigger_in_duration_max: duration_max as u32,
            intensity_in_min: intensity_min as u16,
            intensity_in_max: intensity_max as u16,
        })
    }

    /// Signal level at which a trigger event is recognized, in
    /// driver-defined units.
    pub fn trigger_in_threshold(&self) -> f64 {
        self.trigger_in_threshold
    }

    /// Minimum qualifying pulse width, in clock cycles.
    pub fn trigger_in_duration_min(&self) -> u32 {
        self.trigger_in_duration_min
    }

    /// Maximum qualifying pulse width, in clock cycles.
    pub fn trigger_in_duration_max(&self) -> u32 {
        self.trigger_in_duration_max
    }

    /// Lower bound of accepted intensity.
    pub fn intensity_in_min(&self) -> u16 {
        self.intensity_in_min
    }

    /// Upper bound of accepted intensity.
    pub fn intensity_in_max(&self) -> u16 {
        self.intensity_in_max
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        // Typed defaults already satisfy the ordering invariants.
        Self {
            trigger_in_threshold: DEFAULT_THRESHOLD,
            trigger_in_duration_min: DEFAULT_DURATION_MIN_CYCLES,
            trigger_in_duration_max: DEFAULT_DURATION_MAX_CYCLES,
            intensity_in_min: DEFAULT_INTENSITY_MIN,
            intensity_in_max: DEFAULT_INTENSITY_MAX,
        }
    }
}

impl Default for RawTriggerConfig {
    fn default() -> Self {
        Self {
            trigger_in_threshold: defaults::threshold(),
            trigger_in_duration_min: defaults::duration_min(),
            trigger_in_duration_max: defaults::duration_max(),
            intensity_in_min: defaults::intensity_min(),
            intensity_in_max: defaults::intensity_max(),
        }
    }
}

impl TryFrom<RawTriggerConfig> for TriggerConfig {
    type Error = TriggerConfigError;

    fn try_from(raw: RawTriggerConfig) -> Result<Self, Self::Error> {
        Self::new(
            raw.trigger_in_threshold,
            raw.trigger_in_duration_min,
            raw.trigger_in_duration_max,
            raw.intensity_in_min,
            raw.intensity_in_max,
        )
    }
}

fn check_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<(), TriggerConfigError> {
    if value < min || value > max {
        return Err(TriggerConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_construction_round_trip() {
        let config = TriggerConfig::new(1.5, 2, 8, 0, 4095).unwrap();

        assert_eq!(config.trigger_in_threshold(), 1.5);
        assert_eq!(config.trigger_in_duration_min(), 2);
        assert_eq!(config.trigger_in_duration_max(), 8);
        assert_eq!(config.intensity_in_min(), 0);
        assert_eq!(config.intensity_in_max(), 4095);
    }

    #[test]
    fn test_default_limits_are_consistent() {
        let config = TriggerConfig::default();

        assert!(config.trigger_in_duration_min() <= config.trigger_in_duration_max());
        assert!(config.intensity_in_min() <= config.intensity_in_max());
        assert_eq!(config.intensity_in_max(), DEFAULT_INTENSITY_MAX);
    }

    #[test]
    fn test_intensity_above_u16_rejected() {
        let err = TriggerConfig::new(1.0, 2, 8, 70_000, 70_001).unwrap_err();

        match err {
            TriggerConfigError::OutOfRange { field, value, min, max } => {
                assert_eq!(field, "intensity_in_min");
                assert_eq!(value, 70_000);
                assert_eq!(min, 0);
                assert_eq!(max, 65_535);
            }
            other => panic!("expected OutOfRange, got: {:?}", other),
        }
    }

    #[test]
    fn test_negative_duration_rejected() {
        let err = TriggerConfig::new(1.0, -1, 8, 0, 100).unwrap_err();

        assert!(matches!(
            err,
            TriggerConfigError::OutOfRange {
                field: "trigger_in_duration_min",
                value: -1,
                ..
            }
        ));
    }

    #[test]
    fn test_duration_min_exceeding_max_rejected() {
        let err = TriggerConfig::new(1.0, 10, 5, 0, 100).unwrap_err();

        match err {
            TriggerConfigError::InvalidRange { min_field, max_field, min, max } => {
                assert_eq!(min_field, "trigger_in_duration_min");
                assert_eq!(max_field, "trigger_in_duration_max");
                assert_eq!(min, 10);
                assert_eq!(max, 5);
            }
            other => panic!("expected InvalidRange, got: {:?}", other),
        }
    }

    #[test]
    fn test_intensity_min_exceeding_max_rejected() {
        let err = TriggerConfig::new(1.0, 2, 8, 100, 50).unwrap_err();

        assert!(matches!(
            err,
            TriggerConfigError::InvalidRange {
                min_field: "intensity_in_min",
                max_field: "intensity_in_max",
                ..
            }
        ));
    }

    #[test]
    fn test_equal_bounds_accepted() {
        // Degenerate single-point windows are valid.
        let config = TriggerConfig::new(0.0, 4, 4, 128, 128).unwrap();

        assert_eq!(config.trigger_in_duration_min(), config.trigger_in_duration_max());
        assert_eq!(config.intensity_in_min(), config.intensity_in_max());
    }

    #[test]
    fn test_domain_checks_run_before_ordering_checks() {
        // Both an out-of-domain intensity and an inverted duration window:
        // the scalar domain failure is reported first.
        let err = TriggerConfig::new(1.0, 10, 5, 70_000, 50).unwrap_err();

        assert!(matches!(err, TriggerConfigError::OutOfRange { .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = TriggerConfig::new(1.5, 2, 8, 0, 4095).unwrap();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: TriggerConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_deserialization_enforces_validation() {
        let result: Result<TriggerConfig, _> = toml::from_str(
            r#"
            trigger_in_threshold = 1.5
            trigger_in_duration_min = 2
            trigger_in_duration_max = 8
            intensity_in_min = 70000
            intensity_in_max = 70001
            "#,
        );

        let err = result.unwrap_err().to_string();
        assert!(err.contains("intensity_in_min"));
        assert!(err.contains("out of range"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: TriggerConfig = toml::from_str("trigger_in_threshold = 2.25").unwrap();

        assert_eq!(config.trigger_in_threshold(), 2.25);
        assert_eq!(config.trigger_in_duration_min(), DEFAULT_DURATION_MIN_CYCLES);
        assert_eq!(config.intensity_in_max(), DEFAULT_INTENSITY_MAX);
    }

    #[test]
    fn test_error_display() {
        let err = TriggerConfig::new(1.0, 2, 8, 100, 50).unwrap_err();
        let display = format!("{}", err);

        assert!(display.contains("intensity_in_min"));
        assert!(display.contains("intensity_in_max"));
        assert!(display.contains("100"));
        assert!(display.contains("50"));
    }
}

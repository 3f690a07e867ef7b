//! Prop Configuration
//!
//! Every knob a level designer can override per prop instance. `Default`
//! carries the stock values; JSON files may set any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A distance, threshold, or duration that must be zero or more.
    #[error("{field} must be >= 0 (got {value})")]
    Negative { field: &'static str, value: f32 },

    /// A value that must be strictly positive.
    #[error("{field} must be > 0 (got {value})")]
    NonPositive { field: &'static str, value: f32 },
}

/// Tuning for a single physics prop.
///
/// # Example
///
/// ```ignore
/// use physics_prop_engine::config::PropConfig;
///
/// // Never cull, switch CCD on above 1200 units/s
/// let config = PropConfig {
///     cull_distance: 0.0,
///     ccd_speed_threshold: 1200.0,
///     ..PropConfig::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropConfig {
    /// Distance from the viewpoint beyond which the prop is put to rest
    /// and ticked coarsely. `0.0` disables distance optimization.
    pub cull_distance: f32,

    /// Seconds between distance checks (before jitter).
    pub distance_check_interval: f32,

    /// Speed above which continuous collision detection is enabled.
    /// `0.0` disables the CCD gate.
    pub ccd_speed_threshold: f32,

    /// Minimum mass-normalized impact intensity that plays a sound.
    pub min_impact_threshold: f32,

    /// Minimum seconds between two accepted impact sounds.
    pub impact_cooldown: f32,

    /// Fixed seed for jitter and pitch variation. `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for PropConfig {
    fn default() -> Self {
        Self {
            cull_distance: 3000.0,          // 30m
            distance_check_interval: 1.0,   // 1 check/sec
            ccd_speed_threshold: 500.0,     // 5 m/s
            min_impact_threshold: 10_000.0,
            impact_cooldown: 0.1,
            rng_seed: None,
        }
    }
}

impl PropConfig {
    /// Creates a PropConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a config from JSON. Missing fields keep their
    /// defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("cull_distance", self.cull_distance)?;
        positive("distance_check_interval", self.distance_check_interval)?;
        non_negative("ccd_speed_threshold", self.ccd_speed_threshold)?;
        positive("min_impact_threshold", self.min_impact_threshold)?;
        non_negative("impact_cooldown", self.impact_cooldown)?;
        Ok(())
    }

    /// Whether the distance scheduler runs at all.
    pub fn distance_optimization_enabled(&self) -> bool {
        self.cull_distance > 0.0
    }

    /// Whether the CCD gate runs at all.
    pub fn ccd_gate_enabled(&self) -> bool {
        self.ccd_speed_threshold > 0.0
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    // Negated comparison so NaN is rejected too
    if !(value >= 0.0) {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(value > 0.0) {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = PropConfig::default();
        assert_eq!(config.cull_distance, 3000.0);
        assert_eq!(config.distance_check_interval, 1.0);
        assert_eq!(config.ccd_speed_threshold, 500.0);
        assert_eq!(config.impact_cooldown, 0.1);
        assert!(config.rng_seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_disables_features() {
        let config = PropConfig {
            cull_distance: 0.0,
            ccd_speed_threshold: 0.0,
            ..PropConfig::default()
        };
        assert!(config.validate().is_ok());
        assert!(!config.distance_optimization_enabled());
        assert!(!config.ccd_gate_enabled());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PropConfig::from_json_str(r#"{ "cull_distance": 1500.0, "rng_seed": 7 }"#)
            .expect("valid config");
        assert_eq!(config.cull_distance, 1500.0);
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.ccd_speed_threshold, 500.0);
    }

    #[test]
    fn test_json_round_trip() {
        let config = PropConfig {
            impact_cooldown: 0.25,
            ..PropConfig::default()
        };
        let json = config.to_json_string().expect("serialize");
        assert_eq!(PropConfig::from_json_str(&json).expect("parse"), config);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = PropConfig::from_json_str(r#"{ "cull_distance": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Negative { field: "cull_distance", .. }));

        let err = PropConfig::from_json_str(r#"{ "distance_check_interval": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { field: "distance_check_interval", .. }));

        let err = PropConfig::from_json_str(r#"{ "min_impact_threshold": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { field: "min_impact_threshold", .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PropConfig::from_json_file("/nonexistent/prop_config.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = PropConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_rejects_nan() {
        let config = PropConfig {
            impact_cooldown: f32::NAN,
            ..PropConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

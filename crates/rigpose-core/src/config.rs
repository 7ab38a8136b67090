//! Engine configuration document.
//!
//! Every field is optional in JSON; missing fields take the built-in tuning.
//! Unknown fields are rejected so typos surface as errors instead of being
//! silently ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::collision::{ArmGeometry, ResolverConfig, TorsoCollider};
use crate::error::ConfigError;
use crate::limits::JointLimitTable;
use crate::secondary::SecondaryConfig;

/// Default seconds for an action transition.
pub const DEFAULT_TRANSITION_DURATION: f64 = 0.62;

/// Default rate of the live-handle damping.
pub const DEFAULT_DAMPING_RATE: f64 = 10.0;

/// Tuning for a whole [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Seconds an action transition takes to complete.
    #[serde(default = "default_transition_duration")]
    pub transition_duration: f64,
    /// Exponential damping rate applied to the live handles.
    #[serde(default = "default_damping_rate")]
    pub damping_rate: f64,
    #[serde(default)]
    pub limits: JointLimitTable,
    #[serde(default)]
    pub torso: TorsoCollider,
    #[serde(default)]
    pub arm: ArmGeometry,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub secondary: SecondaryConfig,
}

fn default_transition_duration() -> f64 {
    DEFAULT_TRANSITION_DURATION
}

fn default_damping_rate() -> f64 {
    DEFAULT_DAMPING_RATE
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            transition_duration: DEFAULT_TRANSITION_DURATION,
            damping_rate: DEFAULT_DAMPING_RATE,
            limits: JointLimitTable::default(),
            torso: TorsoCollider::default(),
            arm: ArmGeometry::default(),
            resolver: ResolverConfig::default(),
            secondary: SecondaryConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Serializes the config to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Checks every section, reporting the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("transition_duration", self.transition_duration),
            ("damping_rate", self.damping_rate),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive {
                    field: field.to_string(),
                    value,
                });
            }
        }
        self.limits.validate()?;
        self.torso.validate()?;
        self.arm.validate()?;
        self.resolver.validate()?;
        self.secondary.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_empty_document_is_default() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.transition_duration, 0.62);
        assert_eq!(config.damping_rate, 10.0);
        assert_eq!(config.resolver.max_iterations, 10);
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_json(
            r#"{
                "transition_duration": 0.65,
                "resolver": { "max_iterations": 32, "reduce_flexion": false },
                "torso": { "radii": [1.0, 1.2, 0.9] }
            }"#,
        )
        .unwrap();
        assert_eq!(config.transition_duration, 0.65);
        assert_eq!(config.resolver.max_iterations, 32);
        assert!(!config.resolver.reduce_flexion);
        assert_eq!(config.resolver.abduct_yaw_step, 0.09);
        assert_eq!(config.torso.radii, [1.0, 1.2, 0.9]);
        assert_eq!(config.torso.center, [0.0, 1.35, 0.03]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = EngineConfig::from_json(r#"{"transition_time": 1.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::JsonParse(_)));
        let err = EngineConfig::from_json(r#"{"secondary": {"wobble": 1.0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::JsonParse(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = EngineConfig::from_json(r#"{"transition_duration": 0}"#).unwrap_err();
        assert_eq!(err.to_string(), "transition_duration must be positive, got 0");

        let err = EngineConfig::from_json(r#"{"damping_rate": -3}"#).unwrap_err();
        assert!(matches!(err, ConfigError::NotPositive { .. }));

        let err = EngineConfig::from_json(
            r#"{"limits": {"shoulder_roll": {"min": 1.0, "max": 0.0}}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("limits.shoulder_roll"));

        let err = EngineConfig::from_json(r#"{"torso": {"radii": [1.0, 0.0, 1.0]}}"#).unwrap_err();
        assert!(err.to_string().contains("torso.radii[1]"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"damping_rate": 6.5}}"#).unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.damping_rate, 6.5);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_pretty_json_reparses() {
        let config = EngineConfig::default();
        let json = config.to_json_pretty().unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), config);
    }
}

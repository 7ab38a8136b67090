//! Error types for configuration loading and action parsing.
//!
//! Nothing on the per-frame path returns these: out-of-range values are
//! clamped and unknown actions fall back to idle. Errors only surface at the
//! edges where configuration documents and action names enter the engine.

use thiserror::Error;

/// Errors raised while loading or validating an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O error while reading a config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A numeric value is NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: String, value: f64 },

    /// A value that must be strictly positive is not.
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: String, value: f64 },

    /// An interval has its bounds the wrong way round.
    #[error("invalid interval for {field}: min ({min}) > max ({max})")]
    InvalidInterval { field: String, min: f64, max: f64 },

    /// Any other out-of-range value.
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error returned by the strict action parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action '{name}' (expected one of: {expected})")]
pub struct ActionParseError {
    /// The name that failed to parse.
    pub name: String,
    /// Comma-separated list of known action names.
    pub expected: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidInterval {
            field: "limits.shoulder_pitch".to_string(),
            min: 1.0,
            max: -1.0,
        };
        assert_eq!(
            err.to_string(),
            "invalid interval for limits.shoulder_pitch: min (1) > max (-1)"
        );

        let err = ConfigError::NotPositive {
            field: "transition_duration".to_string(),
            value: 0.0,
        };
        assert_eq!(err.to_string(), "transition_duration must be positive, got 0");
    }

    #[test]
    fn test_config_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ConfigError = json_err.into();
        assert!(matches!(err, ConfigError::JsonParse(_)));
        assert!(err.to_string().starts_with("JSON parse error"));
    }
}

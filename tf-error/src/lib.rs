//! Unified error handling for Thermofan
//!
//! This crate provides the single error type shared by the core library and the daemon.
//! It uses thiserror for Display and Error trait impls.

use std::io;
use std::path::PathBuf;

/// Result type alias using ThermofanError
pub type Result<T> = std::result::Result<T, ThermofanError>;

/// Unified error type for all Thermofan operations
#[derive(thiserror::Error, Debug)]
pub enum ThermofanError {
    // ============================================================================
    // I/O and File System Errors
    // ============================================================================
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    // ============================================================================
    // Configuration Errors (fatal, startup only)
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig {
        field: String,
        reason: String,
    },

    // ============================================================================
    // Sensor Errors
    // ============================================================================
    #[error("Could not parse temperature output: {output:?}")]
    SensorParse {
        output: String,
    },

    #[error("Failed to read temperature from {source_name}: {reason}")]
    SensorRead {
        source_name: String,
        reason: String,
    },

    // ============================================================================
    // Actuator Errors
    // ============================================================================
    #[error("Failed to read GPIO state from {path}: {reason}")]
    GpioRead {
        path: PathBuf,
        reason: String,
    },

    #[error("Failed to write GPIO {path}: {reason}")]
    GpioWrite {
        path: PathBuf,
        reason: String,
    },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Generic(String),
}

impl ThermofanError {
    /// Create a generic error from a string
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic(msg.into())
    }

    /// Create an invalid config error for a named field
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a sensor parse error carrying the raw sensor output
    pub fn sensor_parse(output: impl Into<String>) -> Self {
        Self::SensorParse {
            output: output.into(),
        }
    }

    /// Create a sensor read error
    pub fn sensor_read(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SensorRead {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// True for configuration failures, which are only raised before the loop starts.
    /// `FileRead` is only produced while loading the config file.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. }
                | Self::JsonParse(_)
                | Self::FileRead { .. }
        )
    }

    /// True for failures to obtain a temperature reading
    pub fn is_sensor(&self) -> bool {
        matches!(self, Self::SensorParse { .. } | Self::SensorRead { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_parse_message_includes_output() {
        let err = ThermofanError::sensor_parse("garbage");
        assert_eq!(err.to_string(), "Could not parse temperature output: \"garbage\"");
        assert!(err.is_sensor());
        assert!(!err.is_config());
    }

    #[test]
    fn test_invalid_config_classification() {
        let err = ThermofanError::invalid_config("off_threshold", "must be below on_threshold");
        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "Invalid configuration value for off_threshold: must be below on_threshold"
        );
    }

    #[test]
    fn test_json_parse_error_is_config() {
        let err: ThermofanError = serde_json::from_str::<u32>("{").unwrap_err().into();
        assert!(matches!(err, ThermofanError::JsonParse(_)));
        assert!(err.is_config());
    }

    #[test]
    fn test_gpio_errors_are_neither_config_nor_sensor() {
        let err = ThermofanError::GpioWrite {
            path: PathBuf::from("/sys/class/gpio/gpio23/value"),
            reason: "permission denied".into(),
        };
        assert!(!err.is_config());
        assert!(!err.is_sensor());
    }
}

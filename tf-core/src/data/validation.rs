//! Startup validation for the daemon configuration
//!
//! Everything here runs once before the control loop starts. A failure is a
//! configuration error and the daemon refuses to start.

use crate::constants::timing::MAX_POLL_INTERVAL_SECS;
use crate::data::config::{DaemonConfig, SensorSource, ThresholdConfig};
use crate::error::{Result, ThermofanError};
use std::time::Duration;

/// Validates the hysteresis thresholds
///
/// Both thresholds must be finite, `off_threshold` must be strictly below
/// `on_threshold`, and the poll interval must be non-zero and at most
/// [`MAX_POLL_INTERVAL_SECS`].
pub fn validate_thresholds(config: &ThresholdConfig) -> Result<()> {
    if !config.on_threshold.is_finite() {
        return Err(ThermofanError::invalid_config(
            "on_threshold",
            format!("{} is not a finite temperature", config.on_threshold),
        ));
    }
    if !config.off_threshold.is_finite() {
        return Err(ThermofanError::invalid_config(
            "off_threshold",
            format!("{} is not a finite temperature", config.off_threshold),
        ));
    }
    if config.off_threshold >= config.on_threshold {
        return Err(ThermofanError::invalid_config(
            "off_threshold",
            format!(
                "off_threshold ({}°C) must be less than on_threshold ({}°C)",
                config.off_threshold, config.on_threshold
            ),
        ));
    }
    if config.poll_interval.is_zero() {
        return Err(ThermofanError::invalid_config(
            "poll_interval_secs",
            "must be greater than zero",
        ));
    }
    if config.poll_interval > Duration::from_secs(MAX_POLL_INTERVAL_SECS) {
        return Err(ThermofanError::invalid_config(
            "poll_interval_secs",
            format!("must be at most {}", MAX_POLL_INTERVAL_SECS),
        ));
    }
    Ok(())
}

/// Validates a full daemon configuration
pub fn validate_config(config: &DaemonConfig) -> Result<()> {
    validate_thresholds(&config.thresholds())?;

    if config.log_path.as_os_str().is_empty() {
        return Err(ThermofanError::invalid_config("log_path", "must not be empty"));
    }

    match &config.sensor {
        SensorSource::Command { program, .. } if program.trim().is_empty() => {
            return Err(ThermofanError::invalid_config(
                "sensor.program",
                "must not be empty",
            ));
        }
        SensorSource::ThermalZone { path } if path.as_os_str().is_empty() => {
            return Err(ThermofanError::invalid_config("sensor.path", "must not be empty"));
        }
        _ => {}
    }

    Ok(())
}

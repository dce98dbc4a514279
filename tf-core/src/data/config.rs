//! Configuration management
//!
//! The daemon reads a single JSON file once at startup. Every field has a default,
//! so a missing file yields the stock Raspberry Pi setup (fan on GPIO 23, 65/55°C).

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::constants::{gpio, paths, sensor, thresholds, timing};
use crate::data::validation::validate_config;
use crate::error::{Result, ThermofanError};

/// Hysteresis thresholds and poll cadence, immutable once the controller is built
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdConfig {
    /// Fan turns on when the temperature rises strictly above this value (°C)
    pub on_threshold: f64,
    /// Fan turns off when the temperature falls strictly below this value (°C)
    pub off_threshold: f64,
    pub poll_interval: Duration,
}

impl ThresholdConfig {
    pub fn new(on_threshold: f64, off_threshold: f64, poll_interval: Duration) -> Self {
        Self {
            on_threshold,
            off_threshold,
            poll_interval,
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self::new(
            thresholds::ON_CELSIUS,
            thresholds::OFF_CELSIUS,
            Duration::from_secs(timing::POLL_INTERVAL_SECS),
        )
    }
}

/// Where temperature readings come from
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SensorSource {
    /// Run a command whose stdout looks like `temp=45.2'C`
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Read a thermal zone file reporting millidegrees Celsius
    ThermalZone { path: PathBuf },
}

impl Default for SensorSource {
    fn default() -> Self {
        SensorSource::Command {
            program: sensor::COMMAND.to_string(),
            args: sensor::COMMAND_ARGS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// What the loop does when a reading cannot be obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorErrorPolicy {
    /// Propagate the error and stop the daemon
    #[default]
    Stop,
    /// Log the error, skip the cycle, keep polling
    Skip,
}

/// What happens to the fan when the daemon is asked to terminate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseAction {
    #[default]
    TurnOff,
    /// Leave the output at its last level
    Leave,
}

/// Daemon configuration as stored on disk
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DaemonConfig {
    #[serde(default = "default_on_threshold")]
    pub on_threshold: f64,

    #[serde(default = "default_off_threshold")]
    pub off_threshold: f64,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_gpio_pin")]
    pub gpio_pin: u32,

    #[serde(default = "default_gpio_base")]
    pub gpio_base: PathBuf,

    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    #[serde(default)]
    pub sensor: SensorSource,

    #[serde(default)]
    pub on_sensor_error: SensorErrorPolicy,

    #[serde(default)]
    pub release_on_exit: ReleaseAction,
}

fn default_on_threshold() -> f64 {
    thresholds::ON_CELSIUS
}

fn default_off_threshold() -> f64 {
    thresholds::OFF_CELSIUS
}

fn default_poll_interval_secs() -> u64 {
    timing::POLL_INTERVAL_SECS
}

fn default_gpio_pin() -> u32 {
    gpio::DEFAULT_PIN
}

fn default_gpio_base() -> PathBuf {
    PathBuf::from(paths::GPIO_BASE)
}

fn default_log_path() -> PathBuf {
    PathBuf::from(paths::LOG_FILE)
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            on_threshold: default_on_threshold(),
            off_threshold: default_off_threshold(),
            poll_interval_secs: default_poll_interval_secs(),
            gpio_pin: default_gpio_pin(),
            gpio_base: default_gpio_base(),
            log_path: default_log_path(),
            sensor: SensorSource::default(),
            on_sensor_error: SensorErrorPolicy::default(),
            release_on_exit: ReleaseAction::default(),
        }
    }
}

impl DaemonConfig {
    /// Threshold triple handed to the hysteresis engine
    pub fn thresholds(&self) -> ThresholdConfig {
        ThresholdConfig::new(
            self.on_threshold,
            self.off_threshold,
            Duration::from_secs(self.poll_interval_secs),
        )
    }
}

/// Config file location: `$THERMOFAN_CONFIG` if set, otherwise `/etc/thermofan/config.json`
pub fn resolve_config_path() -> PathBuf {
    match std::env::var_os(paths::CONFIG_ENV) {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => PathBuf::from(paths::CONFIG_FILE),
    }
}

/// Load and validate the configuration from the resolved path
pub fn load_config() -> Result<DaemonConfig> {
    load_config_from(&resolve_config_path())
}

/// Load and validate the configuration from `path`
///
/// A missing file yields [`DaemonConfig::default`]. Read failures, malformed JSON,
/// unknown fields and invalid values are all configuration errors.
pub fn load_config_from(path: &Path) -> Result<DaemonConfig> {
    if !path.exists() {
        debug!("No config file at {:?}, using defaults", path);
        let config = DaemonConfig::default();
        validate_config(&config)?;
        return Ok(config);
    }

    let content = fs::read_to_string(path).map_err(|e| ThermofanError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: DaemonConfig = serde_json::from_str(&content)?;

    validate_config(&config)?;
    info!("Loaded config from {:?}", path);
    Ok(config)
}

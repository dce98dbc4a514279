//! Thermofan Core Library
//!
//! Hysteresis fan control for boards with a single core temperature sensor and
//! an on/off cooling fan.
//!
//! # Module Structure
//!
//! - `data/` - Fan state, thresholds, daemon configuration and validation
//! - `engine/` - The hysteresis decision engine
//! - `hw/` - Sensor and actuator abstractions with their Linux implementations
//!
//! # Example
//!
//! ```
//! use tf_core::{FanAction, FanState, HysteresisController, ThresholdConfig};
//!
//! let controller = HysteresisController::new(ThresholdConfig::default()).unwrap();
//! let (state, action) = controller.poll_once(70.0, FanState::Off);
//! assert_eq!(state, FanState::On);
//! assert_eq!(action, FanAction::TurnOn);
//! ```

// Grouped modules
pub mod data;
pub mod engine;
pub mod hw;

// Standalone modules
pub mod constants;
pub mod error;

pub use data::{
    load_config, load_config_from, resolve_config_path, validate_config, validate_thresholds,
    DaemonConfig, FanAction, FanState, ReleaseAction, SensorErrorPolicy, SensorSource,
    ThresholdConfig,
};

pub use error::{Result, ThermofanError};

pub use engine::HysteresisController;

pub use hw::{
    open_sensor, parse_temperature_output, Actuator, CommandSensor, SysfsGpioFan,
    TemperatureSensor, ThermalZoneSensor,
};

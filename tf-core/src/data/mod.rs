//! Data types, configuration, and validation modules

mod config;
mod types;
mod validation;

pub use config::{
    load_config, load_config_from, resolve_config_path, DaemonConfig, ReleaseAction,
    SensorErrorPolicy, SensorSource, ThresholdConfig,
};
pub use types::{FanAction, FanState};
pub use validation::{validate_config, validate_thresholds};

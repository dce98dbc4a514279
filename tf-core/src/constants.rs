//! Constants and configuration defaults for Thermofan
//!
//! Centralizes the magic numbers and paths used across the crates.
//! Add new values here instead of inlining them at the call site.

use std::time::Duration;

/// System paths
pub mod paths {
    /// Configuration file read at startup
    pub const CONFIG_FILE: &str = "/etc/thermofan/config.json";

    /// Environment variable overriding [`CONFIG_FILE`]
    pub const CONFIG_ENV: &str = "THERMOFAN_CONFIG";

    /// Persistent log sink
    pub const LOG_FILE: &str = "/var/log/thermofan.log";

    /// Used when [`LOG_FILE`] cannot be opened
    pub const FALLBACK_LOG_FILE: &str = "/tmp/thermofan.log";

    /// Sysfs GPIO class directory
    pub const GPIO_BASE: &str = "/sys/class/gpio";

    /// Default thermal zone for the SoC temperature
    pub const THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";
}

/// Threshold defaults (degrees Celsius)
pub mod thresholds {
    /// Fan turns on above this temperature
    pub const ON_CELSIUS: f64 = 65.0;

    /// Fan turns off below this temperature
    pub const OFF_CELSIUS: f64 = 55.0;
}

/// Loop timing
pub mod timing {
    use super::Duration;

    /// Seconds between poll cycles
    pub const POLL_INTERVAL_SECS: u64 = 5;

    /// Longest accepted poll interval, one day
    pub const MAX_POLL_INTERVAL_SECS: u64 = 86_400;

    /// Granularity of the interruptible sleep between cycles
    pub const SLEEP_SLICE: Duration = Duration::from_millis(50);
}

/// Temperature sensor defaults
pub mod sensor {
    /// Firmware command reporting the core temperature
    pub const COMMAND: &str = "vcgencmd";

    /// Arguments for [`COMMAND`]
    pub const COMMAND_ARGS: &[&str] = &["measure_temp"];

    /// Thermal zone files report millidegrees
    pub const MILLIDEGREE_DIVISOR: f64 = 1000.0;
}

/// GPIO actuator defaults
pub mod gpio {
    /// BCM pin driving the fan transistor
    pub const DEFAULT_PIN: u32 = 23;

    pub const DIRECTION_OUT: &str = "out";
    pub const VALUE_HIGH: &str = "1";
    pub const VALUE_LOW: &str = "0";
}

/// Error reporting
pub mod errors {
    /// Consecutive skipped reads are logged on the first and every Nth failure
    pub const LOG_EVERY_N_FAILURES: u32 = 10;
}

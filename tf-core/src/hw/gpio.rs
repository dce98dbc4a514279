//! Sysfs GPIO fan output
//!
//! Drives a fan through a transistor on one GPIO line using the legacy
//! `/sys/class/gpio` interface:
//!
//! - `export` - write the pin number to make `gpioN/` appear
//! - `gpioN/direction` - `in` or `out`
//! - `gpioN/value` - `0` (fan off) or `1` (fan on)
//!
//! Opening the pin never changes the level of a line that is already an output,
//! so a fan left running by a previous instance is picked up as-is.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

use crate::constants::gpio;
use crate::error::{Result, ThermofanError};
use crate::hw::Actuator;

/// Polls for `gpioN/` after export; udev may need a moment to create it
const EXPORT_SETTLE_ATTEMPTS: u32 = 20;
const EXPORT_SETTLE_DELAY: Duration = Duration::from_millis(25);

/// A fan on a single sysfs GPIO line, active high
#[derive(Debug)]
pub struct SysfsGpioFan {
    pin: u32,
    value_path: PathBuf,
}

impl SysfsGpioFan {
    /// Export `pin` under `gpio_base` if needed and configure it as an output
    pub fn open(gpio_base: &Path, pin: u32) -> Result<Self> {
        let pin_dir = gpio_base.join(format!("gpio{}", pin));

        if !pin_dir.exists() {
            let export = gpio_base.join("export");
            fs::write(&export, pin.to_string()).map_err(|e| ThermofanError::GpioWrite {
                path: export.clone(),
                reason: format!("Failed to export pin {}: {}", pin, e),
            })?;
            wait_for_export(&pin_dir)?;
            debug!("Exported GPIO {}", pin);
        }

        let direction_path = pin_dir.join("direction");
        let direction = fs::read_to_string(&direction_path).map_err(|e| ThermofanError::GpioRead {
            path: direction_path.clone(),
            reason: e.to_string(),
        })?;

        if direction.trim() != gpio::DIRECTION_OUT {
            // Switching an input to "out" drives it low, i.e. fan off
            fs::write(&direction_path, gpio::DIRECTION_OUT).map_err(|e| {
                ThermofanError::GpioWrite {
                    path: direction_path.clone(),
                    reason: format!("Failed to set direction: {}", e),
                }
            })?;
            info!("Configured GPIO {} as output", pin);
        }

        Ok(Self {
            pin,
            value_path: pin_dir.join("value"),
        })
    }

    pub fn pin(&self) -> u32 {
        self.pin
    }

    fn write_value(&self, value: &str) -> Result<()> {
        fs::write(&self.value_path, value).map_err(|e| ThermofanError::GpioWrite {
            path: self.value_path.clone(),
            reason: format!("Failed to write value {}: {}", value, e),
        })
    }
}

fn wait_for_export(pin_dir: &Path) -> Result<()> {
    for _ in 0..EXPORT_SETTLE_ATTEMPTS {
        if pin_dir.join("direction").exists() {
            return Ok(());
        }
        thread::sleep(EXPORT_SETTLE_DELAY);
    }
    Err(ThermofanError::GpioRead {
        path: pin_dir.to_path_buf(),
        reason: "pin directory did not appear after export".to_string(),
    })
}

impl Actuator for SysfsGpioFan {
    fn turn_on(&mut self) -> Result<()> {
        self.write_value(gpio::VALUE_HIGH)
    }

    fn turn_off(&mut self) -> Result<()> {
        self.write_value(gpio::VALUE_LOW)
    }

    fn is_on(&self) -> Result<bool> {
        let content = fs::read_to_string(&self.value_path).map_err(|e| ThermofanError::GpioRead {
            path: self.value_path.clone(),
            reason: e.to_string(),
        })?;

        match content.trim() {
            gpio::VALUE_HIGH => Ok(true),
            gpio::VALUE_LOW => Ok(false),
            other => Err(ThermofanError::GpioRead {
                path: self.value_path.clone(),
                reason: format!("unexpected value '{}'", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FanState;
    use tempfile::TempDir;

    /// Lay out `gpioN/` the way the kernel does after export
    fn fake_pin(base: &Path, pin: u32, direction: &str, value: &str) -> PathBuf {
        let dir = base.join(format!("gpio{}", pin));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("direction"), direction).unwrap();
        fs::write(dir.join("value"), value).unwrap();
        dir
    }

    #[test]
    fn test_open_keeps_existing_output_level() {
        let base = TempDir::new().unwrap();
        let dir = fake_pin(base.path(), 23, "out\n", "1\n");

        let fan = SysfsGpioFan::open(base.path(), 23).unwrap();
        assert_eq!(fan.pin(), 23);
        assert!(fan.is_on().unwrap());
        assert_eq!(fan.state().unwrap(), FanState::On);
        assert_eq!(fs::read_to_string(dir.join("direction")).unwrap(), "out\n");
    }

    #[test]
    fn test_open_switches_input_to_output() {
        let base = TempDir::new().unwrap();
        let dir = fake_pin(base.path(), 23, "in\n", "0\n");

        SysfsGpioFan::open(base.path(), 23).unwrap();
        assert_eq!(fs::read_to_string(dir.join("direction")).unwrap(), "out");
    }

    #[test]
    fn test_turn_on_and_off_write_value() {
        let base = TempDir::new().unwrap();
        let dir = fake_pin(base.path(), 18, "out", "0");

        let mut fan = SysfsGpioFan::open(base.path(), 18).unwrap();
        assert!(!fan.is_on().unwrap());

        fan.turn_on().unwrap();
        assert_eq!(fs::read_to_string(dir.join("value")).unwrap(), "1");
        assert!(fan.is_on().unwrap());

        fan.turn_off().unwrap();
        assert_eq!(fs::read_to_string(dir.join("value")).unwrap(), "0");
        assert!(!fan.is_on().unwrap());
    }

    #[test]
    fn test_unexpected_value_is_read_error() {
        let base = TempDir::new().unwrap();
        fake_pin(base.path(), 23, "out", "2");

        let fan = SysfsGpioFan::open(base.path(), 23).unwrap();
        assert!(matches!(fan.is_on().unwrap_err(), ThermofanError::GpioRead { .. }));
    }

    #[test]
    fn test_export_written_for_missing_pin() {
        let base = TempDir::new().unwrap();
        fs::write(base.path().join("export"), "").unwrap();

        // Nothing creates gpio23/ here, so open gives up after writing export
        let err = SysfsGpioFan::open(base.path(), 23).unwrap_err();
        assert!(matches!(err, ThermofanError::GpioRead { .. }));
        assert_eq!(fs::read_to_string(base.path().join("export")).unwrap(), "23");
    }

    #[test]
    fn test_missing_gpio_class_is_write_error() {
        let base = TempDir::new().unwrap();
        let err = SysfsGpioFan::open(&base.path().join("absent"), 23).unwrap_err();
        assert!(matches!(err, ThermofanError::GpioWrite { .. }));
    }
}

//! Hardware interaction modules
//!
//! The control loop only sees the two traits defined here. Linux implementations
//! live in the submodules; tests substitute in-memory fakes.

mod gpio;
mod sensor;

pub use gpio::SysfsGpioFan;
pub use sensor::{open_sensor, parse_temperature_output, CommandSensor, ThermalZoneSensor};

use crate::data::FanState;
use crate::error::Result;

/// Source of core temperature readings in degrees Celsius
pub trait TemperatureSensor {
    fn read_temperature(&mut self) -> Result<f64>;

    /// Short human-readable description used in log messages
    fn describe(&self) -> String {
        "temperature sensor".to_string()
    }
}

/// Binary output driving the fan
pub trait Actuator {
    fn turn_on(&mut self) -> Result<()>;

    fn turn_off(&mut self) -> Result<()>;

    /// Current output level as reported by the device itself
    fn is_on(&self) -> Result<bool>;

    fn state(&self) -> Result<FanState> {
        self.is_on().map(FanState::from_level)
    }
}

impl<T: TemperatureSensor + ?Sized> TemperatureSensor for Box<T> {
    fn read_temperature(&mut self) -> Result<f64> {
        (**self).read_temperature()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<T: Actuator + ?Sized> Actuator for Box<T> {
    fn turn_on(&mut self) -> Result<()> {
        (**self).turn_on()
    }

    fn turn_off(&mut self) -> Result<()> {
        (**self).turn_off()
    }

    fn is_on(&self) -> Result<bool> {
        (**self).is_on()
    }
}

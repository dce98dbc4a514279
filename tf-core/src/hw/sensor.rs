//! Temperature sensors
//!
//! Two sources are supported:
//! - a firmware command such as `vcgencmd measure_temp`, printing `temp=45.2'C`
//! - a Linux thermal zone file reporting millidegrees Celsius

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::constants::sensor as sensor_const;
use crate::data::SensorSource;
use crate::error::{Result, ThermofanError};
use crate::hw::TemperatureSensor;

/// Extract the temperature from firmware output of the form `temp=<float>'C`
///
/// The numeric part sits between the first `=` and the following `'`. Missing
/// delimiters, an unparsable number or a non-finite value are parse errors.
pub fn parse_temperature_output(output: &str) -> Result<f64> {
    let value = output
        .split('=')
        .nth(1)
        .and_then(|rest| rest.split_once('\''))
        .map(|(number, _unit)| number.trim())
        .ok_or_else(|| ThermofanError::sensor_parse(output))?;

    let temp: f64 = value
        .parse()
        .map_err(|_| ThermofanError::sensor_parse(output))?;

    if !temp.is_finite() {
        return Err(ThermofanError::sensor_parse(output));
    }
    Ok(temp)
}

/// Runs a command each poll and parses its stdout
#[derive(Debug, Clone)]
pub struct CommandSensor {
    program: String,
    args: Vec<String>,
}

impl CommandSensor {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// The stock `vcgencmd measure_temp` sensor
    pub fn vcgencmd() -> Self {
        Self::new(
            sensor_const::COMMAND,
            sensor_const::COMMAND_ARGS.iter().map(|a| a.to_string()).collect(),
        )
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl TemperatureSensor for CommandSensor {
    fn read_temperature(&mut self) -> Result<f64> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| ThermofanError::sensor_read(self.command_line(), e.to_string()))?;

        if !output.status.success() {
            return Err(ThermofanError::sensor_read(
                self.command_line(),
                format!(
                    "exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("{} -> {:?}", self.command_line(), stdout);
        parse_temperature_output(&stdout)
    }

    fn describe(&self) -> String {
        format!("command `{}`", self.command_line())
    }
}

/// Reads `/sys/class/thermal/thermal_zoneN/temp`
#[derive(Debug, Clone)]
pub struct ThermalZoneSensor {
    path: PathBuf,
}

impl ThermalZoneSensor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TemperatureSensor for ThermalZoneSensor {
    fn read_temperature(&mut self) -> Result<f64> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            ThermofanError::sensor_read(self.path.display().to_string(), e.to_string())
        })?;

        let millidegrees: f64 = content
            .trim()
            .parse()
            .map_err(|_| ThermofanError::sensor_parse(content.clone()))?;

        let celsius = millidegrees / sensor_const::MILLIDEGREE_DIVISOR;
        if !celsius.is_finite() {
            return Err(ThermofanError::sensor_parse(content));
        }
        Ok(celsius)
    }

    fn describe(&self) -> String {
        format!("thermal zone {}", self.path.display())
    }
}

/// Build the sensor selected in the configuration
pub fn open_sensor(source: &SensorSource) -> Box<dyn TemperatureSensor> {
    match source {
        SensorSource::Command { program, args } => {
            Box::new(CommandSensor::new(program.clone(), args.clone()))
        }
        SensorSource::ThermalZone { path } => Box::new(ThermalZoneSensor::new(path.clone())),
    }
}

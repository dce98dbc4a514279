/*
 * This file is part of Thermofan.
 *
 * Copyright (C) 2025 Thermofan contributors
 *
 * Thermofan is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Thermofan is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Thermofan. If not, see <https://www.gnu.org/licenses/>.
 */

/*
 * In-memory stand-ins for the sensor, the fan and the clock, used by the unit
 * tests of the control loop.
 */

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tf_core::{Actuator, FanAction, Result, TemperatureSensor, ThermofanError};

use crate::clock::Clock;

/// Replays a fixed sequence of readings; `None` produces a parse error
pub struct FakeSensor {
    readings: VecDeque<Option<f64>>,
    pub reads: usize,
}

impl FakeSensor {
    pub fn new(readings: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self {
            readings: readings.into_iter().collect(),
            reads: 0,
        }
    }
}

impl TemperatureSensor for FakeSensor {
    fn read_temperature(&mut self) -> Result<f64> {
        self.reads += 1;
        match self.readings.pop_front() {
            Some(Some(temp)) => Ok(temp),
            Some(None) => Err(ThermofanError::sensor_parse("garbage")),
            None => Err(ThermofanError::generic("fake sensor has no more readings")),
        }
    }

    fn describe(&self) -> String {
        "fake sensor".to_string()
    }
}

/// Fan output that records every command it receives
pub struct FakeFan {
    pub on: bool,
    pub commands: Vec<FanAction>,
    pub fail_writes: bool,
}

impl FakeFan {
    pub fn new(on: bool) -> Self {
        Self {
            on,
            commands: Vec::new(),
            fail_writes: false,
        }
    }

    fn write(&mut self, level: bool, action: FanAction) -> Result<()> {
        if self.fail_writes {
            return Err(ThermofanError::GpioWrite {
                path: PathBuf::from("/sys/class/gpio/gpio23/value"),
                reason: "simulated failure".to_string(),
            });
        }
        self.on = level;
        self.commands.push(action);
        Ok(())
    }
}

impl Actuator for FakeFan {
    fn turn_on(&mut self) -> Result<()> {
        self.write(true, FanAction::TurnOn)
    }

    fn turn_off(&mut self) -> Result<()> {
        self.write(false, FanAction::TurnOff)
    }

    fn is_on(&self) -> Result<bool> {
        Ok(self.on)
    }
}

/// Records sleeps instead of waiting; optionally requests shutdown after N sleeps
pub struct StepClock {
    pub sleeps: Vec<Duration>,
    shutdown: Arc<AtomicBool>,
    stop_after: Option<usize>,
}

impl StepClock {
    pub fn new() -> Self {
        Self {
            sleeps: Vec::new(),
            shutdown: Arc::new(AtomicBool::new(false)),
            stop_after: None,
        }
    }

    pub fn stopping_after(sleeps: usize) -> Self {
        Self {
            stop_after: Some(sleeps),
            ..Self::new()
        }
    }

    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }
}

impl Clock for StepClock {
    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
        if self.stop_after == Some(self.sleeps.len()) {
            self.shutdown.store(true, Ordering::SeqCst);
        }
    }
}

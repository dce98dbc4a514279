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

//! Fan control loop
//!
//! Sense, decide, act, sleep, repeat:
//! 1. read the core temperature from the sensor
//! 2. log the reading
//! 3. read the fan state back from the actuator (never cached, so manual
//!    changes to the pin are picked up)
//! 4. run the hysteresis decision and switch the fan if needed
//! 5. sleep for the poll interval
//!
//! The loop only ends when shutdown is requested or a fatal error occurs.
//! Actuator failures are always fatal. Sensor failures are fatal unless the
//! configuration asks for them to be skipped.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, warn};

use tf_core::constants::errors::LOG_EVERY_N_FAILURES;
use tf_core::{
    Actuator, DaemonConfig, FanAction, FanState, HysteresisController, ReleaseAction, Result,
    SensorErrorPolicy, TemperatureSensor, ThresholdConfig,
};

use crate::clock::Clock;

/// Loop behaviour outside the hysteresis decision itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopOptions {
    pub on_sensor_error: SensorErrorPolicy,
    pub release_on_exit: ReleaseAction,
}

impl From<&DaemonConfig> for LoopOptions {
    fn from(config: &DaemonConfig) -> Self {
        Self {
            on_sensor_error: config.on_sensor_error,
            release_on_exit: config.release_on_exit,
        }
    }
}

/// Owns the sensor, the fan and the clock for the lifetime of the daemon
pub struct FanControl<S, A, C> {
    engine: HysteresisController,
    options: LoopOptions,
    sensor: S,
    actuator: A,
    clock: C,
    consecutive_sensor_errors: u32,
}

impl<S, A, C> FanControl<S, A, C>
where
    S: TemperatureSensor,
    A: Actuator,
    C: Clock,
{
    /// Validate the thresholds and pick up the fan's current state
    ///
    /// Fails with a configuration error before touching the sensor when the
    /// thresholds leave no dead band.
    pub fn new(config: ThresholdConfig, sensor: S, actuator: A, clock: C) -> Result<Self> {
        let engine = HysteresisController::new(config)?;
        let initial = actuator.state()?;

        info!(
            on_threshold = config.on_threshold,
            off_threshold = config.off_threshold,
            poll_interval_secs = config.poll_interval.as_secs_f64(),
            "Thresholds: on above {}°C, off below {}°C",
            config.on_threshold,
            config.off_threshold
        );
        info!(sensor = %sensor.describe(), "Fan is initially {}", initial);

        Ok(Self {
            engine,
            options: LoopOptions::default(),
            sensor,
            actuator,
            clock,
            consecutive_sensor_errors: 0,
        })
    }

    pub fn with_options(mut self, options: LoopOptions) -> Self {
        self.options = options;
        self
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// One sense-decide-act step, without the sleep
    pub fn process_iteration(&mut self) -> Result<FanAction> {
        let temp = self.sensor.read_temperature()?;
        info!(temp_c = temp, "CPU temp: {}°C", temp);

        let state = self.actuator.state()?;
        let (next, action) = self.engine.poll_once(temp, state);

        match action {
            FanAction::TurnOn => {
                warn!(temp_c = temp, "Turning on fan");
                self.actuator.turn_on()?;
            }
            FanAction::TurnOff => {
                warn!(temp_c = temp, "Turning off fan");
                self.actuator.turn_off()?;
            }
            FanAction::None => {
                debug!(state = %next, "Fan stays {}", next);
            }
        }

        Ok(action)
    }

    /// Run one step and apply the sensor error policy
    fn poll_cycle(&mut self) -> Result<()> {
        match self.process_iteration() {
            Ok(_) => {
                if self.consecutive_sensor_errors > 0 {
                    info!(
                        "Sensor recovered after {} failed reads",
                        self.consecutive_sensor_errors
                    );
                    self.consecutive_sensor_errors = 0;
                }
                Ok(())
            }
            Err(e) if e.is_sensor() && self.options.on_sensor_error == SensorErrorPolicy::Skip => {
                self.consecutive_sensor_errors += 1;
                let failures = self.consecutive_sensor_errors;
                if failures == 1 || failures % LOG_EVERY_N_FAILURES == 0 {
                    error!("Skipping poll cycle (failure {}): {}", failures, e);
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Loop until `shutdown` is set or a fatal error occurs
    ///
    /// On a requested shutdown the fan is released according to
    /// [`LoopOptions::release_on_exit`]. After a fatal error the fan is left as-is.
    pub fn run(&mut self, shutdown: &AtomicBool) -> Result<()> {
        let interval = self.engine.config().poll_interval;
        info!("Fan control loop started");

        loop {
            if shutdown.load(Ordering::SeqCst) {
                break;
            }

            if let Err(e) = self.poll_cycle() {
                error!("Fan control loop stopped: {}", e);
                return Err(e);
            }

            if shutdown.load(Ordering::SeqCst) {
                break;
            }
            self.clock.sleep(interval);
        }

        info!("Fan control loop shutting down");
        self.release()
    }

    /// Put the fan in its exit state
    pub fn release(&mut self) -> Result<()> {
        match self.options.release_on_exit {
            ReleaseAction::TurnOff => {
                if self.actuator.state()? == FanState::On {
                    warn!("Turning off fan");
                }
                self.actuator.turn_off()?;
                info!("Fan released (off)");
            }
            ReleaseAction::Leave => {
                info!("Fan left {}", self.actuator.state()?);
            }
        }
        Ok(())
    }
}

/// Build a [`FanControl`] and run it until shutdown
pub fn run<S, A, C>(
    config: ThresholdConfig,
    options: LoopOptions,
    sensor: S,
    actuator: A,
    clock: C,
    shutdown: &AtomicBool,
) -> Result<()>
where
    S: TemperatureSensor,
    A: Actuator,
    C: Clock,
{
    FanControl::new(config, sensor, actuator, clock)?
        .with_options(options)
        .run(shutdown)
}

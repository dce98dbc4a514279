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

//! Thermofan daemon (thermofand)
//!
//! Keeps a GPIO cooling fan between two temperature thresholds. Runs in the
//! foreground until SIGINT/SIGTERM; a supervisor (systemd, runit, ...) is
//! expected to restart it after a fatal error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};

use thermofan::cli::{self, CliCommand};
use thermofan::clock::SystemClock;
use thermofan::fan_control::{self, LoopOptions};
use thermofan::logger;
use tf_core::{open_sensor, resolve_config_path, SysfsGpioFan};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Warn when not running as root; sysfs GPIO usually needs it
fn check_privileges() {
    // SAFETY: geteuid has no preconditions and only returns the effective user ID.
    let euid = unsafe { libc::geteuid() };
    if euid != 0 {
        warn!(
            "Running as uid {} - GPIO access may fail without root or gpio group membership",
            euid
        );
    }
}

/// Request a clean shutdown on SIGINT/SIGTERM
fn install_signal_handler(shutdown: Arc<AtomicBool>) {
    if let Err(e) = ctrlc::set_handler(move || {
        info!("SIGNAL: Received termination signal - shutting down");
        shutdown.store(true, Ordering::SeqCst);
    }) {
        warn!("Failed to set signal handler: {}. The fan will not be released on exit.", e);
    }
}

fn run_daemon(console: bool) -> anyhow::Result<()> {
    let log_level = logger::log_level();
    let config_path = resolve_config_path();
    let config = match tf_core::load_config_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            // main reports the error through the stock log file
            logger::init_logging(&logger::log_path_for(None), console, &log_level)?;
            return Err(e)
                .with_context(|| format!("loading configuration from {}", config_path.display()));
        }
    };

    let log_path = logger::init_logging(&logger::log_path_for(Some(&config)), console, &log_level)?;
    let sinks = if console { " and console" } else { "" };

    info!("STARTUP: thermofand {} starting", VERSION);
    info!("STARTUP: Config: {}", config_path.display());
    info!("STARTUP: Logging to {}{}", log_path.display(), sinks);
    info!("STARTUP: Log level: {}", log_level);
    info!("STARTUP: Fan on GPIO {}", config.gpio_pin);

    check_privileges();

    let shutdown = Arc::new(AtomicBool::new(false));
    install_signal_handler(shutdown.clone());

    let sensor = open_sensor(&config.sensor);
    let fan = SysfsGpioFan::open(&config.gpio_base, config.gpio_pin)
        .with_context(|| format!("opening GPIO {}", config.gpio_pin))?;
    let clock = SystemClock::new(shutdown.clone());

    fan_control::run(
        config.thresholds(),
        LoopOptions::from(&config),
        sensor,
        fan,
        clock,
        &shutdown,
    )?;

    info!("SHUTDOWN: Daemon terminated gracefully");
    Ok(())
}

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());
        error!("PANIC at {}: {}", location, panic_info);
        eprintln!("PANIC at {}: {}", location, panic_info);
    }));

    let command = match cli::parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}", e);
            cli::print_help();
            std::process::exit(1);
        }
    };

    let console = match command {
        CliCommand::Help => {
            cli::print_help();
            return;
        }
        CliCommand::Version => {
            cli::print_version();
            return;
        }
        CliCommand::Run { debug } => debug,
    };

    if let Err(e) = run_daemon(console) {
        error!("FATAL: {:#}", e);
        eprintln!("thermofand: {:#}", e);
        std::process::exit(1);
    }
}

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

//! Command-line surface of `thermofand`
//!
//! The daemon takes a single behavioural flag, `--debug`, which mirrors the log
//! to the console. Everything else comes from the configuration file.

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliCommand {
    /// Run the control loop
    Run { debug: bool },
    Help,
    Version,
}

/// Parse arguments (without the program name)
pub fn parse_args<I, S>(args: I) -> Result<CliCommand, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut debug = false;

    for arg in args {
        match arg.as_ref() {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "-v" | "--version" => return Ok(CliCommand::Version),
            "-d" | "--debug" => debug = true,
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    Ok(CliCommand::Run { debug })
}

pub fn print_help() {
    eprintln!("thermofand {} - hysteresis fan control daemon", VERSION);
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    thermofand [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -d, --debug         Also log to the console");
    eprintln!("    -v, --version       Print version");
    eprintln!("    -h, --help          Print this help");
    eprintln!();
    eprintln!("ENVIRONMENT:");
    eprintln!("    THERMOFAN_CONFIG    Config file (default /etc/thermofan/config.json)");
    eprintln!("    THERMOFAN_LOG       Log level (trace, debug, info, warn, error)");
}

pub fn print_version() {
    println!("thermofand {}", VERSION);
}

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

//! Log sinks for the daemon
//!
//! Every event goes to the log file. With `--debug` the same events are also
//! written to stderr. Lines carry a timestamp, the level and the message.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context};
use tracing::Subscriber;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use tf_core::constants::paths;
use tf_core::DaemonConfig;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "THERMOFAN_LOG";

const DEFAULT_LEVEL: &str = "info";

/// Filter directive from `THERMOFAN_LOG`, `info` when unset
pub fn log_level() -> String {
    std::env::var(LOG_ENV)
        .ok()
        .filter(|level| !level.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

/// Log file for a config load outcome
///
/// Uses the configured path, or the stock `/var/log/thermofan.log` when the
/// configuration could not be loaded, so startup failures still reach a file.
pub fn log_path_for(config: Option<&DaemonConfig>) -> PathBuf {
    config.map_or_else(|| PathBuf::from(paths::LOG_FILE), |c| c.log_path.clone())
}

/// Open `path` for appending, creating the parent directory if needed
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Subscriber writing to `file`, and to stderr when `console` is set
pub fn build_subscriber(
    file: File,
    console: bool,
    level: &str,
) -> impl Subscriber + Send + Sync + 'static {
    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false);

    let console_layer = console.then(|| {
        fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(file_layer)
        .with(console_layer)
}

/// Install the global subscriber
///
/// Falls back to `/tmp/thermofan.log` when `path` cannot be opened. Returns the
/// path actually in use.
pub fn init_logging(path: &Path, console: bool, level: &str) -> anyhow::Result<PathBuf> {
    let (file, used) = match open_log_file(path) {
        Ok(f) => (f, path.to_path_buf()),
        Err(e) => {
            let fallback = PathBuf::from(paths::FALLBACK_LOG_FILE);
            eprintln!(
                "thermofand: cannot open log file {}: {} - using {}",
                path.display(),
                e,
                fallback.display()
            );
            let f = open_log_file(&fallback)
                .with_context(|| format!("opening fallback log file {}", fallback.display()))?;
            (f, fallback)
        }
    };

    tracing::subscriber::set_global_default(build_subscriber(file, console, level))
        .map_err(|e| anyhow!("failed to install log subscriber: {}", e))?;

    Ok(used)
}

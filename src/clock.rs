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

//! Interruptible sleep between poll cycles

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tf_core::constants::timing;

/// Waits between poll cycles
pub trait Clock {
    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock sleep that wakes early once shutdown is requested
#[derive(Debug, Clone)]
pub struct SystemClock {
    shutdown: Arc<AtomicBool>,
    slice: Duration,
}

impl SystemClock {
    pub fn new(shutdown: Arc<AtomicBool>) -> Self {
        Self {
            shutdown,
            slice: timing::SLEEP_SLICE,
        }
    }
}

impl Clock for SystemClock {
    fn sleep(&mut self, duration: Duration) {
        // A deadline past what Instant can represent means sleep until shutdown
        let deadline = Instant::now().checked_add(duration);
        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                return;
            }
            let step = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return;
                    }
                    self.slice.min(deadline - now)
                }
                None => self.slice,
            };
            thread::sleep(step);
        }
    }
}

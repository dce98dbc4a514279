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

//! Thermofan - hysteresis fan control daemon
//!
//! Samples the core temperature on a fixed interval and switches a GPIO fan
//! on above one threshold and off below a lower one.

pub mod cli;
pub mod clock;
pub mod fan_control;
pub mod logger;

#[cfg(test)]
pub mod test_utils;

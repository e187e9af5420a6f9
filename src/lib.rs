/*
 * This file is part of pipwm.
 *
 * Copyright (C) 2026 pipwm contributors
 *
 * pipwm is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * pipwm is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with pipwm. If not, see <https://www.gnu.org/licenses/>.
 */

//! pipwm - hardware PWM channel lifecycle manager for Raspberry Pi
//!
//! Drives the `pwm` device-tree overlay and the sysfs PWM interface under
//! `/sys/class/pwm/pwmchip0` to export, configure, enable and tear down
//! the two hardware PWM channels. The overlay is shared state across
//! independent channel users: it is loaded before any export and removed
//! only once no channel remains exported.

pub mod chip;
pub mod error;
pub mod lifecycle;
pub mod logger;
pub mod overlay;
pub mod query;

#[cfg(test)]
pub mod test_utils;

pub use crate::error::PwmError;

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

//! In-memory chip fake for lifecycle tests.
//!
//! Mimics the kernel's sysfs PWM semantics: channels exist only between
//! export and unexport, double export is rejected, per-channel writes
//! against a missing channel fail with `NotFound`, and a duty cycle larger
//! than the period is refused. Every accepted operation is recorded in
//! order so tests can assert the export, period, duty_cycle, enable
//! sequence.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::io;

use crate::chip::PwmChip;

#[derive(Debug, Clone, Default)]
pub struct FakeChannel {
    pub period_ns: u64,
    pub duty_ns: u64,
    pub enabled: bool,
}

pub struct FakeChip {
    channels: RefCell<BTreeMap<u8, FakeChannel>>,
    /// Accepted operations, in order, e.g. `"export 0"`, `"period 0 20000000"`.
    pub ops: RefCell<Vec<String>>,
    /// When set, `exported_channels` fails, simulating e.g. a permission
    /// problem on the chip directory.
    pub fail_enumeration: Cell<bool>,
    /// When set, enable writes are refused, simulating inconsistent
    /// channel files.
    pub reject_enable: Cell<bool>,
}

impl FakeChip {
    pub fn new() -> Self {
        FakeChip {
            channels: RefCell::new(BTreeMap::new()),
            ops: RefCell::new(Vec::new()),
            fail_enumeration: Cell::new(false),
            reject_enable: Cell::new(false),
        }
    }

    /// Chip with the given channels already exported (and disabled), as
    /// left behind by an earlier activation or an interrupted one.
    pub fn with_exported(channels: &[u8]) -> Self {
        let chip = Self::new();
        for &ch in channels {
            chip.channels
                .borrow_mut()
                .insert(ch, FakeChannel::default());
        }
        chip
    }

    pub fn exported(&self, channel: u8) -> bool {
        self.channels.borrow().contains_key(&channel)
    }

    pub fn enabled(&self, channel: u8) -> bool {
        self.channels
            .borrow()
            .get(&channel)
            .map(|c| c.enabled)
            .unwrap_or(false)
    }

    pub fn channel(&self, channel: u8) -> Option<FakeChannel> {
        self.channels.borrow().get(&channel).cloned()
    }

    /// Put an exported channel straight into the enabled state.
    pub fn force_enable(&self, channel: u8) {
        if let Some(c) = self.channels.borrow_mut().get_mut(&channel) {
            c.enabled = true;
        }
    }

    fn record(&self, op: String) {
        self.ops.borrow_mut().push(op);
    }

    fn not_found(channel: u8) -> io::Error {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("pwm{}: no such channel", channel),
        )
    }
}

impl Default for FakeChip {
    fn default() -> Self {
        Self::new()
    }
}

impl PwmChip for FakeChip {
    fn export(&self, channel: u8) -> io::Result<()> {
        let mut channels = self.channels.borrow_mut();
        if channels.contains_key(&channel) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("pwm{}: already exported", channel),
            ));
        }
        channels.insert(channel, FakeChannel::default());
        self.record(format!("export {}", channel));
        Ok(())
    }

    fn unexport(&self, channel: u8) -> io::Result<()> {
        if self.channels.borrow_mut().remove(&channel).is_none() {
            return Err(Self::not_found(channel));
        }
        self.record(format!("unexport {}", channel));
        Ok(())
    }

    fn set_period(&self, channel: u8, period_ns: u64) -> io::Result<()> {
        let mut channels = self.channels.borrow_mut();
        let ch = channels
            .get_mut(&channel)
            .ok_or_else(|| Self::not_found(channel))?;
        ch.period_ns = period_ns;
        self.record(format!("period {} {}", channel, period_ns));
        Ok(())
    }

    fn set_duty_cycle(&self, channel: u8, duty_ns: u64) -> io::Result<()> {
        let mut channels = self.channels.borrow_mut();
        let ch = channels
            .get_mut(&channel)
            .ok_or_else(|| Self::not_found(channel))?;
        if duty_ns > ch.period_ns {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "pwm{}: duty_cycle {} exceeds period {}",
                    channel, duty_ns, ch.period_ns
                ),
            ));
        }
        ch.duty_ns = duty_ns;
        self.record(format!("duty_cycle {} {}", channel, duty_ns));
        Ok(())
    }

    fn set_enable(&self, channel: u8, on: bool) -> io::Result<()> {
        let mut channels = self.channels.borrow_mut();
        let ch = channels
            .get_mut(&channel)
            .ok_or_else(|| Self::not_found(channel))?;
        if on && self.reject_enable.get() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("pwm{}: enable refused", channel),
            ));
        }
        ch.enabled = on;
        self.record(format!("enable {} {}", channel, if on { 1 } else { 0 }));
        Ok(())
    }

    fn exported_channels(&self) -> io::Result<Vec<u8>> {
        if self.fail_enumeration.get() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "chip directory not readable",
            ));
        }
        Ok(self.channels.borrow().keys().copied().collect())
    }
}

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

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Sysfs root of the PWM controller exposed by the pwm overlay.
pub const DEFAULT_CHIP_ROOT: &str = "/sys/class/pwm/pwmchip0";

/// Handle on one sysfs PWM controller.
///
/// Per-channel control files (`period`, `duty_cycle`, `enable`) exist only
/// between a successful export and the matching unexport; writes against an
/// unexported channel fail with `NotFound`. A channel must be exported
/// before it can be enabled, and disabled before it can be unexported.
pub trait PwmChip {
    /// Create channel `channel`'s control directory.
    fn export(&self, channel: u8) -> io::Result<()>;
    /// Remove channel `channel`'s control directory.
    fn unexport(&self, channel: u8) -> io::Result<()>;
    /// Write the period in nanoseconds.
    fn set_period(&self, channel: u8, period_ns: u64) -> io::Result<()>;
    /// Write the duty cycle in nanoseconds. The kernel rejects values
    /// larger than the current period.
    fn set_duty_cycle(&self, channel: u8, duty_ns: u64) -> io::Result<()>;
    /// Start or stop the output waveform.
    fn set_enable(&self, channel: u8, on: bool) -> io::Result<()>;
    /// Channel indices currently exported, ascending. A missing chip root
    /// means the overlay is not active and yields an empty list; any other
    /// I/O error propagates so callers can tell "none exported" from
    /// "could not look".
    fn exported_channels(&self) -> io::Result<Vec<u8>>;
}

/// Production chip handle backed by real sysfs file I/O.
pub struct SysfsChip {
    root: PathBuf,
}

impl SysfsChip {
    pub fn new() -> Self {
        Self::at(DEFAULT_CHIP_ROOT)
    }

    /// Chip handle rooted elsewhere, e.g. a scratch tree in tests.
    pub fn at<P: Into<PathBuf>>(root: P) -> Self {
        SysfsChip { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn channel_dir(&self, channel: u8) -> PathBuf {
        self.root.join(format!("pwm{}", channel))
    }
}

impl Default for SysfsChip {
    fn default() -> Self {
        Self::new()
    }
}

impl PwmChip for SysfsChip {
    fn export(&self, channel: u8) -> io::Result<()> {
        fs::write(self.root.join("export"), channel.to_string())
    }

    fn unexport(&self, channel: u8) -> io::Result<()> {
        fs::write(self.root.join("unexport"), channel.to_string())
    }

    fn set_period(&self, channel: u8, period_ns: u64) -> io::Result<()> {
        fs::write(self.channel_dir(channel).join("period"), period_ns.to_string())
    }

    fn set_duty_cycle(&self, channel: u8, duty_ns: u64) -> io::Result<()> {
        fs::write(
            self.channel_dir(channel).join("duty_cycle"),
            duty_ns.to_string(),
        )
    }

    fn set_enable(&self, channel: u8, on: bool) -> io::Result<()> {
        fs::write(
            self.channel_dir(channel).join("enable"),
            if on { "1" } else { "0" },
        )
    }

    fn exported_channels(&self) -> io::Result<Vec<u8>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(it) => it,
            // No chip directory means the overlay is not active, which in
            // turn means no channel is exported.
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut channels = Vec::new();
        for ent in entries {
            let ent = ent?;
            let name = ent.file_name();
            if let Some(idx) = channel_index(&name.to_string_lossy()) {
                channels.push(idx);
            }
        }
        channels.sort_unstable();
        Ok(channels)
    }
}

/// Parse a `pwmN` directory entry name into its channel index.
/// Rejects neighbours like `npwm` and `pwm0_label`.
pub fn channel_index(fname: &str) -> Option<u8> {
    let digits = fname.strip_prefix("pwm")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

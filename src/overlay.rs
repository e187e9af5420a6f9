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

use std::io;
use std::process::{Command, Output};

#[cfg(test)]
use mockall::automock;

/// Name of the device-tree overlay that exposes the hardware PWM chip.
pub const OVERLAY_NAME: &str = "pwm";

/// Handle on the kernel's device-tree overlay subsystem.
///
/// The overlay is kernel-owned state shared by every channel user: it must
/// be loaded before any channel can be exported and must not be removed
/// while one remains exported. The handle is passed into the lifecycle
/// functions explicitly so that invariant can be exercised against a mock
/// without touching real hardware.
#[cfg_attr(test, automock)]
pub trait OverlayCtl {
    /// Raw output of the overlay listing. The first line is informational
    /// and does not document an active overlay.
    fn list(&self) -> io::Result<String>;
    /// Load the pwm overlay routing `pin` through alternate function `func`.
    fn load(&self, pin: u8, func: u8) -> io::Result<()>;
    /// Remove the pwm overlay.
    fn remove(&self) -> io::Result<()>;
}

/// Production implementation shelling out to `dtoverlay`.
///
/// No timeouts are applied; a hang in the kernel interface hangs the whole
/// operation.
pub struct Dtoverlay;

impl Dtoverlay {
    fn run(args: &[&str]) -> io::Result<Output> {
        let out = Command::new("dtoverlay").args(args).output()?;
        if out.status.success() {
            Ok(out)
        } else {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            Err(io::Error::new(
                io::ErrorKind::Other,
                format!(
                    "dtoverlay {} exited with {}: {}",
                    args.join(" "),
                    out.status,
                    stderr
                ),
            ))
        }
    }
}

impl OverlayCtl for Dtoverlay {
    fn list(&self) -> io::Result<String> {
        let out = Self::run(&["-l"])?;
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }

    fn load(&self, pin: u8, func: u8) -> io::Result<()> {
        let overlay = format!("{},pin={}", OVERLAY_NAME, pin);
        let func = format!("func={}", func);
        Self::run(&[&overlay, &func])?;
        Ok(())
    }

    fn remove(&self) -> io::Result<()> {
        Self::run(&["-r", OVERLAY_NAME])?;
        Ok(())
    }
}

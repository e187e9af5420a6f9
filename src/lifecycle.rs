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

//! The channel lifecycle state machine:
//!
//! ```text
//! Unexported -> Exported(disabled) -> Exported(enabled)
//!            <- Exported(disabled) <-
//! ```
//!
//! [`activate`] drives the forward path as a single request, [`deactivate`]
//! the reverse path. Deactivation is the only place the shared overlay may
//! be removed, and only once no channel remains exported.
//!
//! Concurrent processes (one per channel) may run against the same chip;
//! no lock is taken here. Correctness across processes relies on the
//! kernel's file-level atomicity plus external mutual exclusion between a
//! deactivation's unexported-check and a concurrent export.

use std::io;

use serde_json::json;

use crate::chip::PwmChip;
use crate::error::PwmError;
use crate::logger;
use crate::overlay::OverlayCtl;
use crate::query;

/// Device-tree alternate function that routes `pin` to hardware PWM
/// output. Fixed by the BCM pin muxing; anything else cannot carry
/// hardware PWM.
pub fn pin_function(pin: u8) -> Option<u8> {
    match pin {
        12 | 13 => Some(4),
        18 | 19 => Some(2),
        _ => None,
    }
}

/// Duty cycle in nanoseconds for `duty_pct` percent of `period_ns`,
/// rounded down.
pub fn duty_ns(period_ns: u64, duty_pct: f64) -> u64 {
    ((duty_pct / 100.0) * period_ns as f64) as u64
}

/// Bring `channel` up on `pin`: overlay load, export, period/duty
/// configuration, enable, in that order.
///
/// Fails fast with no rollback: a failure after export leaves the channel
/// exported-but-disabled, a valid starting state for the next activate or
/// deactivate invocation.
pub fn activate(
    overlay: &dyn OverlayCtl,
    chip: &dyn PwmChip,
    channel: u8,
    pin: u8,
    period_ns: u64,
    duty_pct: f64,
) -> Result<(), PwmError> {
    // Resolve the pin before any kernel interaction. The CLI front-end
    // validates this too, but direct callers reach the core unchecked.
    let func = pin_function(pin).ok_or(PwmError::UnsupportedPin(pin))?;

    // Always issue the load, without deduplicating against the listing.
    // If the identical overlay is already active the kernel may report it
    // as such; that outcome is as good as a fresh load.
    if let Err(e) = overlay.load(pin, func) {
        let msg = e.to_string();
        if msg.to_ascii_lowercase().contains("already") {
            logger::log_event(
                "overlay_already_active",
                json!({ "pin": pin, "func": func }),
            );
        } else {
            return Err(PwmError::OverlayLoad(msg));
        }
    }

    chip.export(channel)
        .map_err(|source| PwmError::Export { channel, source })?;

    // None of the files below exist until the export succeeds. Period is
    // written before duty_cycle so the kernel's duty <= period check runs
    // against the value we are about to use, not a stale smaller one.
    let duty = duty_ns(period_ns, duty_pct);
    chip.set_period(channel, period_ns)
        .map_err(|source| PwmError::Configure { channel, source })?;
    chip.set_duty_cycle(channel, duty)
        .map_err(|source| PwmError::Configure { channel, source })?;

    chip.set_enable(channel, true)
        .map_err(|source| PwmError::Enable { channel, source })?;

    logger::log_event(
        "channel_activated",
        json!({
            "channel": channel,
            "pin": pin,
            "period_ns": period_ns,
            "duty_ns": duty,
        }),
    );
    Ok(())
}

/// Tear `channel` down: disable, unexport, then remove the overlay once no
/// channel remains exported.
///
/// Best-effort and idempotent: a channel that is already down is left
/// alone, and a failed overlay removal does not undo the channel-level
/// outcome. Only a failed channel enumeration aborts, since removing the
/// overlay on unknown state could strand another user's channel.
pub fn deactivate(
    overlay: &dyn OverlayCtl,
    chip: &dyn PwmChip,
    channel: u8,
) -> Result<(), PwmError> {
    tolerate_missing(channel, "disable", chip.set_enable(channel, false));
    tolerate_missing(channel, "unexport", chip.unexport(channel));

    if query::all_channels_unexported(chip)? {
        match overlay.remove() {
            Ok(()) => {
                logger::log_event("overlay_removed", json!({ "last_channel": channel }));
            }
            // Overlay already absent, or removal refused: the channel-level
            // goal was achieved either way.
            Err(e) => {
                logger::log_event(
                    "overlay_remove_failed",
                    json!({ "channel": channel, "error": e.to_string() }),
                );
            }
        }
    }

    logger::log_event("channel_deactivated", json!({ "channel": channel }));
    Ok(())
}

/// A missing control file during teardown means the channel is already
/// unexported (or never was exported); the desired end state holds. Other
/// failures are logged and teardown continues.
fn tolerate_missing(channel: u8, step: &str, res: io::Result<()>) {
    match res {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            logger::log_event(
                "deactivate_step_failed",
                json!({ "channel": channel, "step": step, "error": e.to_string() }),
            );
        }
    }
}

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

//! Stateless queries against live overlay and chip state. No caching:
//! every call re-reads the kernel's view.

use crate::chip::PwmChip;
use crate::error::PwmError;
use crate::overlay::OverlayCtl;

/// Number of device-tree overlays currently active.
///
/// The listing's first line is a fixed header, not a data record, so the
/// count is line count minus one. Empty output is malformed and reported
/// as a query failure.
pub fn active_overlay_count(overlay: &dyn OverlayCtl) -> Result<usize, PwmError> {
    let listing = overlay
        .list()
        .map_err(|e| PwmError::Query(format!("overlay listing: {}", e)))?;
    let lines = listing.lines().count();
    if lines == 0 {
        return Err(PwmError::Query(
            "overlay listing produced no output".to_string(),
        ));
    }
    Ok(lines - 1)
}

/// True iff no channel of the chip is currently exported.
///
/// A failed enumeration is a query failure, never "all clear": removing
/// the overlay on unknown channel state could strand an exported channel.
pub fn all_channels_unexported(chip: &dyn PwmChip) -> Result<bool, PwmError> {
    let exported = chip
        .exported_channels()
        .map_err(|e| PwmError::Query(format!("channel enumeration: {}", e)))?;
    Ok(exported.is_empty())
}

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

use thiserror::Error;

/// Failure modes of the channel lifecycle core.
///
/// Activation fails fast and loud with one of these; prior steps are not
/// rolled back. Deactivation only ever surfaces `Query`: its channel-level
/// steps are best-effort and a missing control file is an already-satisfied
/// outcome, not an error.
#[derive(Error, Debug)]
pub enum PwmError {
    /// Overlay or channel state could not be determined.
    #[error("query failed: {0}")]
    Query(String),
    /// The pin has no PWM alternate-function mapping on this hardware.
    #[error("pin {0} cannot be routed to hardware PWM (supported: 12, 13, 18, 19)")]
    UnsupportedPin(u8),
    /// The overlay subsystem rejected the load request.
    #[error("overlay load failed: {0}")]
    OverlayLoad(String),
    /// The chip rejected the export, or its export control is missing
    /// (overlay not actually active).
    #[error("export of channel {channel} failed: {source}")]
    Export {
        channel: u8,
        #[source]
        source: io::Error,
    },
    /// The kernel rejected a period or duty_cycle write.
    #[error("configuring channel {channel} failed: {source}")]
    Configure {
        channel: u8,
        #[source]
        source: io::Error,
    },
    /// The kernel rejected the enable write.
    #[error("enabling channel {channel} failed: {source}")]
    Enable {
        channel: u8,
        #[source]
        source: io::Error,
    },
}

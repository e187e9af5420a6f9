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

use anyhow::Context;
use clap::{Parser, Subcommand};

use pipwm::chip::SysfsChip;
use pipwm::lifecycle;
use pipwm::logger;
use pipwm::overlay::Dtoverlay;

/// Manage the Raspberry Pi hardware PWM channels via the pwm device-tree
/// overlay and sysfs.
#[derive(Parser, Debug)]
#[command(name = "pipwm", version, about = "Hardware PWM channel lifecycle manager")]
struct Cli {
    /// Append JSON event logs to /etc/pipwm/logs.json
    #[arg(long)]
    logging: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the pwm overlay, then export, configure and enable a channel
    Activate {
        /// PWM channel number
        #[arg(value_parser = clap::value_parser!(u8).range(0..=1))]
        channel: u8,
        /// PWM output pin number (12, 13, 18 or 19)
        #[arg(value_parser = parse_pin)]
        pin: u8,
        /// PWM period in nanoseconds
        period_ns: u64,
        /// PWM duty cycle in percent
        #[arg(value_parser = parse_duty)]
        duty_pct: f64,
    },
    /// Disable and unexport a channel, removing the overlay once no
    /// channel remains exported
    Deactivate {
        /// PWM channel number
        #[arg(value_parser = clap::value_parser!(u8).range(0..=1))]
        channel: u8,
    },
}

fn parse_pin(s: &str) -> Result<u8, String> {
    let pin: u8 = s
        .parse()
        .map_err(|_| format!("`{}` is not a pin number", s))?;
    if lifecycle::pin_function(pin).is_some() {
        Ok(pin)
    } else {
        Err(format!(
            "pin {} cannot carry hardware PWM (supported: 12, 13, 18, 19)",
            pin
        ))
    }
}

fn parse_duty(s: &str) -> Result<f64, String> {
    let duty: f64 = s
        .parse()
        .map_err(|_| format!("`{}` is not a percentage", s))?;
    if (0.0..=100.0).contains(&duty) {
        Ok(duty)
    } else {
        Err(format!("duty cycle {} out of range 0..=100", duty))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Both dtoverlay and the sysfs PWM files need root.
    if unsafe { libc::geteuid() } != 0 {
        eprintln!("Error: pipwm requires root privileges to drive the overlay and sysfs PWM files.");
        eprintln!(
            "Please run with: sudo {}",
            std::env::args().next().unwrap_or_else(|| "pipwm".to_string())
        );
        std::process::exit(1);
    }

    if cli.logging {
        logger::init_logging();
    }

    let overlay = Dtoverlay;
    let chip = SysfsChip::new();

    match cli.command {
        Command::Activate {
            channel,
            pin,
            period_ns,
            duty_pct,
        } => lifecycle::activate(&overlay, &chip, channel, pin, period_ns, duty_pct)
            .with_context(|| format!("activating channel {}", channel))?,
        Command::Deactivate { channel } => lifecycle::deactivate(&overlay, &chip, channel)
            .with_context(|| format!("deactivating channel {}", channel))?,
    }

    Ok(())
}

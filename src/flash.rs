// SPDX-License-Identifier: GPL-3.0-only

//! Flash mode and hardware flash LED control via Linux sysfs
//!
//! Discovers flash LEDs exposed at `/sys/class/leds/*:flash` and drives
//! them through the `brightness` file, which is group-writable by
//! `feedbackd` on most phone distributions.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const LEDS_DIR: &str = "/sys/class/leds";

/// Capture-time illumination mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlashMode {
    #[default]
    Off,
    /// LED fires while the still is taken
    On,
}

impl FlashMode {
    /// Flip between Off and On
    pub fn toggled(self) -> Self {
        match self {
            FlashMode::Off => FlashMode::On,
            FlashMode::On => FlashMode::Off,
        }
    }

    pub fn is_on(self) -> bool {
        self == FlashMode::On
    }
}

/// A writable flash LED found under sysfs
#[derive(Debug, Clone)]
pub struct FlashDevice {
    /// Sysfs path, e.g. `/sys/class/leds/white:flash`
    path: PathBuf,
    /// Value of the `max_brightness` file
    max_brightness: u32,
    /// Directory basename, e.g. `white:flash`
    name: String,
}

impl FlashDevice {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set raw brightness value (0 = off, max_brightness = full)
    pub fn set_brightness(&self, value: u32) -> io::Result<()> {
        let clamped = value.min(self.max_brightness);
        std::fs::write(self.path.join("brightness"), clamped.to_string())
    }

    pub fn on(&self) -> io::Result<()> {
        self.set_brightness(self.max_brightness)
    }

    pub fn off(&self) -> io::Result<()> {
        self.set_brightness(0)
    }
}

/// Scan `/sys/class/leds/` for `*:flash` entries we are allowed to drive.
///
/// LEDs that exist but are not writable are logged and skipped; the capture
/// then simply proceeds without flash.
pub fn detect() -> Vec<FlashDevice> {
    detect_in(Path::new(LEDS_DIR))
}

fn detect_in(leds_dir: &Path) -> Vec<FlashDevice> {
    let Ok(entries) = std::fs::read_dir(leds_dir) else {
        debug!(path = %leds_dir.display(), "No LED class directory, flash unavailable");
        return Vec::new();
    };

    let mut devices = Vec::new();

    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name_str) = name.to_str() else {
            continue;
        };

        if !name_str.ends_with(":flash") {
            continue;
        }

        let led_path = entry.path();
        let max_brightness_path = led_path.join("max_brightness");

        let max_brightness = match std::fs::read_to_string(&max_brightness_path) {
            Ok(s) => match s.trim().parse::<u32>() {
                Ok(v) if v > 0 => v,
                _ => {
                    warn!(path = %max_brightness_path.display(), "Invalid max_brightness value");
                    continue;
                }
            },
            Err(e) => {
                warn!(path = %max_brightness_path.display(), error = %e, "Cannot read max_brightness");
                continue;
            }
        };

        let brightness_path = led_path.join("brightness");
        if let Err(e) = std::fs::OpenOptions::new()
            .write(true)
            .open(&brightness_path)
        {
            warn!(
                path = %brightness_path.display(),
                error = %e,
                "Flash LED found but not writable, user may need to be in the 'feedbackd' group"
            );
            continue;
        }

        info!(name = name_str, max_brightness, "Discovered flash LED");
        devices.push(FlashDevice {
            path: led_path,
            max_brightness,
            name: name_str.to_string(),
        });
    }

    // white before yellow
    devices.sort_by(|a, b| a.name.cmp(&b.name));
    devices
}

/// Turn on all given flash devices at full brightness
pub fn all_on(devices: &[FlashDevice]) {
    for dev in devices {
        if let Err(e) = dev.on() {
            warn!(device = %dev.name, error = %e, "Failed to turn on flash LED");
        }
    }
}

/// Turn off all given flash devices
pub fn all_off(devices: &[FlashDevice]) {
    for dev in devices {
        if let Err(e) = dev.off() {
            warn!(device = %dev.name, error = %e, "Failed to turn off flash LED");
        }
    }
}

// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::{CameraSettings, Facing};
use crate::constants::{camera, gallery};
use crate::flash::FlashMode;
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Camera the screen opens with
    pub default_facing: Facing,
    /// Flash mode the screen opens with
    pub default_flash: FlashMode,
    /// Gallery subdirectory under the user's pictures directory
    pub album_name: String,
    /// Requested preview width
    pub preview_width: u32,
    /// Requested preview height
    pub preview_height: u32,
    /// JPEG quality for captured stills (1-100)
    pub jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_facing: Facing::Back,
            default_flash: FlashMode::Off,
            album_name: gallery::DEFAULT_ALBUM.to_string(),
            preview_width: camera::DEFAULT_WIDTH,
            preview_height: camera::DEFAULT_HEIGHT,
            jpeg_quality: camera::DEFAULT_JPEG_QUALITY,
        }
    }
}

impl Config {
    /// Settings the capture screen starts with
    pub fn initial_settings(&self) -> CameraSettings {
        CameraSettings {
            facing: self.default_facing,
            flash: self.default_flash,
        }
    }

    /// Requested preview size, falling back to the defaults for zero values
    pub fn preview_size(&self) -> (u32, u32) {
        if self.preview_width == 0 || self.preview_height == 0 {
            (camera::DEFAULT_WIDTH, camera::DEFAULT_HEIGHT)
        } else {
            (self.preview_width, self.preview_height)
        }
    }

    /// Load the config entry, falling back to defaults on any error
    ///
    /// Returns the handler too, so the caller can keep watching for changes.
    pub fn load(app_id: &str) -> (Option<cosmic_config::Config>, Self) {
        match cosmic_config::Config::new(app_id, Self::VERSION) {
            Ok(handler) => {
                let config = match Self::get_entry(&handler) {
                    Ok(config) => config,
                    Err((errors, config)) => {
                        tracing::error!(?errors, "Errors loading config");
                        config
                    }
                };
                (Some(handler), config)
            }
            Err(err) => {
                let err = crate::errors::AppError::Config(err.to_string());
                tracing::error!(%err, "Failed to create config handler");
                (None, Self::default())
            }
        }
    }
}

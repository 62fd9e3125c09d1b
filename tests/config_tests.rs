// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use quickcam::Config;
use quickcam::backends::camera::Facing;
use quickcam::flash::FlashMode;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.default_facing, Facing::Back, "Back camera by default");
    assert_eq!(config.default_flash, FlashMode::Off, "Flash off by default");
    assert_eq!(config.album_name, "quickcam");
    assert_eq!(config.jpeg_quality, 92);
}

#[test]
fn test_initial_settings_follow_config() {
    let config = Config {
        default_facing: Facing::Front,
        default_flash: FlashMode::On,
        ..Config::default()
    };

    let settings = config.initial_settings();
    assert_eq!(settings.facing, Facing::Front);
    assert_eq!(settings.flash, FlashMode::On);
}

#[test]
fn test_preview_size_falls_back_for_zero() {
    let config = Config {
        preview_width: 0,
        ..Config::default()
    };
    assert_eq!(config.preview_size(), (1280, 720));

    let config = Config {
        preview_width: 640,
        preview_height: 480,
        ..Config::default()
    };
    assert_eq!(config.preview_size(), (640, 480));
}

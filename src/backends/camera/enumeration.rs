// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 device discovery and front/back camera selection

use super::types::{CameraInfo, Facing};
use tracing::{debug, info};
use v4l::capability::Flags;
use v4l::prelude::*;

/// Name fragments drivers and device trees use for user-facing sensors
const FRONT_HINTS: &[&str] = &["front", "user", "face", "selfie"];
/// Name fragments for world-facing sensors
const BACK_HINTS: &[&str] = &["back", "rear", "world"];

/// Scan `/dev/video*` for devices that can capture video
///
/// Metadata-only nodes (UVC exposes one per camera) are skipped, so each
/// physical camera appears once.
pub fn enumerate_cameras() -> Vec<CameraInfo> {
    let mut paths: Vec<String> = std::fs::read_dir("/dev")
        .into_iter()
        .flatten()
        .flatten()
        .filter_map(|e| {
            let name = e.file_name();
            let name = name.to_str()?;
            name.starts_with("video")
                .then(|| e.path().to_string_lossy().to_string())
        })
        .collect();
    paths.sort_by_key(|p| device_index(p));

    let mut cameras = Vec::new();
    for path in paths {
        let caps = match Device::with_path(&path).and_then(|dev| dev.query_caps()) {
            Ok(caps) => caps,
            Err(e) => {
                debug!(path = %path, error = %e, "Skipping unreadable video node");
                continue;
            }
        };

        if !caps.capabilities.contains(Flags::VIDEO_CAPTURE) {
            debug!(path = %path, card = %caps.card, "Skipping node without video capture");
            continue;
        }

        info!(path = %path, card = %caps.card, driver = %caps.driver, "Found camera");
        cameras.push(CameraInfo {
            name: caps.card,
            path,
        });
    }

    cameras
}

/// Numeric suffix of `/dev/videoN`, used for stable ordering
fn device_index(path: &str) -> u32 {
    path.trim_start_matches("/dev/video")
        .parse()
        .unwrap_or(u32::MAX)
}

fn hinted_facing(name: &str) -> Option<Facing> {
    let lower = name.to_lowercase();
    if FRONT_HINTS.iter().any(|h| lower.contains(h)) {
        Some(Facing::Front)
    } else if BACK_HINTS.iter().any(|h| lower.contains(h)) {
        Some(Facing::Back)
    } else {
        None
    }
}

/// Pick the camera for a facing
///
/// Names win when they say which way the sensor points. Otherwise the first
/// camera is the back one and the second the front one. A lone camera serves
/// both facings.
pub fn select_for_facing(cameras: &[CameraInfo], facing: Facing) -> Option<&CameraInfo> {
    if let Some(cam) = cameras
        .iter()
        .find(|c| hinted_facing(&c.name) == Some(facing))
    {
        return Some(cam);
    }

    let unhinted: Vec<&CameraInfo> = cameras
        .iter()
        .filter(|c| hinted_facing(&c.name).is_none())
        .collect();

    let positional = match facing {
        Facing::Back => unhinted.first(),
        Facing::Front => unhinted.get(1).or(unhinted.first()),
    };

    positional.copied().or(cameras.first())
}

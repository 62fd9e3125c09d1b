// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera backends

use crate::flash::FlashMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Which physical camera is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Front,
    #[default]
    Back,
}

impl Facing {
    /// Flip between Front and Back
    pub fn toggled(self) -> Self {
        match self {
            Facing::Front => Facing::Back,
            Facing::Back => Facing::Front,
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Facing::Front => write!(f, "front"),
            Facing::Back => write!(f, "back"),
        }
    }
}

/// Capture configuration chosen on the preview screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CameraSettings {
    pub facing: Facing,
    pub flash: FlashMode,
}

/// Reference to a captured still on disk
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(PathBuf);

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// A V4L2 capture device discovered under `/dev`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraInfo {
    /// Card name reported by the driver
    pub name: String,
    /// Device node, e.g. `/dev/video0`
    pub path: String,
}

/// A decoded preview frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 pixels
    pub rgba: Arc<Vec<u8>>,
    /// Driver sequence number
    pub sequence: u32,
    pub captured_at: Instant,
    /// Device node the frame came from
    pub device_path: Arc<str>,
}

impl Frame {
    pub fn is_from(&self, device_path: &str) -> bool {
        &*self.device_path == device_path
    }
}

/// Latest-frame hand-off between the preview thread and capture
pub type FrameSlot = Arc<Mutex<Option<Frame>>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_knows_its_device() {
        let frame = Frame {
            width: 1,
            height: 1,
            rgba: Arc::new(vec![0; 4]),
            sequence: 7,
            captured_at: Instant::now(),
            device_path: Arc::from("/dev/video2"),
        };
        assert!(frame.is_from("/dev/video2"));
        assert!(!frame.is_from("/dev/video0"));
    }
}

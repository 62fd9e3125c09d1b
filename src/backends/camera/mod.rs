// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! The screen only needs one thing from a camera: turn the current settings
//! into a captured still. Everything else (enumeration, preview streaming,
//! flash) is specific to the V4L2 implementation in [`v4l2`].
//!
//! ```text
//! ┌─────────────────────┐
//! │   Screen / AppModel │
//! └──────────┬──────────┘
//!            │ CameraDevice::capture
//!            ▼
//! ┌─────────────────────┐      latest frame      ┌───────────────────┐
//! │     V4l2Camera      │ ◄───────────────────── │  preview thread   │
//! └─────────────────────┘       (FrameSlot)      └───────────────────┘
//! ```

pub mod enumeration;
pub mod format_converters;
pub mod types;
pub mod v4l2;

pub use enumeration::{enumerate_cameras, select_for_facing};
pub use types::*;
pub use v4l2::V4l2Camera;

use crate::errors::CaptureError;

/// A device able to take a still photo
///
/// Implementations block; callers run them off the UI thread.
pub trait CameraDevice: Send + Sync {
    /// Capture a still with the given settings and return a reference to it
    fn capture(&self, settings: CameraSettings) -> Result<ImageRef, CaptureError>;
}

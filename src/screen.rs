// SPDX-License-Identifier: GPL-3.0-only

//! Camera screen state machine
//!
//! The screen is gated on permissions, then alternates between two states:
//!
//! ```text
//!             TakePicture (ok)
//!   Preview ───────────────────► Reviewing { image }
//!      ▲                               │
//!      └──── Retake / Save (ok) ───────┘
//! ```
//!
//! Transitions that call out to hardware are split in two: `begin_*` checks
//! the preconditions and marks the operation in flight, `finish_*` applies
//! the outcome. Failures are logged and leave the state as it was.

use crate::backends::camera::{CameraSettings, Facing, ImageRef};
use crate::errors::{CaptureError, PermissionKind, SaveError};
use crate::flash::FlashMode;
use crate::permissions::PermissionStatus;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// What the screen shows while permissions settle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Camera permission not answered yet
    Checking,
    /// Camera permission refused; offers a retry
    Denied,
    /// Camera granted, media library not (yet) granted
    RequestingMedia,
    /// Both granted; the capture UI is live
    Ready,
}

/// Permission answers held by the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permissions {
    pub camera: PermissionStatus,
    pub media_library: PermissionStatus,
}

impl Permissions {
    pub fn gate(&self) -> Gate {
        match (self.camera, self.media_library) {
            (PermissionStatus::Unknown, _) => Gate::Checking,
            (PermissionStatus::Denied, _) => Gate::Denied,
            (PermissionStatus::Granted, PermissionStatus::Granted) => Gate::Ready,
            (PermissionStatus::Granted, _) => Gate::RequestingMedia,
        }
    }
}

/// Result of one permission pass; `None` means that request failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PermissionUpdate {
    pub camera: Option<PermissionStatus>,
    pub media_library: Option<PermissionStatus>,
}

/// Capture flow state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CaptureState {
    /// Live camera feed with capture controls
    #[default]
    Preview,
    /// A just-captured image waiting for retake or save
    Reviewing { image: ImageRef },
}

/// An external call that has been started but not answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Capturing,
    Saving,
}

/// Why a user action was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    /// The camera has not delivered a frame yet
    NotReady,
    PermissionMissing(PermissionKind),
    /// Another capture or save is still running
    Busy(Operation),
    NotInPreview,
    NotReviewing,
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejected::NotReady => write!(f, "camera not ready yet"),
            Rejected::PermissionMissing(kind) => write!(f, "{} permission not granted", kind),
            Rejected::Busy(Operation::Capturing) => write!(f, "capture still in progress"),
            Rejected::Busy(Operation::Saving) => write!(f, "save still in progress"),
            Rejected::NotInPreview => write!(f, "only available in preview"),
            Rejected::NotReviewing => write!(f, "no captured image under review"),
        }
    }
}

/// All state of the camera screen
#[derive(Debug, Clone, Default)]
pub struct Screen {
    permissions: Permissions,
    camera_ready: bool,
    settings: CameraSettings,
    capture: CaptureState,
    in_flight: Option<Operation>,
}

impl Screen {
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn gate(&self) -> Gate {
        self.permissions.gate()
    }

    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    pub fn settings(&self) -> CameraSettings {
        self.settings
    }

    pub fn capture_state(&self) -> &CaptureState {
        &self.capture
    }

    pub fn pending_image(&self) -> Option<&ImageRef> {
        match &self.capture {
            CaptureState::Preview => None,
            CaptureState::Reviewing { image } => Some(image),
        }
    }

    pub fn is_camera_ready(&self) -> bool {
        self.camera_ready
    }

    pub fn in_flight(&self) -> Option<Operation> {
        self.in_flight
    }

    /// Apply answered permissions; failed requests keep the previous value
    pub fn apply_permissions(&mut self, update: PermissionUpdate) {
        if let Some(camera) = update.camera {
            self.permissions.camera = camera;
        }
        if let Some(media_library) = update.media_library {
            self.permissions.media_library = media_library;
        }
        info!(
            camera = ?self.permissions.camera,
            media_library = ?self.permissions.media_library,
            gate = ?self.gate(),
            "Permissions updated"
        );
    }

    /// Latch camera readiness; returns true only the first time
    pub fn mark_camera_ready(&mut self) -> bool {
        if self.camera_ready {
            return false;
        }
        self.camera_ready = true;
        info!("Camera ready");
        true
    }

    fn ensure_preview_idle(&self) -> Result<(), Rejected> {
        if let Some(op) = self.in_flight {
            return Err(Rejected::Busy(op));
        }
        match self.capture {
            CaptureState::Preview => Ok(()),
            CaptureState::Reviewing { .. } => Err(Rejected::NotInPreview),
        }
    }

    pub fn toggle_facing(&mut self) -> Result<Facing, Rejected> {
        self.ensure_preview_idle()?;
        self.settings.facing = self.settings.facing.toggled();
        debug!(facing = %self.settings.facing, "Facing toggled");
        Ok(self.settings.facing)
    }

    pub fn toggle_flash(&mut self) -> Result<FlashMode, Rejected> {
        self.ensure_preview_idle()?;
        self.settings.flash = self.settings.flash.toggled();
        debug!(flash = ?self.settings.flash, "Flash toggled");
        Ok(self.settings.flash)
    }

    /// Start a capture; returns the settings to capture with
    pub fn begin_capture(&mut self) -> Result<CameraSettings, Rejected> {
        self.ensure_preview_idle()?;
        if !self.permissions.camera.is_granted() {
            return Err(Rejected::PermissionMissing(PermissionKind::Camera));
        }
        if !self.camera_ready {
            return Err(Rejected::NotReady);
        }
        self.in_flight = Some(Operation::Capturing);
        Ok(self.settings)
    }

    /// Apply a capture outcome: success moves to review, failure stays in preview
    pub fn finish_capture(&mut self, result: Result<ImageRef, CaptureError>) {
        if self.in_flight == Some(Operation::Capturing) {
            self.in_flight = None;
        }
        match result {
            Ok(image) => {
                info!(image = %image, "Photo captured, reviewing");
                self.capture = CaptureState::Reviewing { image };
            }
            Err(e) => error!(error = %e, "Take picture error"),
        }
    }

    /// Drop the pending image and return to preview
    ///
    /// Returns the discarded image so its file can be cleaned up.
    pub fn retake(&mut self) -> Result<ImageRef, Rejected> {
        if let Some(op) = self.in_flight {
            return Err(Rejected::Busy(op));
        }
        match std::mem::take(&mut self.capture) {
            CaptureState::Reviewing { image } => {
                info!(image = %image, "Retake, image discarded");
                Ok(image)
            }
            CaptureState::Preview => Err(Rejected::NotReviewing),
        }
    }

    /// Start saving the pending image; returns the image to write
    pub fn begin_save(&mut self) -> Result<ImageRef, Rejected> {
        if let Some(op) = self.in_flight {
            return Err(Rejected::Busy(op));
        }
        let image = self.pending_image().cloned().ok_or(Rejected::NotReviewing)?;
        if !self.permissions.media_library.is_granted() {
            return Err(Rejected::PermissionMissing(PermissionKind::MediaLibrary));
        }
        self.in_flight = Some(Operation::Saving);
        Ok(image)
    }

    /// Apply a save outcome
    ///
    /// On success the pending image is cleared and returned; on failure it
    /// stays under review so the user can retry or retake.
    pub fn finish_save(&mut self, result: Result<PathBuf, SaveError>) -> Option<ImageRef> {
        if self.in_flight == Some(Operation::Saving) {
            self.in_flight = None;
        }
        match result {
            Ok(asset) => {
                info!(asset = %asset.display(), "Saved to gallery");
                match std::mem::take(&mut self.capture) {
                    CaptureState::Reviewing { image } => Some(image),
                    CaptureState::Preview => None,
                }
            }
            Err(e) => {
                error!(error = %e, "Save to gallery failed");
                None
            }
        }
    }
}

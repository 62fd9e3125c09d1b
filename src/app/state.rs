// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::backends::camera::{CameraInfo, Frame, ImageRef, V4l2Camera, select_for_facing};
use crate::config::Config;
use crate::errors::{CaptureError, SaveError};
use crate::permissions::PermissionProvider;
use crate::screen::{PermissionUpdate, Screen};
use crate::storage::GalleryWriter;
use cosmic::cosmic_config;
use cosmic::widget::image;
use std::path::PathBuf;
use std::sync::Arc;

/// Main application model
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Kept alive so config changes keep arriving through `watch_config`.
    pub config_handler: Option<cosmic_config::Config>,
    /// Permission gate and capture state machine
    pub screen: Screen,
    pub permissions: Arc<dyn PermissionProvider>,
    pub camera: Arc<V4l2Camera>,
    pub gallery: Arc<dyn GalleryWriter>,
    /// Capture devices found once camera access was granted
    pub cameras: Vec<CameraInfo>,
    /// Latest live frame
    pub preview: Option<image::Handle>,
    /// Captured still under review
    pub review: Option<image::Handle>,
    /// Where pending captures are written
    pub cache_dir: PathBuf,
}

impl AppModel {
    /// Camera matching the current facing, if any was found
    pub fn active_camera(&self) -> Option<&CameraInfo> {
        select_for_facing(&self.cameras, self.screen.settings().facing)
    }

    /// Point capture at the active camera and drop frames from any other
    pub(crate) fn sync_capture_device(&mut self) {
        let path = self.active_camera().map(|camera| camera.path.clone());
        self.camera.select_device(path.as_deref());
        self.preview = None;
    }
}

/// Messages emitted by the application and its widgets
#[derive(Debug, Clone)]
pub enum Message {
    // ===== Permissions =====
    /// A permission pass finished
    PermissionsResolved(PermissionUpdate),
    /// "Grant Permission" pressed on the denied screen
    GrantPermission,

    // ===== Camera =====
    CamerasEnumerated(Vec<CameraInfo>),
    PreviewFrame(Frame),
    SwitchCamera,
    ToggleFlash,

    // ===== Capture =====
    TakePicture,
    CaptureFinished(Result<ImageRef, CaptureError>),
    Retake,
    SaveToGallery,
    SaveFinished(Result<PathBuf, SaveError>),
    /// A temporary capture file was cleaned up
    CaptureDiscarded,

    // ===== System =====
    UpdateConfig(Config),
}

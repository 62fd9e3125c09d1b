// SPDX-License-Identifier: GPL-3.0-only

//! Permission gate handlers
//!
//! Runs the permission flow off the UI thread and enumerates cameras once
//! camera access is granted.

use crate::app::state::{AppModel, Message};
use crate::backends::camera::{CameraInfo, enumerate_cameras};
use crate::errors::{PermissionError, PermissionKind};
use crate::permissions::{PermissionStatus, is_sandboxed, run_permission_flow};
use crate::screen::PermissionUpdate;
use cosmic::Task;
use std::sync::Arc;
use tracing::{error, info, warn};

impl AppModel {
    /// Run one permission pass; `force_camera` re-asks even if already granted
    pub(crate) fn request_permissions(&self, force_camera: bool) -> Task<cosmic::Action<Message>> {
        info!(force_camera, "Requesting permissions");
        let provider = Arc::clone(&self.permissions);

        Task::perform(
            async move {
                tokio::task::spawn_blocking(move || {
                    run_permission_flow(provider.as_ref(), force_camera)
                })
                .await
                .unwrap_or_else(|e| {
                    error!(error = %e, "Permission task failed");
                    PermissionUpdate::default()
                })
            },
            |update| cosmic::Action::App(Message::PermissionsResolved(update)),
        )
    }

    pub(crate) fn handle_permissions_resolved(
        &mut self,
        update: PermissionUpdate,
    ) -> Task<cosmic::Action<Message>> {
        self.screen.apply_permissions(update);
        let permissions = self.screen.permissions();

        if permissions.camera == PermissionStatus::Denied {
            warn!(error = %PermissionError::Denied(PermissionKind::Camera), "Waiting for the user to grant access");
        }
        if permissions.media_library == PermissionStatus::Denied {
            warn!(error = %PermissionError::Denied(PermissionKind::MediaLibrary), "Gallery unavailable");
        }

        if permissions.camera.is_granted() && self.cameras.is_empty() {
            return Task::perform(
                async {
                    tokio::task::spawn_blocking(enumerate_cameras)
                        .await
                        .unwrap_or_else(|e| {
                            error!(error = %e, "Camera enumeration task failed");
                            Vec::new()
                        })
                },
                |cameras| cosmic::Action::App(Message::CamerasEnumerated(cameras)),
            );
        }

        Task::none()
    }

    pub(crate) fn handle_cameras_enumerated(
        &mut self,
        cameras: Vec<CameraInfo>,
    ) -> Task<cosmic::Action<Message>> {
        if cameras.is_empty() && is_sandboxed() {
            warn!(
                "No /dev/video* devices visible in the sandbox; the camera portal grants \
                 PipeWire access only, run with --device=all to use V4L2 capture"
            );
        } else if cameras.is_empty() {
            warn!("No capture devices found, preview will stay empty");
        } else {
            info!(count = cameras.len(), "Cameras available");
        }
        self.cameras = cameras;
        self.sync_capture_device();
        Task::none()
    }
}

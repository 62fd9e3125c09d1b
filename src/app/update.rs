// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function only dispatches; the handling code lives in
//! the `handlers` submodules:
//!
//! - `handlers::permissions`: permission gate and camera enumeration
//! - `handlers::capture`: preview frames, capture, retake, save, toggles
//! - `handlers::system`: configuration changes

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== Permissions =====
            Message::PermissionsResolved(update) => self.handle_permissions_resolved(update),
            Message::GrantPermission => self.request_permissions(true),

            // ===== Camera =====
            Message::CamerasEnumerated(cameras) => self.handle_cameras_enumerated(cameras),
            Message::PreviewFrame(frame) => self.handle_preview_frame(frame),
            Message::SwitchCamera => self.handle_switch_camera(),
            Message::ToggleFlash => self.handle_toggle_flash(),

            // ===== Capture =====
            Message::TakePicture => self.handle_take_picture(),
            Message::CaptureFinished(result) => self.handle_capture_finished(result),
            Message::Retake => self.handle_retake(),
            Message::SaveToGallery => self.handle_save_to_gallery(),
            Message::SaveFinished(result) => self.handle_save_finished(result),
            Message::CaptureDiscarded => Task::none(),

            // ===== System =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
        }
    }
}

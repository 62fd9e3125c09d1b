// SPDX-License-Identifier: GPL-3.0-only

//! Capture operations handlers
//!
//! Handles preview frames, taking a picture, retake, saving to the gallery
//! and the facing/flash toggles.

use crate::app::state::{AppModel, Message};
use crate::backends::camera::{CameraDevice, Frame, ImageRef};
use crate::errors::{CaptureError, SaveError};
use crate::screen::Rejected;
use crate::storage::discard_capture;
use cosmic::Task;
use cosmic::widget::image;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

impl AppModel {
    pub(crate) fn handle_preview_frame(&mut self, frame: Frame) -> Task<cosmic::Action<Message>> {
        let current = self
            .active_camera()
            .is_some_and(|camera| frame.is_from(&camera.path));
        if !current {
            debug!(device = %frame.device_path, sequence = frame.sequence, "Dropping frame from previous camera");
            return Task::none();
        }

        self.screen.mark_camera_ready();
        self.preview = Some(image::Handle::from_rgba(
            frame.width,
            frame.height,
            frame.rgba.as_ref().clone(),
        ));
        Task::none()
    }

    pub(crate) fn handle_switch_camera(&mut self) -> Task<cosmic::Action<Message>> {
        match self.screen.toggle_facing() {
            Ok(facing) => {
                info!(facing = %facing, "Switching camera");
                self.sync_capture_device();
            }
            Err(reason) => debug!(%reason, "Switch camera ignored"),
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_flash(&mut self) -> Task<cosmic::Action<Message>> {
        match self.screen.toggle_flash() {
            Ok(flash) => info!(?flash, "Flash toggled"),
            Err(reason) => debug!(%reason, "Flash toggle ignored"),
        }
        Task::none()
    }

    pub(crate) fn handle_take_picture(&mut self) -> Task<cosmic::Action<Message>> {
        let settings = match self.screen.begin_capture() {
            Ok(settings) => settings,
            Err(Rejected::NotReady) => {
                info!("Camera not ready yet...");
                return Task::none();
            }
            Err(reason) => {
                debug!(%reason, "Take picture ignored");
                return Task::none();
            }
        };

        let camera = Arc::clone(&self.camera);
        Task::perform(
            async move {
                tokio::task::spawn_blocking(move || camera.capture(settings))
                    .await
                    .unwrap_or_else(|e| Err(CaptureError::Device(e.to_string())))
            },
            |result| cosmic::Action::App(Message::CaptureFinished(result)),
        )
    }

    pub(crate) fn handle_capture_finished(
        &mut self,
        result: Result<ImageRef, CaptureError>,
    ) -> Task<cosmic::Action<Message>> {
        self.screen.finish_capture(result);
        self.review = self
            .screen
            .pending_image()
            .map(|image| image::Handle::from_path(image.path()));
        Task::none()
    }

    pub(crate) fn handle_retake(&mut self) -> Task<cosmic::Action<Message>> {
        match self.screen.retake() {
            Ok(image) => {
                self.review = None;
                self.discard(image)
            }
            Err(reason) => {
                debug!(%reason, "Retake ignored");
                Task::none()
            }
        }
    }

    pub(crate) fn handle_save_to_gallery(&mut self) -> Task<cosmic::Action<Message>> {
        let image = match self.screen.begin_save() {
            Ok(image) => image,
            Err(reason) => {
                debug!(%reason, "Save ignored");
                return Task::none();
            }
        };

        let gallery = Arc::clone(&self.gallery);
        Task::perform(
            async move {
                tokio::task::spawn_blocking(move || gallery.create_asset(&image))
                    .await
                    .unwrap_or_else(|e| Err(SaveError::Io(e.to_string())))
            },
            |result| cosmic::Action::App(Message::SaveFinished(result)),
        )
    }

    pub(crate) fn handle_save_finished(
        &mut self,
        result: Result<PathBuf, SaveError>,
    ) -> Task<cosmic::Action<Message>> {
        match self.screen.finish_save(result) {
            Some(image) => {
                self.review = None;
                self.discard(image)
            }
            None => Task::none(),
        }
    }

    /// Delete a capture that is no longer pending
    fn discard(&self, image: ImageRef) -> Task<cosmic::Action<Message>> {
        let cache_dir = self.cache_dir.clone();
        Task::perform(discard_capture(image, cache_dir), |_| {
            cosmic::Action::App(Message::CaptureDiscarded)
        })
    }
}


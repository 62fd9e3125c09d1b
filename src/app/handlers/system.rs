// SPDX-License-Identifier: GPL-3.0-only

//! System handlers
//!
//! Handles configuration changes pushed by cosmic-config.

use crate::app::state::{AppModel, Message};
use crate::config::Config;
use crate::permissions::SystemPermissions;
use crate::storage::{PicturesGallery, gallery_directory};
use cosmic::Task;
use std::sync::Arc;
use tracing::info;

impl AppModel {
    pub(crate) fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        if config == self.config {
            return Task::none();
        }
        info!(?config, "Configuration changed");

        self.camera.set_jpeg_quality(config.jpeg_quality);

        let album_changed = config.album_name != self.config.album_name;
        self.config = config;

        if !album_changed {
            return Task::none();
        }

        // A new album is a new media library location; ask for it again
        let dir = gallery_directory(&self.config.album_name);
        info!(path = %dir.display(), "Gallery album moved");
        self.gallery = Arc::new(PicturesGallery::new(dir.clone()));
        self.permissions = Arc::new(SystemPermissions::new(dir));
        self.request_permissions(false)
    }
}

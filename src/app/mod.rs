// SPDX-License-Identifier: GPL-3.0-only

//! Main application module
//!
//! Wires the [`Screen`](crate::screen::Screen) state machine to libcosmic:
//! messages come in through `update`, external calls go out as `Task`s and
//! the live preview runs as a `Subscription`.
//!
//! # Architecture
//!
//! - `state`: `AppModel` and `Message`
//! - `update`: message dispatch
//! - `handlers`: permission, capture and config handlers
//! - `view`: gate screens, preview and review layouts

mod handlers;
mod state;
mod update;
mod view;

use crate::backends::camera::v4l2::{PreviewRequest, StopOnDrop, preview_loop};
use crate::backends::camera::V4l2Camera;
use crate::config::Config;
use crate::constants::{camera, timing};
use crate::fl;
use crate::permissions::SystemPermissions;
use crate::screen::{Gate, Screen};
use crate::storage::{PicturesGallery, capture_cache_directory, gallery_directory};
use cosmic::iced::Subscription;
use cosmic::{ApplicationExt, Element, Task};
pub use state::{AppModel, Message};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tracing::{error, info, warn};

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.quickcam.QuickCam";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application and starts the permission flow.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let (config_handler, config) = Config::load(Self::APP_ID);

        let gallery_dir = gallery_directory(&config.album_name);
        let cache_dir = capture_cache_directory();
        info!(
            gallery = %gallery_dir.display(),
            cache = %cache_dir.display(),
            "Storage locations"
        );

        let mut app = AppModel {
            core,
            screen: Screen::new(config.initial_settings()),
            permissions: Arc::new(SystemPermissions::new(gallery_dir.clone())),
            camera: Arc::new(V4l2Camera::new(cache_dir.clone(), config.jpeg_quality)),
            gallery: Arc::new(PicturesGallery::new(gallery_dir)),
            cameras: Vec::new(),
            preview: None,
            review: None,
            cache_dir,
            config,
            config_handler,
        };

        app.set_header_title(fl!("app-title"));

        let task = app.request_permissions(false);
        (app, task)
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        Subscription::batch([config_sub, self.preview_subscription()])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}

impl AppModel {
    /// Live preview of the camera selected for the current facing
    ///
    /// Runs only while both permissions are granted. The subscription ID
    /// carries the device and size, so switching cameras restarts the stream.
    fn preview_subscription(&self) -> Subscription<Message> {
        use cosmic::iced::futures::{SinkExt, StreamExt};

        if self.screen.gate() != Gate::Ready {
            return Subscription::none();
        }

        let facing = self.screen.settings().facing;
        let Some(device) = self.active_camera() else {
            return Subscription::none();
        };

        let (width, height) = self.config.preview_size();
        let request = PreviewRequest::new(device, width, height);
        let slot = self.camera.frame_slot();

        Subscription::run_with_id(
            ("camera-preview", request.clone()),
            cosmic::iced::stream::channel(camera::FRAME_CHANNEL_CAPACITY, move |mut output| async move {
                info!(path = %request.device_path, %facing, "Preview subscription started");

                loop {
                    let running = Arc::new(AtomicBool::new(true));
                    // Stops the capture thread when this future is dropped
                    let stop = StopOnDrop(Arc::clone(&running));

                    let (sender, mut receiver) =
                        futures::channel::mpsc::channel(camera::FRAME_CHANNEL_CAPACITY);
                    let thread_request = request.clone();
                    let thread_slot = Arc::clone(&slot);

                    let spawned = std::thread::Builder::new()
                        .name("quickcam-preview".to_string())
                        .spawn(move || {
                            if let Err(e) =
                                preview_loop(&thread_request, &thread_slot, sender, &running)
                            {
                                error!(error = %e, "Preview stream failed");
                            }
                        });

                    match spawned {
                        Ok(_) => {
                            while let Some(frame) = receiver.next().await {
                                if output.send(Message::PreviewFrame(frame)).await.is_err() {
                                    info!("Preview subscription closed");
                                    return;
                                }
                            }
                        }
                        Err(e) => error!(error = %e, "Failed to spawn preview thread"),
                    }

                    drop(stop);
                    warn!(
                        retry_secs = timing::PREVIEW_RETRY_SECS,
                        "Preview stream stopped, reopening camera"
                    );
                    tokio::time::sleep(std::time::Duration::from_secs(timing::PREVIEW_RETRY_SECS))
                        .await;
                }
            }),
        )
    }
}

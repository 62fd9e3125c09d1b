// SPDX-License-Identifier: GPL-3.0-only

//! QuickCam - a single-screen camera for the COSMIC desktop
//!
//! Gates a live preview behind camera and media library permissions, takes a
//! still picture, and lets the user retake it or save it to the gallery.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`screen`]: Permission gate and capture state machine
//! - [`permissions`]: Camera and media library permission providers
//! - [`backends`]: V4L2 camera enumeration, preview and capture
//! - [`storage`]: Gallery writer and capture cache
//! - [`flash`]: Flash LED control
//! - [`app`]: libcosmic application and UI
//! - [`config`]: User configuration handling
//!
//! # Example
//!
//! ```ignore
//! // This is a GUI application, typically run via:
//! // quickcam
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod flash;
pub mod i18n;
pub mod permissions;
pub mod screen;
pub mod storage;

// Re-export commonly used types
pub use app::{AppModel, Message};
pub use config::Config;
pub use screen::{CaptureState, Gate, Screen};

// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer for hardware access
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          App layer (Screen, AppModel)        │
//! └──────────────────────┬───────────────────────┘
//!                        │  CameraDevice trait
//! ┌──────────────────────┴───────────────────────┐
//! │      Camera backend (V4L2 preview, capture)  │
//! └──────────────────────────────────────────────┘
//! ```

pub mod camera;

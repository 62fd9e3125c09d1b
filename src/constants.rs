// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// UI Constants
pub mod ui {
    /// Minimum window width
    pub const MIN_WINDOW_WIDTH: f32 = 360.0;

    /// Minimum window height
    pub const MIN_WINDOW_HEIGHT: f32 = 480.0;

    /// Spacing between the control buttons below the preview
    pub const CONTROLS_SPACING: u16 = 10;

    /// Padding around the control row
    pub const CONTROLS_PADDING: u16 = 10;

    /// Overlay button/container background transparency (0.0 = transparent, 1.0 = opaque)
    pub const OVERLAY_BACKGROUND_ALPHA: f32 = 0.4;
}

/// Camera backend constants
pub mod camera {
    /// Pixel format requested from V4L2 devices
    pub const PREFERRED_FOURCC: &[u8; 4] = b"MJPG";

    /// Number of memory-mapped buffers for the preview stream
    pub const STREAM_BUFFERS: u32 = 4;

    /// Frames buffered between the capture thread and the UI
    pub const FRAME_CHANNEL_CAPACITY: usize = 2;

    /// Default preview width when the configuration asks for none
    pub const DEFAULT_WIDTH: u32 = 1280;

    /// Default preview height when the configuration asks for none
    pub const DEFAULT_HEIGHT: u32 = 720;

    /// Default JPEG quality for captured stills
    pub const DEFAULT_JPEG_QUALITY: u8 = 92;

    /// Consecutive failed dequeues before the preview stream gives up
    pub const MAX_DEQUEUE_ERRORS: u32 = 20;

    /// Prefix for temporary capture files in the cache directory
    pub const CAPTURE_FILE_PREFIX: &str = "capture-";
}

/// Timing constants
pub mod timing {
    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 30;

    /// How long the flash LED stays lit before the frame is taken
    pub const FLASH_SETTLE_MS: u64 = 250;

    /// Delay before reopening the device after the preview stream failed
    pub const PREVIEW_RETRY_SECS: u64 = 3;

    /// Back-off after a failed dequeue on the preview stream
    pub const DEQUEUE_RETRY_MS: u64 = 10;
}

/// Gallery constants
pub mod gallery {
    /// Album directory created under the user's pictures directory
    pub const DEFAULT_ALBUM: &str = "quickcam";

    /// Extension of saved photos
    pub const PHOTO_EXTENSION: &str = "jpg";
}

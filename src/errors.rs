// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the camera screen
//!
//! Every external call (permission prompt, capture, gallery write) reports
//! one of these. Callers log them and keep the screen state unchanged.

use std::fmt;

/// Which permission a request or denial refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionKind {
    Camera,
    MediaLibrary,
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionKind::Camera => write!(f, "camera"),
            PermissionKind::MediaLibrary => write!(f, "media library"),
        }
    }
}

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Permission request errors
    Permission(PermissionError),
    /// Photo capture errors
    Capture(CaptureError),
    /// Gallery write errors
    Save(SaveError),
    /// Configuration errors
    Config(String),
}

/// Permission request errors
#[derive(Debug, Clone)]
pub enum PermissionError {
    /// The user or the system refused access
    Denied(PermissionKind),
    /// The XDG desktop portal could not be reached or answered garbage
    Portal(String),
    /// Probing a device node or directory failed unexpectedly
    Probe(String),
}

/// Photo capture errors
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// No frame available for capture
    NoFrame,
    /// Device-level failure (open, stream, flash)
    Device(String),
    /// Encoding or writing the captured frame failed
    Encoding(String),
}

/// Gallery write errors
#[derive(Debug, Clone)]
pub enum SaveError {
    /// Copying into the gallery failed
    Io(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Permission(e) => write!(f, "Permission error: {}", e),
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Save(e) => write!(f, "Save error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl fmt::Display for PermissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionError::Denied(kind) => write!(f, "Access to {} denied", kind),
            PermissionError::Portal(msg) => write!(f, "Desktop portal error: {}", msg),
            PermissionError::Probe(msg) => write!(f, "Permission probe failed: {}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::NoFrame => write!(f, "No frame available for capture"),
            CaptureError::Device(msg) => write!(f, "Camera device error: {}", msg),
            CaptureError::Encoding(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(msg) => write!(f, "Failed to write to gallery: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for PermissionError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for SaveError {}

impl From<PermissionError> for AppError {
    fn from(err: PermissionError) -> Self {
        AppError::Permission(err)
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<SaveError> for AppError {
    fn from(err: SaveError) -> Self {
        AppError::Save(err)
    }
}

impl From<std::io::Error> for SaveError {
    fn from(err: std::io::Error) -> Self {
        SaveError::Io(err.to_string())
    }
}

impl From<zbus::Error> for PermissionError {
    fn from(err: zbus::Error) -> Self {
        PermissionError::Portal(err.to_string())
    }
}

impl From<image::ImageError> for CaptureError {
    fn from(err: image::ImageError) -> Self {
        CaptureError::Encoding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_becomes_save_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: SaveError = io.into();
        assert!(matches!(err, SaveError::Io(ref msg) if msg.contains("read-only")));
    }

    #[test]
    fn test_app_error_wraps_context() {
        let err: AppError = PermissionError::Denied(PermissionKind::MediaLibrary).into();
        assert_eq!(
            err.to_string(),
            "Permission error: Access to media library denied"
        );

        let err: AppError = CaptureError::NoFrame.into();
        assert_eq!(err.to_string(), "Capture error: No frame available for capture");
    }
}

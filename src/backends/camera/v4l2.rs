// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera: preview streaming and still capture
//!
//! The preview thread owns the device and publishes every decoded frame to a
//! shared [`FrameSlot`]. Capturing a still takes the latest frame from that
//! slot, so the device is never opened twice.

use super::format_converters::buffer_to_rgba;
use super::types::{CameraInfo, CameraSettings, Frame, FrameSlot, ImageRef};
use super::CameraDevice;
use crate::constants::{camera, timing};
use crate::errors::CaptureError;
use crate::flash;
use futures::channel::mpsc;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use v4l::FourCC;
use v4l::buffer::Type;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;

/// What the preview thread should open
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewRequest {
    pub device_path: String,
    pub width: u32,
    pub height: u32,
}

impl PreviewRequest {
    pub fn new(device: &CameraInfo, width: u32, height: u32) -> Self {
        Self {
            device_path: device.path.clone(),
            width,
            height,
        }
    }
}

/// Clears the running flag when dropped, stopping the preview thread
pub struct StopOnDrop(pub Arc<AtomicBool>);

impl Drop for StopOnDrop {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Camera backed by the V4L2 preview stream
pub struct V4l2Camera {
    frames: FrameSlot,
    /// Device whose frames may be captured
    active_device: Mutex<Option<String>>,
    cache_dir: PathBuf,
    jpeg_quality: AtomicU8,
}

impl V4l2Camera {
    /// `cache_dir` receives the temporary capture files
    pub fn new(cache_dir: PathBuf, jpeg_quality: u8) -> Self {
        Self {
            frames: Arc::new(Mutex::new(None)),
            active_device: Mutex::new(None),
            cache_dir,
            jpeg_quality: AtomicU8::new(jpeg_quality),
        }
    }

    /// Slot the preview thread writes into
    pub fn frame_slot(&self) -> FrameSlot {
        Arc::clone(&self.frames)
    }

    pub fn set_jpeg_quality(&self, quality: u8) {
        self.jpeg_quality.store(quality.clamp(1, 100), Ordering::Relaxed);
    }

    /// Switch to `device_path` and forget the last frame
    ///
    /// Frames still arriving from any other device are refused by capture.
    pub fn select_device(&self, device_path: Option<&str>) {
        if let Ok(mut active) = self.active_device.lock() {
            *active = device_path.map(str::to_string);
        }
        if let Ok(mut slot) = self.frames.lock() {
            *slot = None;
        }
        debug!(device = ?device_path, "Capture device selected");
    }

    fn latest_frame(&self) -> Result<Frame, CaptureError> {
        let active = self
            .active_device
            .lock()
            .map_err(|_| CaptureError::Device("active device poisoned".to_string()))?
            .clone()
            .ok_or(CaptureError::NoFrame)?;
        let slot = self
            .frames
            .lock()
            .map_err(|_| CaptureError::Device("frame slot poisoned".to_string()))?;

        match slot.as_ref() {
            Some(frame) if frame.is_from(&active) => Ok(frame.clone()),
            Some(frame) => {
                warn!(frame_device = %frame.device_path, active = %active, "Ignoring frame from previous camera");
                Err(CaptureError::NoFrame)
            }
            None => Err(CaptureError::NoFrame),
        }
    }

    fn capture_with_flash(&self, devices: &[flash::FlashDevice]) -> Result<Frame, CaptureError> {
        flash::all_on(devices);
        let lit_after = Instant::now();
        std::thread::sleep(Duration::from_millis(timing::FLASH_SETTLE_MS));
        let frame = self.latest_frame();
        flash::all_off(devices);

        let frame = frame?;
        if frame.captured_at < lit_after {
            warn!("No frame arrived while the flash was lit, using the last one");
        }
        Ok(frame)
    }

    fn write_jpeg(&self, frame: &Frame) -> Result<ImageRef, CaptureError> {
        let rgba = image::RgbaImage::from_raw(frame.width, frame.height, frame.rgba.to_vec())
            .ok_or_else(|| {
                CaptureError::Encoding(format!(
                    "frame buffer does not match {}x{}",
                    frame.width, frame.height
                ))
            })?;
        let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();

        let quality = self.jpeg_quality.load(Ordering::Relaxed);
        let mut jpeg = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, quality).encode(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )?;

        std::fs::create_dir_all(&self.cache_dir)
            .map_err(|e| CaptureError::Encoding(format!("cannot create cache dir: {}", e)))?;
        let path = self.cache_dir.join(format!(
            "{}{}.jpg",
            camera::CAPTURE_FILE_PREFIX,
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, &jpeg)
            .map_err(|e| CaptureError::Encoding(format!("cannot write capture: {}", e)))?;

        info!(path = %path.display(), bytes = jpeg.len(), quality, "Still written");
        Ok(ImageRef::new(path))
    }
}

impl CameraDevice for V4l2Camera {
    fn capture(&self, settings: CameraSettings) -> Result<ImageRef, CaptureError> {
        info!(facing = %settings.facing, flash = ?settings.flash, "Capturing still");

        let frame = if settings.flash.is_on() {
            let devices = flash::detect();
            if devices.is_empty() {
                warn!("Flash requested but no controllable flash LED, capturing without");
                self.latest_frame()?
            } else {
                self.capture_with_flash(&devices)?
            }
        } else {
            self.latest_frame()?
        };

        debug!(sequence = frame.sequence, device = %frame.device_path, "Using preview frame");
        self.write_jpeg(&frame)
    }
}

/// Counts consecutive failed dequeues
///
/// A vanished device (e.g. an unplugged USB camera) fails every dequeue; the
/// stream is abandoned once the limit is hit so it can be reopened.
#[derive(Debug, Default)]
struct DequeueFailures {
    consecutive: u32,
}

impl DequeueFailures {
    /// Record a failure; true once the limit is reached
    fn record(&mut self) -> bool {
        self.consecutive += 1;
        self.consecutive >= camera::MAX_DEQUEUE_ERRORS
    }

    fn reset(&mut self) {
        self.consecutive = 0;
    }
}

/// Open the device and stream frames until `running` is cleared or the
/// receiver goes away
///
/// Every frame lands in `slot`; the UI copy is sent with `try_send` so a busy
/// UI drops frames instead of stalling the device.
pub fn preview_loop(
    request: &PreviewRequest,
    slot: &FrameSlot,
    mut sender: mpsc::Sender<Frame>,
    running: &AtomicBool,
) -> Result<(), CaptureError> {
    info!(path = %request.device_path, width = request.width, height = request.height, "Opening camera");

    let dev = Device::with_path(&request.device_path)
        .map_err(|e| CaptureError::Device(format!("open {}: {}", request.device_path, e)))?;

    let mut format = dev
        .format()
        .map_err(|e| CaptureError::Device(format!("query format: {}", e)))?;
    format.width = request.width;
    format.height = request.height;
    format.fourcc = FourCC::new(camera::PREFERRED_FOURCC);

    let format = match dev.set_format(&format) {
        Ok(f) => f,
        Err(e) => {
            warn!(error = %e, "Could not set format, using current device format");
            dev.format()
                .map_err(|e| CaptureError::Device(format!("query format: {}", e)))?
        }
    };
    info!(width = format.width, height = format.height, fourcc = %format.fourcc, "Negotiated format");

    let mut stream = MmapStream::with_buffers(&dev, Type::VideoCapture, camera::STREAM_BUFFERS)
        .map_err(|e| CaptureError::Device(format!("create buffer stream: {}", e)))?;

    let device_path: Arc<str> = Arc::from(request.device_path.as_str());
    let mut failures = DequeueFailures::default();
    let mut frame_count = 0u64;
    while running.load(Ordering::Acquire) {
        let (buf, meta) = match stream.next() {
            Ok(next) => next,
            Err(e) => {
                if failures.record() {
                    return Err(CaptureError::Device(format!(
                        "dequeue failed {} times in a row: {}",
                        camera::MAX_DEQUEUE_ERRORS,
                        e
                    )));
                }
                warn!(error = %e, "Failed to dequeue frame");
                std::thread::sleep(Duration::from_millis(timing::DEQUEUE_RETRY_MS));
                continue;
            }
        };
        failures.reset();
        let captured_at = Instant::now();

        let used = match meta.bytesused as usize {
            0 => buf.len(),
            n => n.min(buf.len()),
        };
        let decoded = match buffer_to_rgba(&buf[..used], format.fourcc, format.width, format.height) {
            Ok(decoded) => decoded,
            Err(e) => {
                // Corrupt MJPG frames happen on USB hiccups; skip them
                debug!(error = %e, sequence = meta.sequence, "Dropping undecodable frame");
                continue;
            }
        };

        let frame = Frame {
            width: decoded.width,
            height: decoded.height,
            rgba: Arc::new(decoded.rgba),
            sequence: meta.sequence,
            captured_at,
            device_path: Arc::clone(&device_path),
        };

        // The subscription may have moved on while this thread was blocked
        if !running.load(Ordering::Acquire) {
            break;
        }
        if let Ok(mut latest) = slot.lock() {
            *latest = Some(frame.clone());
        }

        frame_count += 1;
        if frame_count % timing::FRAME_LOG_INTERVAL == 0 {
            debug!(frame = frame_count, sequence = meta.sequence, "Preview frame");
        }

        if let Err(e) = sender.try_send(frame) {
            if e.is_disconnected() {
                info!("Preview receiver gone, stopping stream");
                break;
            }
        }
    }

    info!(path = %request.device_path, frames = frame_count, "Preview stream ended");
    Ok(())
}

// SPDX-License-Identifier: GPL-3.0-only

//! Pixel format conversion for V4L2 preview buffers

use crate::errors::CaptureError;
use v4l::FourCC;

/// A decoded buffer with the dimensions it actually has
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaBuffer {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decode one V4L2 buffer into tightly packed RGBA8
///
/// Supports the two formats virtually every UVC webcam offers: MJPG and YUYV.
/// MJPG frames keep the size encoded in the JPEG; YUYV buffers shorter than
/// `width * height * 2` are rejected.
pub fn buffer_to_rgba(
    data: &[u8],
    fourcc: FourCC,
    width: u32,
    height: u32,
) -> Result<RgbaBuffer, CaptureError> {
    match &fourcc.repr {
        b"MJPG" | b"JPEG" => {
            let img = image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)?;
            Ok(RgbaBuffer {
                width: img.width(),
                height: img.height(),
                rgba: img.to_rgba8().into_raw(),
            })
        }
        b"YUYV" => {
            let expected = width as usize * height as usize * 2;
            if data.len() < expected {
                return Err(CaptureError::Device(format!(
                    "YUYV buffer too short: {} bytes, expected {} for {}x{}",
                    data.len(),
                    expected,
                    width,
                    height
                )));
            }
            Ok(RgbaBuffer {
                width,
                height,
                rgba: yuyv_to_rgba(data, width, height),
            })
        }
        other => Err(CaptureError::Device(format!(
            "unsupported pixel format {}",
            String::from_utf8_lossy(other)
        ))),
    }
}

/// Convert YUYV (YUV 4:2:2) to RGBA
///
/// YUYV format: Y0 U0 Y1 V0 - each 4-byte group encodes 2 pixels.
/// Uses BT.601 coefficients.
pub fn yuyv_to_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let pixel_count = (width * height) as usize;
    let mut rgba = Vec::with_capacity(pixel_count * 4);

    for chunk in data.chunks_exact(4) {
        let y0 = chunk[0] as f32;
        let u = chunk[1] as f32 - 128.0;
        let y1 = chunk[2] as f32;
        let v = chunk[3] as f32 - 128.0;

        for y in [y0, y1] {
            if rgba.len() >= pixel_count * 4 {
                break;
            }
            rgba.push((y + 1.402 * v).clamp(0.0, 255.0) as u8);
            rgba.push((y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8);
            rgba.push((y + 1.772 * u).clamp(0.0, 255.0) as u8);
            rgba.push(255);
        }
    }

    rgba
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuyv_white() {
        let yuyv = vec![255u8, 128, 255, 128];
        let rgba = yuyv_to_rgba(&yuyv, 2, 1);

        assert_eq!(rgba.len(), 8);
        assert!(rgba[0] > 250);
        assert!(rgba[1] > 250);
        assert!(rgba[2] > 250);
        assert_eq!(rgba[3], 255);
        assert_eq!(rgba[7], 255);
    }

    #[test]
    fn test_yuyv_truncates_to_frame_size() {
        // Drivers may pad the buffer beyond width * height * 2
        let yuyv = vec![16u8, 128, 16, 128, 16, 128, 16, 128];
        let rgba = yuyv_to_rgba(&yuyv, 2, 1);
        assert_eq!(rgba.len(), 8);
    }

    #[test]
    fn test_mjpg_round_trips_through_decoder() {
        let img = image::RgbImage::from_pixel(4, 2, image::Rgb([200, 10, 10]));
        let mut jpeg = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, 95)
            .encode(img.as_raw(), 4, 2, image::ExtendedColorType::Rgb8)
            .unwrap();

        let decoded = buffer_to_rgba(&jpeg, FourCC::new(b"MJPG"), 4, 2).unwrap();
        assert_eq!((decoded.width, decoded.height), (4, 2));
        assert_eq!(decoded.rgba.len(), 4 * 2 * 4);
        assert!(decoded.rgba[0] > 150);
        assert_eq!(decoded.rgba[3], 255);
    }

    #[test]
    fn test_mjpg_keeps_encoded_size() {
        // Some cameras deliver MJPG at a different size than negotiated
        let img = image::RgbImage::from_pixel(6, 4, image::Rgb([10, 200, 10]));
        let mut jpeg = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, 90)
            .encode(img.as_raw(), 6, 4, image::ExtendedColorType::Rgb8)
            .unwrap();

        let decoded = buffer_to_rgba(&jpeg, FourCC::new(b"MJPG"), 1280, 720).unwrap();
        assert_eq!((decoded.width, decoded.height), (6, 4));
        assert_eq!(decoded.rgba.len(), 6 * 4 * 4);
    }

    #[test]
    fn test_short_yuyv_buffer_rejected() {
        let result = buffer_to_rgba(&[128u8; 8], FourCC::new(b"YUYV"), 4, 4);
        assert!(matches!(result, Err(CaptureError::Device(_))));
    }

    #[test]
    fn test_full_yuyv_buffer_fills_frame() {
        let decoded = buffer_to_rgba(&[128u8; 32], FourCC::new(b"YUYV"), 4, 4).unwrap();
        assert_eq!(decoded.rgba.len(), 4 * 4 * 4);
    }

    #[test]
    fn test_unsupported_format() {
        let result = buffer_to_rgba(&[0; 16], FourCC::new(b"GRBG"), 2, 2);
        assert!(matches!(result, Err(CaptureError::Device(_))));
    }
}

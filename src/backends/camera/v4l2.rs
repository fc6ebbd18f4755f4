// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera backend
//!
//! Single-shot capture: the device is opened and configured up front, and a
//! short-lived memory-mapped stream is created per snapshot. A few warm-up
//! frames are discarded so exposure can settle before the kept frame.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use v4l::buffer::Type;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;

use super::select_device;
use super::types::{
    BackendError, BackendResult, CameraBackend, CameraDescriptor, CameraFrame, CameraStream,
    StreamRequest,
};
use crate::constants::capture;

/// Backend enumerating and opening V4L2 capture devices
#[derive(Debug, Default)]
pub struct V4l2Backend;

impl V4l2Backend {
    pub fn new() -> Self {
        Self
    }
}

impl CameraBackend for V4l2Backend {
    fn enumerate(&self) -> Vec<CameraDescriptor> {
        // Scan /dev/video* devices
        let mut paths: Vec<_> = std::fs::read_dir("/dev")
            .into_iter()
            .flatten()
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with("video"))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        paths
            .into_iter()
            .filter_map(|path| {
                let dev = Device::with_path(&path).ok()?;
                let caps = dev.query_caps().ok()?;
                // Metadata nodes share the card string; only keep nodes that
                // actually expose capture formats.
                let formats = dev.enum_formats().ok()?;
                if formats.is_empty() {
                    return None;
                }
                let name = caps.card;
                let location = CameraDescriptor::infer_location(&name);
                Some(CameraDescriptor {
                    name,
                    path: path.to_string_lossy().to_string(),
                    location,
                })
            })
            .collect()
    }

    fn open(&self, request: &StreamRequest) -> BackendResult<Box<dyn CameraStream>> {
        let devices = self.enumerate();
        let descriptor = select_device(&devices, request)
            .cloned()
            .ok_or(BackendError::NoMatchingDevice)?;
        let stream = V4l2Stream::open(descriptor, request)?;
        Ok(Box::new(stream))
    }
}

/// An opened V4L2 device configured for capture
pub struct V4l2Stream {
    descriptor: CameraDescriptor,
    device: Option<Device>,
    width: u32,
    height: u32,
    fourcc: [u8; 4],
}

impl V4l2Stream {
    fn open(descriptor: CameraDescriptor, request: &StreamRequest) -> BackendResult<Self> {
        let dev = Device::with_path(&descriptor.path).map_err(|e| {
            BackendError::InitializationFailed(format!("{}: {}", descriptor.path, e))
        })?;

        let mut format = dev
            .format()
            .map_err(|e| BackendError::InitializationFailed(format!("query format: {}", e)))?;
        format.width = request.width;
        format.height = request.height;

        // MJPG first (decodable with the image crate), YUYV as the common
        // raw fallback; whatever the driver negotiates is accepted.
        format.fourcc = v4l::FourCC::new(b"MJPG");
        let negotiated = match dev.set_format(&format) {
            Ok(f) if f.fourcc == v4l::FourCC::new(b"MJPG") => f,
            _ => {
                format.fourcc = v4l::FourCC::new(b"YUYV");
                dev.set_format(&format).map_err(|e| {
                    BackendError::InitializationFailed(format!("set format: {}", e))
                })?
            }
        };

        info!(
            device = %descriptor.name,
            width = negotiated.width,
            height = negotiated.height,
            fourcc = ?negotiated.fourcc,
            "Configured V4L2 capture"
        );

        if negotiated.width != request.width || negotiated.height != request.height {
            debug!(
                requested_width = request.width,
                requested_height = request.height,
                "Preferred resolution unavailable, using negotiated format"
            );
        }

        Ok(Self {
            descriptor,
            device: Some(dev),
            width: negotiated.width,
            height: negotiated.height,
            fourcc: negotiated.fourcc.repr,
        })
    }
}

impl CameraStream for V4l2Stream {
    fn descriptor(&self) -> &CameraDescriptor {
        &self.descriptor
    }

    fn capture_frame(&mut self) -> BackendResult<CameraFrame> {
        let device = self
            .device
            .as_mut()
            .ok_or_else(|| BackendError::CaptureFailed("stream is closed".into()))?;

        let mut stream = MmapStream::with_buffers(device, Type::VideoCapture, 4)
            .map_err(|e| BackendError::CaptureFailed(format!("buffer stream: {}", e)))?;

        let deadline = Instant::now() + Duration::from_secs(capture::FRAME_TIMEOUT_SECS);
        let mut skipped = 0usize;
        let raw = loop {
            if Instant::now() >= deadline {
                return Err(BackendError::CaptureFailed(
                    "timed out waiting for a frame".into(),
                ));
            }
            let (buf, _meta) = stream
                .next()
                .map_err(|e| BackendError::CaptureFailed(e.to_string()))?;
            if skipped < capture::WARMUP_FRAMES {
                skipped += 1;
                continue;
            }
            break buf.to_vec();
        };

        let captured_at = Instant::now();
        let (width, height, rgba) = convert_to_rgba(&raw, self.width, self.height, &self.fourcc)?;
        Ok(CameraFrame {
            width,
            height,
            data: Arc::from(rgba.into_boxed_slice()),
            captured_at,
        })
    }

    fn close(&mut self) {
        if self.device.take().is_some() {
            debug!(device = %self.descriptor.name, "Released V4L2 device");
        }
    }

    fn is_open(&self) -> bool {
        self.device.is_some()
    }
}

/// Convert a raw capture buffer to tightly packed RGBA
fn convert_to_rgba(
    data: &[u8],
    width: u32,
    height: u32,
    fourcc: &[u8; 4],
) -> BackendResult<(u32, u32, Vec<u8>)> {
    match fourcc {
        b"MJPG" | b"JPEG" => {
            let img = image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)
                .map_err(|e| BackendError::CaptureFailed(format!("MJPEG decode: {}", e)))?;
            let rgba = img.to_rgba8();
            let (w, h) = (rgba.width(), rgba.height());
            Ok((w, h, rgba.into_raw()))
        }
        b"YUYV" => Ok((width, height, yuyv_to_rgba(data, width, height))),
        b"RGB3" => {
            let mut rgba = Vec::with_capacity((width * height * 4) as usize);
            for px in data.chunks_exact(3).take((width * height) as usize) {
                rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
            Ok((width, height, rgba))
        }
        other => {
            warn!(fourcc = ?other, "Unsupported pixel format");
            Err(BackendError::CaptureFailed(format!(
                "unsupported pixel format {:?}",
                String::from_utf8_lossy(other)
            )))
        }
    }
}

/// Convert YUYV (YUV 4:2:2) to RGBA
///
/// YUYV format: Y0 U Y1 V - each 4-byte group encodes 2 pixels.
/// Uses BT.601 coefficients for YUV to RGB conversion.
pub fn yuyv_to_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let pixel_count = (width * height) as usize;
    let mut rgba = Vec::with_capacity(pixel_count * 4);

    for chunk in data.chunks_exact(4) {
        let y0 = chunk[0] as f32;
        let u = chunk[1] as f32 - 128.0;
        let y1 = chunk[2] as f32;
        let v = chunk[3] as f32 - 128.0;

        for y in [y0, y1] {
            let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
            let g = (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8;
            let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;

            rgba.push(r);
            rgba.push(g);
            rgba.push(b);
            rgba.push(255);

            if rgba.len() >= pixel_count * 4 {
                break;
            }
        }
        if rgba.len() >= pixel_count * 4 {
            break;
        }
    }

    rgba
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yuyv_grey_stays_grey() {
        // Y=128, U=V=128 is mid grey with no chroma
        let data = [128u8, 128, 128, 128];
        let rgba = yuyv_to_rgba(&data, 2, 1);
        assert_eq!(rgba.len(), 8);
        assert_eq!(&rgba[0..4], &[128, 128, 128, 255]);
        assert_eq!(&rgba[4..8], &[128, 128, 128, 255]);
    }

    #[test]
    fn yuyv_output_is_bounded_by_pixel_count() {
        let data = [0u8; 16];
        let rgba = yuyv_to_rgba(&data, 2, 1);
        assert_eq!(rgba.len(), 2 * 4);
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Media acquisition: turning uploaded files and camera frames into photos

use image::RgbaImage;
use tracing::debug;

use crate::backends::camera::types::CameraFrame;
use crate::errors::PhotoError;

/// A decoded photo, ready for compositing
///
/// Owned by the flow for the duration of the preview state and replaced
/// wholesale, never mutated in place.
#[derive(Debug, Clone)]
pub struct RawPhoto {
    pub image: RgbaImage,
}

impl RawPhoto {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Decode a user-provided image file into a photo.
///
/// Decoding is CPU-bound, so it runs on the blocking pool. Any decode
/// failure is recoverable; the caller tells the user to try another file.
pub async fn decode_photo(bytes: Vec<u8>) -> Result<RawPhoto, PhotoError> {
    tokio::task::spawn_blocking(move || decode_photo_blocking(&bytes))
        .await
        .map_err(|e| PhotoError::Decode(format!("decode task error: {}", e)))?
}

/// Synchronous decode, for callers already off the async runtime
pub fn decode_photo_blocking(bytes: &[u8]) -> Result<RawPhoto, PhotoError> {
    let img = image::load_from_memory(bytes).map_err(|e| PhotoError::Decode(e.to_string()))?;
    let image = img.to_rgba8();
    debug!(width = image.width(), height = image.height(), "Decoded photo");
    Ok(RawPhoto { image })
}

/// Turn a captured camera frame into a photo at the stream's native
/// resolution.
///
/// `mirror` undoes the selfie preview's horizontal flip so text and
/// orientation in the output match what was physically photographed. It is
/// applied here, exactly once; the compositor never mirrors.
pub fn photo_from_frame(frame: &CameraFrame, mirror: bool) -> Result<RawPhoto, PhotoError> {
    let image = RgbaImage::from_raw(frame.width, frame.height, frame.data.to_vec())
        .ok_or_else(|| {
            PhotoError::Decode(format!(
                "frame buffer size mismatch: {}x{} with {} bytes",
                frame.width,
                frame.height,
                frame.data.len()
            ))
        })?;

    let image = if mirror {
        image::imageops::flip_horizontal(&image)
    } else {
        image
    };

    Ok(RawPhoto { image })
}

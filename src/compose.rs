// SPDX-License-Identifier: GPL-3.0-only

//! Compositing a photo beneath a decorative overlay frame
//!
//! The photo is scale-to-cover fitted and centered on a fixed-size canvas,
//! then the overlay is drawn on top stretched to exactly the canvas size.
//! The overlay carries its own transparent cut-out, so it is always drawn
//! unconditionally.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::{Rgba, RgbaImage, imageops};
use tracing::debug;

use crate::errors::PhotoError;
use crate::media::RawPhoto;

/// The final rendered image, PNG-encoded
///
/// Never mutated after creation; regenerated wholesale if inputs change.
#[derive(Debug, Clone)]
pub struct CompositeArtifact {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl CompositeArtifact {
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Self-describing data URI carrying the artifact, as the gallery
    /// endpoint expects it
    pub fn to_data_uri(&self) -> String {
        format!("data:image/png;base64,{}", BASE64.encode(&self.png))
    }
}

/// Placement of a photo cover-fitted onto an output canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    pub scale: f64,
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub offset_x: i64,
    pub offset_y: i64,
}

/// Compute the cover fit: the photo is scaled until it fully covers the
/// canvas (never letterboxed) and centered, cropping any excess
/// symmetrically.
pub fn cover_fit(photo_w: u32, photo_h: u32, out_w: u32, out_h: u32) -> CoverFit {
    let h_ratio = out_w as f64 / photo_w as f64;
    let v_ratio = out_h as f64 / photo_h as f64;
    let scale = h_ratio.max(v_ratio);

    // clamp to at least the canvas so rounding can never leave an
    // uncovered strip at an edge
    let scaled_width = ((photo_w as f64 * scale).round() as u32).max(out_w);
    let scaled_height = ((photo_h as f64 * scale).round() as u32).max(out_h);

    let offset_x = ((out_w as f64 - scaled_width as f64) / 2.0).round() as i64;
    let offset_y = ((out_h as f64 - scaled_height as f64) / 2.0).round() as i64;

    CoverFit {
        scale,
        scaled_width,
        scaled_height,
        offset_x,
        offset_y,
    }
}

/// Composite `photo` beneath `overlay` onto an `out_w` x `out_h` canvas and
/// PNG-encode the result.
pub fn compose_blocking(
    photo: &RawPhoto,
    overlay: &RgbaImage,
    out_w: u32,
    out_h: u32,
) -> Result<CompositeArtifact, PhotoError> {
    if photo.width() == 0 || photo.height() == 0 {
        return Err(PhotoError::Decode("photo has no pixels".into()));
    }
    if out_w == 0 || out_h == 0 {
        return Err(PhotoError::Encode("output size has no pixels".into()));
    }

    let fit = cover_fit(photo.width(), photo.height(), out_w, out_h);
    debug!(
        photo_width = photo.width(),
        photo_height = photo.height(),
        scale = fit.scale,
        offset_x = fit.offset_x,
        offset_y = fit.offset_y,
        "Compositing"
    );

    let mut canvas = RgbaImage::from_pixel(out_w, out_h, Rgba([0, 0, 0, 0]));

    let scaled = imageops::resize(
        &photo.image,
        fit.scaled_width,
        fit.scaled_height,
        imageops::FilterType::Triangle,
    );
    imageops::overlay(&mut canvas, &scaled, fit.offset_x, fit.offset_y);

    // The overlay is stretched to exactly the output size and drawn on top
    // unconditionally; its cut-out is what reveals the photo.
    if overlay.dimensions() == (out_w, out_h) {
        imageops::overlay(&mut canvas, overlay, 0, 0);
    } else {
        let stretched = imageops::resize(overlay, out_w, out_h, imageops::FilterType::Triangle);
        imageops::overlay(&mut canvas, &stretched, 0, 0);
    }

    let mut png = Vec::new();
    canvas
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| PhotoError::Encode(e.to_string()))?;

    Ok(CompositeArtifact {
        png,
        width: out_w,
        height: out_h,
    })
}

/// Async wrapper running the composite on the blocking pool
pub async fn compose(
    photo: RawPhoto,
    overlay: RgbaImage,
    out_w: u32,
    out_h: u32,
) -> Result<CompositeArtifact, PhotoError> {
    tokio::task::spawn_blocking(move || compose_blocking(&photo, &overlay, out_w, out_h))
        .await
        .map_err(|e| PhotoError::Encode(format!("compose task error: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_fit_uses_the_larger_ratio() {
        // 1920x1080 into 360x640: vertical ratio dominates
        let fit = cover_fit(1920, 1080, 360, 640);
        assert!((fit.scale - 640.0 / 1080.0).abs() < 1e-9);
        assert!(fit.scaled_width >= 360);
        assert_eq!(fit.scaled_height, 640);
        assert!(fit.offset_x < 0, "wide photo is cropped horizontally");
        assert_eq!(fit.offset_y, 0);
    }

    #[test]
    fn cover_fit_tall_photo_crops_vertically() {
        let fit = cover_fit(360, 1280, 360, 640);
        assert!((fit.scale - 1.0).abs() < 1e-9);
        assert_eq!(fit.offset_x, 0);
        assert!(fit.offset_y < 0);
    }

    #[test]
    fn cover_fit_exact_match_is_identity() {
        let fit = cover_fit(360, 640, 360, 640);
        assert_eq!(fit.scaled_width, 360);
        assert_eq!(fit.scaled_height, 640);
        assert_eq!((fit.offset_x, fit.offset_y), (0, 0));
    }

    #[test]
    fn data_uri_is_self_describing() {
        let artifact = CompositeArtifact {
            png: vec![1, 2, 3],
            width: 1,
            height: 1,
        };
        assert!(artifact.to_data_uri().starts_with("data:image/png;base64,"));
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Static catalog of decorative frames
//!
//! Each entry pairs a fully rendered preview (shown while choosing) with the
//! overlay that is actually composited over the photo. The overlay carries a
//! transparent cut-out; the preview is opaque. Assets are embedded in the
//! binary so the catalog needs no install step.

use image::RgbaImage;
use rust_embed::RustEmbed;

use crate::errors::PhotoError;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

/// One selectable frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDefinition {
    /// Embedded path of the preview image
    pub preview: &'static str,
    /// Embedded path of the overlay image (transparent cut-out)
    pub overlay: &'static str,
    /// Display label
    pub label: &'static str,
}

/// The catalog, in display order. Indices are stable.
static FRAMES: [FrameDefinition; 4] = [
    FrameDefinition {
        preview: "frames/template-1.png",
        overlay: "frames/frame-1.png",
        label: "Crimson",
    },
    FrameDefinition {
        preview: "frames/template-2.png",
        overlay: "frames/frame-2.png",
        label: "Ocean",
    },
    FrameDefinition {
        preview: "frames/template-3.png",
        overlay: "frames/frame-3.png",
        label: "Forest",
    },
    FrameDefinition {
        preview: "frames/template-4.png",
        overlay: "frames/frame-4.png",
        label: "Violet",
    },
];

/// All frames, in display order
pub fn list() -> &'static [FrameDefinition] {
    &FRAMES
}

/// Frame at `index`, if it exists
pub fn get(index: usize) -> Option<&'static FrameDefinition> {
    FRAMES.get(index)
}

/// Decode the overlay image for the frame at `index`
pub fn load_overlay(index: usize) -> Result<RgbaImage, PhotoError> {
    let frame = get(index)
        .ok_or_else(|| PhotoError::FrameAsset(format!("no frame at index {}", index)))?;
    decode_asset(frame.overlay)
}

/// Decode the preview image for the frame at `index`
pub fn load_preview(index: usize) -> Result<RgbaImage, PhotoError> {
    let frame = get(index)
        .ok_or_else(|| PhotoError::FrameAsset(format!("no frame at index {}", index)))?;
    decode_asset(frame.preview)
}

fn decode_asset(path: &str) -> Result<RgbaImage, PhotoError> {
    let file = Assets::get(path)
        .ok_or_else(|| PhotoError::FrameAsset(format!("missing embedded asset: {}", path)))?;
    let img = image::load_from_memory(&file.data)
        .map_err(|e| PhotoError::FrameAsset(format!("{}: {}", path, e)))?;
    Ok(img.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_stable_and_labels_set() {
        let frames = list();
        assert_eq!(frames.len(), 4);
        for (index, frame) in frames.iter().enumerate() {
            assert_eq!(get(index), Some(frame));
            assert!(!frame.label.is_empty());
        }
        assert!(get(frames.len()).is_none());
    }

    #[test]
    fn every_overlay_has_a_transparent_cutout() {
        for index in 0..list().len() {
            let overlay = load_overlay(index).expect("overlay decodes");
            let center = overlay.get_pixel(overlay.width() / 2, overlay.height() / 2);
            assert_eq!(center[3], 0, "frame {} center should be transparent", index);
        }
    }
}

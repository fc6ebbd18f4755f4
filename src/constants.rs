// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Width of the composited artifact in pixels
pub const OUTPUT_WIDTH: u32 = 360;

/// Height of the composited artifact in pixels
pub const OUTPUT_HEIGHT: u32 = 640;

/// Preferred capture resolution requested from the camera.
///
/// This is a preference, not a requirement; the session manager accepts
/// whatever the device actually negotiates.
pub const PREFERRED_CAPTURE_WIDTH: u32 = 1280;
pub const PREFERRED_CAPTURE_HEIGHT: u32 = 720;

/// Prefix for saved artifact file names (`snap_YYYYmmdd_HHMMSS.png`)
pub const SNAP_FILE_PREFIX: &str = "snap";

/// Default folder name for saved snaps, under the user's pictures directory
pub const DEFAULT_SAVE_FOLDER: &str = "Framebooth";

/// File name used when packaging the artifact for the system share surface
pub const SHARE_FILE_NAME: &str = "framebooth_snap.png";

/// Fixed title attached to shared artifacts
pub const SHARE_TITLE: &str = "Framebooth snap";

/// Fixed caption attached to shared artifacts
pub const SHARE_TEXT: &str = "Check out my framed snap";

/// Capture timing
pub mod capture {
    /// Frames discarded before the one that is kept, letting exposure settle
    pub const WARMUP_FRAMES: usize = 3;

    /// How long to keep trying for a frame before giving up
    pub const FRAME_TIMEOUT_SECS: u64 = 5;
}

// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::errors::CameraError;

/// Which physical camera a capture request should bind to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FacingMode {
    /// User-facing (selfie) camera
    #[default]
    Front,
    /// Environment-facing camera
    Back,
}

impl FacingMode {
    /// The other camera
    pub fn opposite(&self) -> Self {
        match self {
            FacingMode::Front => FacingMode::Back,
            FacingMode::Back => FacingMode::Front,
        }
    }
}

impl std::fmt::Display for FacingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacingMode::Front => write!(f, "front"),
            FacingMode::Back => write!(f, "back"),
        }
    }
}

/// A camera device known to a backend
#[derive(Debug, Clone)]
pub struct CameraDescriptor {
    /// Human-readable device name (V4L2 card string)
    pub name: String,
    /// Device path (e.g., /dev/video0) or virtual identifier
    pub path: String,
    /// Facing mode, when the device reports or implies one
    pub location: Option<FacingMode>,
}

impl CameraDescriptor {
    /// Infer a facing mode from a device name.
    ///
    /// V4L2 has no standard front/back notion; laptop and phone sensors
    /// usually hint at it in the card string.
    pub fn infer_location(name: &str) -> Option<FacingMode> {
        let lower = name.to_lowercase();
        if lower.contains("front") || lower.contains("user") || lower.contains("integrated") {
            Some(FacingMode::Front)
        } else if lower.contains("back") || lower.contains("rear") || lower.contains("world") {
            Some(FacingMode::Back)
        } else {
            None
        }
    }
}

/// Constraints for opening a capture stream
#[derive(Debug, Clone, Copy)]
pub struct StreamRequest {
    /// Requested facing mode
    pub facing: FacingMode,
    /// When true, only a device whose known location matches `facing` is
    /// acceptable; when false, any device is, preferring a match
    pub exact: bool,
    /// Preferred capture width (best effort)
    pub width: u32,
    /// Preferred capture height (best effort)
    pub height: u32,
}

impl StreamRequest {
    /// Preferred-resolution request with an exact facing match
    pub fn exact(facing: FacingMode) -> Self {
        Self {
            facing,
            exact: true,
            width: crate::constants::PREFERRED_CAPTURE_WIDTH,
            height: crate::constants::PREFERRED_CAPTURE_HEIGHT,
        }
    }

    /// The same request with the facing constraint relaxed to best effort
    pub fn relaxed(mut self) -> Self {
        self.exact = false;
        self
    }
}

/// A single RGBA frame captured from a camera
#[derive(Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA pixels, row-major
    pub data: Arc<[u8]>,
    /// Timestamp when the frame was captured
    pub captured_at: Instant,
}

impl std::fmt::Debug for CameraFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CameraFrame({}x{}, {} bytes)",
            self.width,
            self.height,
            self.data.len()
        )
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone)]
pub enum BackendError {
    /// No device satisfied the request
    NoMatchingDevice,
    /// Failed to open or configure a device
    InitializationFailed(String),
    /// Frame capture failed
    CaptureFailed(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NoMatchingDevice => write!(f, "No matching device"),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<BackendError> for CameraError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NoMatchingDevice => CameraError::Unavailable,
            BackendError::InitializationFailed(msg) => CameraError::InitializationFailed(msg),
            BackendError::CaptureFailed(msg) => CameraError::CaptureFailed(msg),
            BackendError::Other(msg) => CameraError::InitializationFailed(msg),
        }
    }
}

/// A live capture stream bound to one device
pub trait CameraStream: Send {
    /// The device this stream is bound to
    fn descriptor(&self) -> &CameraDescriptor;

    /// Capture one frame at the stream's native resolution
    fn capture_frame(&mut self) -> BackendResult<CameraFrame>;

    /// Release the underlying device. Must be idempotent.
    fn close(&mut self);

    /// Whether the underlying device is still held
    fn is_open(&self) -> bool;
}

/// A source of camera devices and capture streams
pub trait CameraBackend: Send {
    /// List the devices this backend can open
    fn enumerate(&self) -> Vec<CameraDescriptor>;

    /// Open a capture stream for the given request
    fn open(&self, request: &StreamRequest) -> BackendResult<Box<dyn CameraStream>>;
}

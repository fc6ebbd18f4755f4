// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the framebooth pipeline

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Photo decode/encode/save errors
    Photo(PhotoError),
    /// Share surface errors
    Share(ShareError),
    /// Gallery upload errors
    Upload(UploadError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Camera-specific errors
#[derive(Debug, Clone)]
pub enum CameraError {
    /// No camera satisfied the request, even after the relaxed retry
    Unavailable,
    /// Camera initialization failed
    InitializationFailed(String),
    /// Frame capture failed on a live session
    CaptureFailed(String),
    /// No session is open when one was required
    NoSession,
}

/// Photo pipeline errors
#[derive(Debug, Clone)]
pub enum PhotoError {
    /// Photo input could not be decoded
    Decode(String),
    /// Artifact encoding failed
    Encode(String),
    /// Save to disk failed
    Save(String),
    /// Embedded frame asset missing or unreadable
    FrameAsset(String),
}

/// Share surface errors
#[derive(Debug, Clone)]
pub enum ShareError {
    /// The host cannot share file attachments
    Unsupported,
    /// The share action was invoked but did not complete
    Failed(String),
}

/// Gallery upload errors
///
/// These never reach the user; the background upload swallows them after
/// logging. They exist so the transport can report what went wrong.
#[derive(Debug, Clone)]
pub enum UploadError {
    /// Endpoint URL is missing or not something the transport can speak to
    Endpoint(String),
    /// Connection or I/O failure
    Transport(String),
    /// Endpoint answered with a non-success status
    Rejected(u16),
    /// Endpoint answered 2xx but reported failure in the body
    Declined(String),
    /// Endpoint answered but the body was not the expected JSON
    MalformedResponse(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Photo(e) => write!(f, "Photo error: {}", e),
            AppError::Share(e) => write!(f, "Share error: {}", e),
            AppError::Upload(e) => write!(f, "Upload error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::Unavailable => write!(f, "No camera available"),
            CameraError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            CameraError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            CameraError::NoSession => write!(f, "No capture session is open"),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::Decode(msg) => write!(f, "Decode failed: {}", msg),
            PhotoError::Encode(msg) => write!(f, "Encoding failed: {}", msg),
            PhotoError::Save(msg) => write!(f, "Save failed: {}", msg),
            PhotoError::FrameAsset(msg) => write!(f, "Frame asset error: {}", msg),
        }
    }
}

impl fmt::Display for ShareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShareError::Unsupported => write!(f, "Sharing is not supported on this host"),
            ShareError::Failed(msg) => write!(f, "Share failed: {}", msg),
        }
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::Endpoint(msg) => write!(f, "Bad endpoint: {}", msg),
            UploadError::Transport(msg) => write!(f, "Transport error: {}", msg),
            UploadError::Rejected(status) => write!(f, "Endpoint rejected upload: HTTP {}", status),
            UploadError::Declined(msg) => write!(f, "Endpoint declined upload: {}", msg),
            UploadError::MalformedResponse(msg) => write!(f, "Malformed response: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for PhotoError {}
impl std::error::Error for ShareError {}
impl std::error::Error for UploadError {}

// Conversions from sub-errors to AppError
impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        AppError::Photo(err)
    }
}

impl From<ShareError> for AppError {
    fn from(err: ShareError) -> Self {
        AppError::Share(err)
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        AppError::Upload(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

// Conversions for I/O errors
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for PhotoError {
    fn from(err: std::io::Error) -> Self {
        PhotoError::Save(err.to_string())
    }
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        UploadError::Transport(err.to_string())
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Camera session management
//!
//! The session manager owns the one live capture session and its lifecycle:
//! open with an exact facing match falling back to a relaxed one, idempotent
//! close on every exit path, and facing switches that revert on failure.

pub mod file_source;
pub mod types;
pub mod v4l2;

use tracing::{debug, info, warn};

use crate::errors::CameraError;
use self::types::{
    CameraBackend, CameraDescriptor, CameraFrame, CameraStream, FacingMode, StreamRequest,
};

/// A live capture session bound to a facing mode
///
/// The stream handle is owned exclusively here; it is released when the
/// session is closed and cannot outlive it.
pub struct CaptureSession {
    facing: FacingMode,
    stream: Box<dyn CameraStream>,
}

impl CaptureSession {
    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    pub fn descriptor(&self) -> &CameraDescriptor {
        self.stream.descriptor()
    }

    /// Snapshot the current frame at the stream's native resolution
    pub fn capture_frame(&mut self) -> Result<CameraFrame, CameraError> {
        self.stream.capture_frame().map_err(CameraError::from)
    }
}

/// Owner of at most one live capture session
pub struct SessionManager<B: CameraBackend> {
    backend: B,
    session: Option<CaptureSession>,
}

impl<B: CameraBackend> SessionManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            session: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&CaptureSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut CaptureSession> {
        self.session.as_mut()
    }

    /// Open a session for `facing`.
    ///
    /// Tries an exact facing match first, then retries once with the
    /// constraint relaxed. Any previously open session is torn down before
    /// the attempt, so at most one stream is ever live.
    pub fn open(&mut self, facing: FacingMode) -> Result<(), CameraError> {
        self.close();

        let request = StreamRequest::exact(facing);
        let stream = match self.backend.open(&request) {
            Ok(stream) => stream,
            Err(e) => {
                warn!(%facing, error = %e, "Exact facing match failed, retrying relaxed");
                self.backend.open(&request.relaxed()).map_err(|e| {
                    warn!(%facing, error = %e, "Relaxed open failed too");
                    CameraError::Unavailable
                })?
            }
        };

        info!(%facing, device = %stream.descriptor().name, "Capture session opened");
        self.session = Some(CaptureSession { facing, stream });
        Ok(())
    }

    /// Release the current session, if any. Safe to call on every exit path.
    pub fn close(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stream.close();
            debug!(facing = %session.facing, "Capture session closed");
        }
    }

    /// Close the current session and open one on the opposite camera.
    ///
    /// On failure the previous facing is reopened; if even that fails the
    /// manager is left without a session and the caller must fall back.
    pub fn switch_facing(&mut self) -> Result<FacingMode, CameraError> {
        let previous = self
            .session
            .as_ref()
            .map(|s| s.facing)
            .ok_or(CameraError::NoSession)?;
        let target = previous.opposite();

        match self.open(target) {
            Ok(()) => Ok(target),
            Err(e) => {
                warn!(from = %previous, to = %target, error = %e, "Facing switch failed, reverting");
                self.open(previous)?;
                Err(e)
            }
        }
    }
}

impl<B: CameraBackend> Drop for SessionManager<B> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Pick a device for a request: an exact request needs a known matching
/// location; a relaxed one takes any device, preferring a match.
pub(crate) fn select_device<'a>(
    devices: &'a [CameraDescriptor],
    request: &StreamRequest,
) -> Option<&'a CameraDescriptor> {
    let matching = devices
        .iter()
        .find(|d| d.location == Some(request.facing));
    if request.exact {
        matching
    } else {
        matching.or_else(|| devices.first())
    }
}

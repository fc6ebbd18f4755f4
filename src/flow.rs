// SPDX-License-Identifier: GPL-3.0-only

//! View state controller
//!
//! Drives the frame-selection → camera → preview sequence and owns every
//! piece of mutable state in the pipeline: the selected frame, the one raw
//! photo, the one artifact, and the one capture session. Errors surface as
//! transient notices and a recovery transition; nothing here is fatal.

use std::path::PathBuf;
use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, info};

use crate::backends::camera::types::{CameraBackend, FacingMode};
use crate::backends::camera::SessionManager;
use crate::catalog;
use crate::compose::{self, CompositeArtifact};
use crate::config::Config;
use crate::constants::{OUTPUT_HEIGHT, OUTPUT_WIDTH};
use crate::errors::{AppError, AppResult, CameraError};
use crate::media::{self, RawPhoto};
use crate::notify::{NoticeKind, Notifier};
use crate::output::download;
use crate::output::share::{self, ShareProvider};
use crate::output::upload::{self, GalleryUploader};

/// Where the user is in the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Choosing a frame; `expanded` is the focused single-frame view with
    /// the capture affordances
    FrameSelection { expanded: bool },
    /// Live camera view
    Camera,
    /// Composited result (or an error state while the photo is set but no
    /// artifact could be produced)
    Preview,
}

impl Step {
    fn is_expanded_selection(&self) -> bool {
        matches!(self, Step::FrameSelection { expanded: true })
    }
}

/// The flow controller
pub struct Flow<B: CameraBackend> {
    step: Step,
    facing: FacingMode,
    selected_frame: Option<usize>,
    overlay: Option<RgbaImage>,
    photo: Option<RawPhoto>,
    artifact: Option<CompositeArtifact>,
    composing: bool,
    sessions: SessionManager<B>,
    notifier: Arc<dyn Notifier>,
    uploader: Option<Arc<dyn GalleryUploader>>,
    config: Config,
}

impl<B: CameraBackend> Flow<B> {
    pub fn new(backend: B, config: Config, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            step: Step::FrameSelection { expanded: false },
            facing: config.default_facing,
            selected_frame: None,
            overlay: None,
            photo: None,
            artifact: None,
            composing: false,
            sessions: SessionManager::new(backend),
            notifier,
            uploader: None,
            config,
        }
    }

    /// Attach the gallery collaborator for the background upload
    pub fn with_uploader(mut self, uploader: Arc<dyn GalleryUploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    pub fn selected_frame(&self) -> Option<usize> {
        self.selected_frame
    }

    pub fn artifact(&self) -> Option<&CompositeArtifact> {
        self.artifact.as_ref()
    }

    pub fn has_photo(&self) -> bool {
        self.photo.is_some()
    }

    /// Whether a composite is currently being produced
    pub fn is_processing(&self) -> bool {
        self.composing
    }

    pub fn has_session(&self) -> bool {
        self.sessions.is_open()
    }

    pub fn backend(&self) -> &B {
        self.sessions.backend()
    }

    /// Pick a frame, loading its overlay and expanding the selection view
    pub fn select_frame(&mut self, index: usize) -> AppResult<()> {
        if !matches!(self.step, Step::FrameSelection { .. }) {
            return Err(AppError::Other("not in frame selection".into()));
        }
        let overlay = match catalog::load_overlay(index) {
            Ok(overlay) => overlay,
            Err(e) => {
                self.notifier
                    .notify(NoticeKind::Error, &format!("Failed to load frame: {}", e));
                return Err(e.into());
            }
        };

        debug!(index, "Frame selected");
        self.selected_frame = Some(index);
        self.overlay = Some(overlay);
        self.step = Step::FrameSelection { expanded: true };
        Ok(())
    }

    /// Collapse the expanded selection view back to the grid
    pub fn collapse_frame(&mut self) {
        if self.step.is_expanded_selection() {
            self.step = Step::FrameSelection { expanded: false };
        }
    }

    /// Enter the camera state, acquiring a capture session.
    ///
    /// On `CameraUnavailable` the user is notified and returned to frame
    /// selection.
    pub fn start_camera(&mut self) -> AppResult<()> {
        if !self.step.is_expanded_selection() {
            return Err(AppError::Other("camera entry requires a selected frame".into()));
        }
        self.open_session_or_reset()?;
        self.step = Step::Camera;
        Ok(())
    }

    /// Switch between the front and back cameras.
    ///
    /// On failure the previous camera is kept when it could be restored;
    /// otherwise the flow falls back to frame selection.
    pub fn switch_camera(&mut self) -> AppResult<()> {
        if self.step != Step::Camera {
            return Err(AppError::Other("not in camera state".into()));
        }
        match self.sessions.switch_facing() {
            Ok(facing) => {
                self.facing = facing;
                Ok(())
            }
            Err(e) => {
                if self.sessions.is_open() {
                    self.notifier.notify(
                        NoticeKind::Error,
                        "Could not switch cameras. Staying on the current one.",
                    );
                } else {
                    self.notify_camera_unavailable();
                    self.reset();
                }
                Err(e.into())
            }
        }
    }

    /// Capture a photo from the live session and move to preview.
    ///
    /// The session is released on success; a failed capture keeps the
    /// camera state so the user can try again.
    pub async fn capture(&mut self) -> AppResult<()> {
        if self.step != Step::Camera {
            return Err(AppError::Other("not in camera state".into()));
        }
        let mirror =
            self.facing == FacingMode::Front && self.config.mirror_front_capture;

        let frame = match self
            .sessions
            .session_mut()
            .ok_or(CameraError::NoSession)
            .and_then(|s| s.capture_frame())
        {
            Ok(frame) => frame,
            Err(e) => {
                self.notifier
                    .notify(NoticeKind::Error, "Could not capture a photo. Try again.");
                return Err(e.into());
            }
        };

        let photo = match media::photo_from_frame(&frame, mirror) {
            Ok(photo) => photo,
            Err(e) => {
                self.notifier
                    .notify(NoticeKind::Error, "Could not capture a photo. Try again.");
                return Err(e.into());
            }
        };

        info!(width = photo.width(), height = photo.height(), mirror, "Photo captured");
        self.sessions.close();
        self.photo = Some(photo);
        self.artifact = None;
        self.step = Step::Preview;
        self.try_compose().await;
        Ok(())
    }

    /// Take the photo from an uploaded file instead of the camera, skipping
    /// the camera state entirely.
    pub async fn upload_photo(&mut self, bytes: Vec<u8>) -> AppResult<()> {
        if !self.step.is_expanded_selection() {
            return Err(AppError::Other("upload requires a selected frame".into()));
        }
        let photo = match media::decode_photo(bytes).await {
            Ok(photo) => photo,
            Err(e) => {
                self.notifier.notify(
                    NoticeKind::Error,
                    "That image could not be read. Try another file.",
                );
                return Err(e.into());
            }
        };

        info!(width = photo.width(), height = photo.height(), "Photo uploaded");
        self.sessions.close();
        self.photo = Some(photo);
        self.artifact = None;
        self.step = Step::Preview;
        self.try_compose().await;
        Ok(())
    }

    /// Discard the current result and reopen the camera
    pub fn retake(&mut self) -> AppResult<()> {
        if self.step != Step::Preview {
            return Err(AppError::Other("not in preview".into()));
        }
        self.photo = None;
        self.artifact = None;
        self.open_session_or_reset()?;
        self.step = Step::Camera;
        Ok(())
    }

    /// Full reset back to the frame grid.
    ///
    /// Closes any live session; every exit path from the camera state runs
    /// through here or through a successful capture.
    pub fn reset(&mut self) {
        self.sessions.close();
        self.photo = None;
        self.artifact = None;
        self.composing = false;
        self.selected_frame = None;
        self.overlay = None;
        self.step = Step::FrameSelection { expanded: false };
        debug!("Flow reset");
    }

    /// Save the artifact to the configured output directory
    pub async fn download(&self) -> AppResult<PathBuf> {
        let artifact = self
            .artifact
            .as_ref()
            .ok_or_else(|| AppError::Other("no artifact to download".into()))?;
        let path = download::save_artifact(artifact, &self.config.resolve_output_dir()).await?;
        Ok(path)
    }

    /// Hand the artifact to the share surface.
    ///
    /// An unsupported host or a failed share both leave the artifact
    /// available for download and only produce a notice.
    pub async fn share(&self, provider: &dyn ShareProvider) -> AppResult<()> {
        let artifact = self
            .artifact
            .as_ref()
            .ok_or_else(|| AppError::Other("no artifact to share".into()))?;
        match share::share_artifact(
            provider,
            artifact,
            &self.config.share_title,
            &self.config.share_text,
        )
        .await
        {
            Ok(()) => Ok(()),
            Err(e @ crate::errors::ShareError::Unsupported) => {
                self.notifier.notify(
                    NoticeKind::Info,
                    "Direct sharing is not supported here. Please download the image.",
                );
                Err(e.into())
            }
            Err(e) => {
                self.notifier.notify(
                    NoticeKind::Error,
                    "Could not share the image. Please try downloading it.",
                );
                Err(e.into())
            }
        }
    }

    /// Produce the artifact once both the photo and the overlay are in.
    ///
    /// This is the join barrier for the two asynchronous inputs: whichever
    /// arrives last triggers the composite, and the in-flight guard keeps a
    /// second trigger from overlapping the first.
    async fn try_compose(&mut self) {
        if self.step != Step::Preview || self.composing {
            return;
        }
        let (Some(photo), Some(overlay)) = (self.photo.clone(), self.overlay.clone()) else {
            return;
        };

        self.composing = true;
        let result = compose::compose(photo, overlay, OUTPUT_WIDTH, OUTPUT_HEIGHT).await;
        self.composing = false;

        match result {
            Ok(artifact) => {
                if let Some(uploader) = &self.uploader {
                    // fire-and-forget; the handle is deliberately dropped
                    let _ = upload::upload_background(Arc::clone(uploader), artifact.clone());
                }
                self.artifact = Some(artifact);
            }
            Err(e) => {
                debug!(error = %e, "Composite failed");
                self.notifier.notify(
                    NoticeKind::Error,
                    "There was an issue applying the frame. Please try again.",
                );
                self.artifact = None;
            }
        }
    }

    fn open_session_or_reset(&mut self) -> AppResult<()> {
        if let Err(e) = self.sessions.open(self.facing) {
            self.notify_camera_unavailable();
            self.reset();
            return Err(e.into());
        }
        Ok(())
    }

    fn notify_camera_unavailable(&self) {
        self.notifier.notify(
            NoticeKind::Error,
            "Could not access the selected camera. Please ensure permissions are granted.",
        );
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! File-backed virtual camera
//!
//! Serves frames from still images instead of hardware. Used by the CLI's
//! `--virtual` capture path and by tests, where it doubles as the device
//! indicator: the backend counts its live streams, so a leaked handle is
//! observable.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use image::RgbaImage;
use tracing::debug;

use super::select_device;
use super::types::{
    BackendError, BackendResult, CameraBackend, CameraDescriptor, CameraFrame, CameraStream,
    FacingMode, StreamRequest,
};
use crate::errors::PhotoError;

#[derive(Clone)]
struct FileSource {
    descriptor: CameraDescriptor,
    image: Arc<RgbaImage>,
}

/// Backend serving frames from configured still images
#[derive(Default)]
pub struct FileSourceBackend {
    sources: Vec<FileSource>,
    live_streams: Arc<AtomicUsize>,
}

impl FileSourceBackend {
    /// A backend with no devices; every open fails
    pub fn new() -> Self {
        Self::default()
    }

    /// A single-device backend serving the image at `path`
    pub fn from_path(path: &Path, location: Option<FacingMode>) -> Result<Self, PhotoError> {
        let img = image::open(path).map_err(|e| PhotoError::Decode(e.to_string()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "virtual".to_string());
        Ok(Self::new().with_source(&name, location, img.to_rgba8()))
    }

    /// Add a virtual device serving `image`
    pub fn with_source(
        mut self,
        name: &str,
        location: Option<FacingMode>,
        image: RgbaImage,
    ) -> Self {
        let index = self.sources.len();
        self.sources.push(FileSource {
            descriptor: CameraDescriptor {
                name: name.to_string(),
                path: format!("virtual:{}", index),
                location,
            },
            image: Arc::new(image),
        });
        self
    }

    /// Number of streams currently held open against this backend
    pub fn live_streams(&self) -> usize {
        self.live_streams.load(Ordering::SeqCst)
    }

    /// Shared counter handle, for observers that outlive the backend
    pub fn live_stream_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.live_streams)
    }
}

impl CameraBackend for FileSourceBackend {
    fn enumerate(&self) -> Vec<CameraDescriptor> {
        self.sources.iter().map(|s| s.descriptor.clone()).collect()
    }

    fn open(&self, request: &StreamRequest) -> BackendResult<Box<dyn CameraStream>> {
        let devices = self.enumerate();
        let descriptor = select_device(&devices, request)
            .cloned()
            .ok_or(BackendError::NoMatchingDevice)?;
        let source = self
            .sources
            .iter()
            .find(|s| s.descriptor.path == descriptor.path)
            .expect("selected descriptor comes from this backend");

        self.live_streams.fetch_add(1, Ordering::SeqCst);
        debug!(device = %descriptor.name, "Opened virtual stream");
        Ok(Box::new(FileSourceStream {
            descriptor,
            image: Arc::clone(&source.image),
            counter: Arc::clone(&self.live_streams),
            open: true,
        }))
    }
}

struct FileSourceStream {
    descriptor: CameraDescriptor,
    image: Arc<RgbaImage>,
    counter: Arc<AtomicUsize>,
    open: bool,
}

impl CameraStream for FileSourceStream {
    fn descriptor(&self) -> &CameraDescriptor {
        &self.descriptor
    }

    fn capture_frame(&mut self) -> BackendResult<CameraFrame> {
        if !self.open {
            return Err(BackendError::CaptureFailed("stream is closed".into()));
        }
        Ok(CameraFrame {
            width: self.image.width(),
            height: self.image.height(),
            data: Arc::from(self.image.as_raw().clone().into_boxed_slice()),
            captured_at: Instant::now(),
        })
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.counter.fetch_sub(1, Ordering::SeqCst);
            debug!(device = %self.descriptor.name, "Closed virtual stream");
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

impl Drop for FileSourceStream {
    fn drop(&mut self) {
        self.close();
    }
}

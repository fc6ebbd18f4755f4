// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the share surface

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use framebooth::backends::camera::file_source::FileSourceBackend;
use framebooth::config::Config;
use framebooth::flow::Flow;
use framebooth::notify::{NoticeKind, Notifier};
use framebooth::output::share::ShareProvider;
use framebooth::{AppError, ShareError};
use image::{Rgba, RgbaImage};

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeKind, String)>>,
}

impl RecordingNotifier {
    fn last(&self) -> Option<(NoticeKind, String)> {
        self.notices.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        self.notices.lock().unwrap().push((kind, message.to_string()));
    }
}

/// Provider without file-sharing support
struct UnsupportedShare;

impl ShareProvider for UnsupportedShare {
    fn supports_files(&self) -> bool {
        false
    }

    fn share_file(&self, _path: &Path, _title: &str, _text: &str) -> Result<(), ShareError> {
        unreachable!("share_file must not be invoked on an unsupported host")
    }
}

/// Provider whose share sheet errors or is dismissed
struct FailingShare;

impl ShareProvider for FailingShare {
    fn supports_files(&self) -> bool {
        true
    }

    fn share_file(&self, _path: &Path, _title: &str, _text: &str) -> Result<(), ShareError> {
        Err(ShareError::Failed("dismissed".into()))
    }
}

/// Provider recording what it was handed
#[derive(Default)]
struct RecordingShare {
    invocations: Mutex<Vec<(PathBuf, String, String)>>,
}

impl ShareProvider for RecordingShare {
    fn supports_files(&self) -> bool {
        true
    }

    fn share_file(&self, path: &Path, title: &str, text: &str) -> Result<(), ShareError> {
        self.invocations
            .lock()
            .unwrap()
            .push((path.to_path_buf(), title.to_string(), text.to_string()));
        Ok(())
    }
}

fn preview_flow(
    notifier: Arc<RecordingNotifier>,
) -> (Flow<FileSourceBackend>, PathBuf) {
    let dir = std::env::temp_dir().join(format!("framebooth-share-{}", std::process::id()));
    let config = Config {
        output_dir: Some(dir.clone()),
        ..Config::default()
    };
    (Flow::new(FileSourceBackend::new(), config, notifier), dir)
}

fn photo_bytes() -> Vec<u8> {
    let img = RgbaImage::from_pixel(720, 1280, Rgba([10, 90, 160, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[tokio::test]
async fn an_unsupported_host_redirects_to_download() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (mut flow, dir) = preview_flow(notifier.clone());

    flow.select_frame(0).unwrap();
    flow.upload_photo(photo_bytes()).await.unwrap();

    let result = flow.share(&UnsupportedShare).await;
    assert!(matches!(result, Err(AppError::Share(ShareError::Unsupported))));

    let (kind, message) = notifier.last().unwrap();
    assert_eq!(kind, NoticeKind::Info, "a missing capability is not an error");
    assert!(message.to_lowercase().contains("download"));

    // the artifact is still there and downloadable
    assert!(flow.artifact().is_some());
    let path = flow.download().await.unwrap();
    assert!(path.exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn a_failed_share_is_a_recoverable_notice() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (mut flow, dir) = preview_flow(notifier.clone());

    flow.select_frame(1).unwrap();
    flow.upload_photo(photo_bytes()).await.unwrap();

    let result = flow.share(&FailingShare).await;
    assert!(matches!(result, Err(AppError::Share(ShareError::Failed(_)))));
    assert_eq!(notifier.last().unwrap().0, NoticeKind::Error);
    assert!(flow.artifact().is_some(), "the artifact survives a failed share");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn sharing_packages_the_artifact_with_the_configured_strings() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (mut flow, dir) = preview_flow(notifier);

    flow.select_frame(0).unwrap();
    flow.upload_photo(photo_bytes()).await.unwrap();

    let provider = RecordingShare::default();
    flow.share(&provider).await.unwrap();

    let invocations = provider.invocations.lock().unwrap();
    let (path, title, text) = invocations.first().expect("share invoked once");
    assert!(path.to_string_lossy().ends_with("framebooth_snap.png"));
    assert!(path.exists(), "the packaged file is on disk");
    assert_eq!(title, framebooth::constants::SHARE_TITLE);
    assert_eq!(text, framebooth::constants::SHARE_TEXT);

    let _ = std::fs::remove_dir_all(&dir);
}

// SPDX-License-Identifier: GPL-3.0-only

//! System share surface
//!
//! Sharing is an optional host capability. When absent, callers are
//! expected to direct the user to the download action instead; nothing here
//! is fatal.

use std::path::Path;

use tracing::{debug, info};

use crate::compose::CompositeArtifact;
use crate::constants::SHARE_FILE_NAME;
use crate::errors::ShareError;

/// Host share capability
pub trait ShareProvider: Send + Sync {
    /// Whether the host can share file attachments at all
    fn supports_files(&self) -> bool;

    /// Hand the file to the host's share affordance
    fn share_file(&self, path: &Path, title: &str, text: &str) -> Result<(), ShareError>;
}

/// Share via the desktop's default handler for the file
#[derive(Debug, Default)]
pub struct SystemShare;

impl ShareProvider for SystemShare {
    fn supports_files(&self) -> bool {
        // A graphical session is the closest thing to a shareable host;
        // headless environments have nowhere to hand the file to.
        std::env::var_os("WAYLAND_DISPLAY").is_some() || std::env::var_os("DISPLAY").is_some()
    }

    fn share_file(&self, path: &Path, title: &str, text: &str) -> Result<(), ShareError> {
        debug!(title, text, path = %path.display(), "Invoking system share");
        open::that_detached(path).map_err(|e| ShareError::Failed(e.to_string()))
    }
}

/// Package the artifact as a file and invoke the share affordance.
///
/// `ShareError::Unsupported` means the host cannot share files; `Failed`
/// means it tried and did not complete. Both are recoverable.
pub async fn share_artifact(
    provider: &dyn ShareProvider,
    artifact: &CompositeArtifact,
    title: &str,
    text: &str,
) -> Result<(), ShareError> {
    if !provider.supports_files() {
        return Err(ShareError::Unsupported);
    }

    let path = std::env::temp_dir().join(SHARE_FILE_NAME);
    let data = artifact.png_bytes().to_vec();
    let write_path = path.clone();
    tokio::task::spawn_blocking(move || std::fs::write(&write_path, &data))
        .await
        .map_err(|e| ShareError::Failed(format!("share task error: {}", e)))?
        .map_err(|e| ShareError::Failed(e.to_string()))?;

    provider.share_file(&path, title, text)?;
    info!("Artifact handed to the share surface");
    Ok(())
}

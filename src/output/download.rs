// SPDX-License-Identifier: GPL-3.0-only

//! Saving artifacts to disk

use std::path::{Path, PathBuf};

use tracing::info;

use crate::compose::CompositeArtifact;
use crate::constants::{DEFAULT_SAVE_FOLDER, SNAP_FILE_PREFIX};
use crate::errors::PhotoError;

/// Default directory for saved snaps
pub fn default_output_dir() -> PathBuf {
    dirs::picture_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join(DEFAULT_SAVE_FOLDER)
}

/// File name for a snap taken now.
///
/// The timestamp disambiguates repeated captures so nothing is silently
/// overwritten.
pub fn snap_file_name() -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    format!("{}_{}.png", SNAP_FILE_PREFIX, timestamp)
}

/// Save the artifact under `output_dir` with a timestamped name.
///
/// The directory is created if needed; the write runs on the blocking pool.
pub async fn save_artifact(
    artifact: &CompositeArtifact,
    output_dir: &Path,
) -> Result<PathBuf, PhotoError> {
    let filepath = output_dir.join(snap_file_name());

    info!(path = %filepath.display(), "Saving snap");

    let dir = output_dir.to_path_buf();
    let data = artifact.png_bytes().to_vec();
    let filepath_clone = filepath.clone();
    tokio::task::spawn_blocking(move || {
        std::fs::create_dir_all(&dir).map_err(|e| PhotoError::Save(e.to_string()))?;
        std::fs::write(&filepath_clone, &data).map_err(|e| PhotoError::Save(e.to_string()))
    })
    .await
    .map_err(|e| PhotoError::Save(format!("save task error: {}", e)))??;

    info!(path = %filepath.display(), "Snap saved");
    Ok(filepath)
}

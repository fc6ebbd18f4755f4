// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::types::FacingMode;
use crate::constants;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// User configuration
///
/// Loaded from `<config dir>/framebooth/config.json`; a missing or
/// unparseable file falls back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gallery endpoint for the background upload; `None` disables it
    pub upload_endpoint: Option<String>,
    /// Directory for saved snaps; `None` means the pictures directory
    pub output_dir: Option<PathBuf>,
    /// Camera used when entering the camera state
    pub default_facing: FacingMode,
    /// Mirror front-camera captures so the output matches the scene (selfie
    /// previews are mirrored; the saved photo should not be)
    pub mirror_front_capture: bool,
    /// Title attached to shared artifacts
    pub share_title: String,
    /// Caption attached to shared artifacts
    pub share_text: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upload_endpoint: None,
            output_dir: None,
            default_facing: FacingMode::Front,
            mirror_front_capture: true,
            share_title: constants::SHARE_TITLE.to_string(),
            share_text: constants::SHARE_TEXT.to_string(),
        }
    }
}

impl Config {
    /// Path of the configuration file, when a config directory exists
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("framebooth").join("config.json"))
    }

    /// Load the configuration, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Directory where snaps are saved
    pub fn resolve_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(crate::output::download::default_output_dir)
    }
}

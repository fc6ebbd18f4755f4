// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands driving the flow end-to-end
//!
//! This module provides command-line functionality for:
//! - Listing frames and cameras
//! - Compositing an existing photo with a frame
//! - Capturing a photo from a camera (or a virtual file source)

use std::path::PathBuf;
use std::sync::Arc;

use framebooth::backends::camera::file_source::FileSourceBackend;
use framebooth::backends::camera::types::{CameraBackend, FacingMode};
use framebooth::backends::camera::v4l2::V4l2Backend;
use framebooth::catalog;
use framebooth::config::Config;
use framebooth::flow::Flow;
use framebooth::notify::LogNotifier;
use framebooth::output::share::SystemShare;
use framebooth::output::upload::HttpUploader;

/// List the frame catalog
pub fn list_frames() -> Result<(), Box<dyn std::error::Error>> {
    println!("Available frames:");
    println!();
    for (index, frame) in catalog::list().iter().enumerate() {
        println!("  [{}] {}", index, frame.label);
    }
    Ok(())
}

/// List all cameras the V4L2 backend can see
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    let cameras = V4l2Backend::new().enumerate();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for camera in &cameras {
        let location = camera
            .location
            .map(|l| l.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!("  {}  ({}, facing: {})", camera.name, camera.path, location);
    }
    Ok(())
}

/// Composite an existing photo file with the frame at `frame_index`
pub fn snap(
    frame_index: usize,
    photo: PathBuf,
    output: Option<PathBuf>,
    share: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(&photo)?;
    let config = load_config(output);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut flow = build_flow(V4l2Backend::new(), config);
        flow.select_frame(frame_index)?;
        flow.upload_photo(bytes).await?;
        finish(&flow, share).await
    })
}

/// Capture from a camera (or a virtual file source) and composite
pub fn capture(
    frame_index: usize,
    facing: &str,
    output: Option<PathBuf>,
    virtual_source: Option<PathBuf>,
    share: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let facing = parse_facing(facing)?;
    let mut config = load_config(output);
    config.default_facing = facing;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        match virtual_source {
            Some(path) => {
                let backend = FileSourceBackend::from_path(&path, Some(facing))?;
                run_capture(backend, frame_index, config, share).await
            }
            None => run_capture(V4l2Backend::new(), frame_index, config, share).await,
        }
    })
}

async fn run_capture<B: CameraBackend>(
    backend: B,
    frame_index: usize,
    config: Config,
    share: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut flow = build_flow(backend, config);
    flow.select_frame(frame_index)?;
    flow.start_camera()?;
    println!("Capturing...");
    flow.capture().await?;
    finish(&flow, share).await
}

async fn finish<B: CameraBackend>(
    flow: &Flow<B>,
    share: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if flow.artifact().is_none() {
        return Err("processing failed, no artifact was produced".into());
    }

    let path = flow.download().await?;
    println!("Snap saved: {}", path.display());

    if share {
        match flow.share(&SystemShare).await {
            Ok(()) => println!("Handed to the share surface."),
            Err(e) => println!("Share unavailable: {}", e),
        }
    }
    Ok(())
}

fn build_flow<B: CameraBackend>(backend: B, config: Config) -> Flow<B> {
    let endpoint = config.upload_endpoint.clone();
    let flow = Flow::new(backend, config, Arc::new(LogNotifier));
    match endpoint {
        Some(endpoint) => flow.with_uploader(Arc::new(HttpUploader::new(endpoint))),
        None => flow,
    }
}

fn load_config(output: Option<PathBuf>) -> Config {
    let mut config = Config::load();
    if output.is_some() {
        config.output_dir = output;
    }
    config
}

fn parse_facing(value: &str) -> Result<FacingMode, String> {
    match value.to_lowercase().as_str() {
        "front" | "user" => Ok(FacingMode::Front),
        "back" | "rear" | "environment" => Ok(FacingMode::Back),
        other => Err(format!("unknown facing mode '{}', expected front or back", other)),
    }
}

// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "framebooth")]
#[command(about = "Composite photos with decorative overlay frames")]
#[command(version = env!("GIT_VERSION"))]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available frames
    Frames,

    /// List available cameras
    Cameras,

    /// Composite an existing photo with a frame
    Snap {
        /// Frame index to use (from 'framebooth frames')
        #[arg(short, long, default_value = "0")]
        frame: usize,

        /// Photo file to composite
        photo: PathBuf,

        /// Output directory (default: ~/Pictures/Framebooth)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Hand the result to the system share surface as well
        #[arg(long)]
        share: bool,
    },

    /// Capture a photo from the camera and composite it with a frame
    Capture {
        /// Frame index to use (from 'framebooth frames')
        #[arg(short, long, default_value = "0")]
        frame: usize,

        /// Camera to use: "front" or "back"
        #[arg(long, default_value = "front")]
        facing: String,

        /// Output directory (default: ~/Pictures/Framebooth)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use an image file as a virtual camera instead of hardware
        #[arg(long, value_name = "IMAGE")]
        r#virtual: Option<PathBuf>,

        /// Hand the result to the system share surface as well
        #[arg(long)]
        share: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=framebooth=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Frames => cli::list_frames(),
        Commands::Cameras => cli::list_cameras(),
        Commands::Snap {
            frame,
            photo,
            output,
            share,
        } => cli::snap(frame, photo, output, share),
        Commands::Capture {
            frame,
            facing,
            output,
            r#virtual,
            share,
        } => cli::capture(frame, &facing, output, r#virtual, share),
    }
}

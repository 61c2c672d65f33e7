//! # Cover-Compositor
//!
//! Finish a rendered video by splicing a still cover image in as its first
//! frame and laying an external soundtrack underneath it.
//!
//! Both steps are optional. When a cover image is supplied, the first frame
//! duration of the video is replaced by the image scaled to the video's size.
//! When an audio file is supplied, it is looped, trimmed and padded to the
//! video's exact length and mixed with any audio the video already carries.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cover_compositor::{
//!     composition::{CompositionPipeline, CompositionRequest, VideoReference},
//!     config::Config,
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let pipeline = CompositionPipeline::with_ffmpeg(Config::default());
//!
//! let request = CompositionRequest::new(VideoReference::single("render.mp4"), "ComfyUI")
//!     .with_cover_image("cover.png")
//!     .with_audio("song.mp3");
//!
//! let output = pipeline.compose(&request)?;
//! println!("{}", output.final_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`media`] - Probed media metadata with exact frame rates
//! - [`filter`] - Typed filter graphs rendered for the encoder
//! - [`tool`] - The encoder boundary and its ffmpeg implementation
//! - [`video`] - Cover frame splicing
//! - [`audio`] - External audio mixing
//! - [`composition`] - The two-stage pipeline and output naming
//! - [`config`] - Configuration management

pub mod audio;
pub mod composition;
pub mod config;
pub mod error;
pub mod filter;
pub mod media;
pub mod tool;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    composition::{CompositionOutput, CompositionPipeline, CompositionRequest, OutputDescriptor, VideoReference},
    config::Config,
    error::{CompositorError, Result},
    media::MediaAsset,
    tool::{FfmpegTool, MediaTool},
};

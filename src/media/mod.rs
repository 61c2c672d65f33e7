//! # Media Probing Module
//!
//! Container and stream metadata for local media files: duration, exact
//! (rational) frame rate, resolution, and the audio streams present.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cover_compositor::tool::{FfmpegTool, MediaTool};
//!
//! # fn main() -> anyhow::Result<()> {
//! let tool = FfmpegTool::new("ffmpeg", "ffprobe");
//! let asset = tool.probe("render.mp4".as_ref())?;
//!
//! println!("{:.2}s, audio: {}", asset.duration_seconds, asset.has_audio());
//! # Ok(())
//! # }
//! ```

pub mod probe;
pub mod types;

pub use types::{AudioStream, FrameRate, MediaAsset, VideoStream};

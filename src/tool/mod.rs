//! # Encoder Boundary
//!
//! The composition stages only ever talk to the external encoder through
//! [`MediaTool`]: `probe` a file, and `run` an [`EncodeJob`] whose filter
//! graphs were built with [`crate::filter`]. [`FfmpegTool`] is the
//! command-line implementation.

pub mod ffmpeg;
pub mod job;

#[cfg(test)]
pub(crate) mod fake;

use std::path::Path;

use tracing::warn;

use crate::error::Result;
use crate::media::MediaAsset;

pub use ffmpeg::FfmpegTool;
pub use job::{Codec, EncodeJob, Track, TrackSource};

/// Narrow interface to an external media encoder
pub trait MediaTool: Send + Sync {
    /// Read container and stream metadata for a local file
    fn probe(&self, path: &Path) -> Result<MediaAsset>;

    /// Run one encode to completion, blocking the caller
    fn run(&self, job: &EncodeJob) -> Result<()>;
}

/// Run `job` and probe what it wrote
///
/// If either step fails, whatever landed at the output path is deleted so a
/// failed stage never leaves a file that looks like a valid result.
pub fn encode_and_probe<T: MediaTool + ?Sized>(tool: &T, job: &EncodeJob) -> Result<MediaAsset> {
    let result = tool.run(job).and_then(|()| tool.probe(&job.output));

    if result.is_err() && job.output.exists() {
        if let Err(e) = std::fs::remove_file(&job.output) {
            warn!("Failed to remove partial output {}: {}", job.output.display(), e);
        }
    }

    result
}

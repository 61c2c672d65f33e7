use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tracing::{debug, info};

use crate::config::ToolConfig;
use crate::error::{CompositionError, CompositorError, ProbeError, Result};
use crate::media::probe::{ensure_exists, parse_probe_output, probe_args};
use crate::media::MediaAsset;
use crate::tool::job::EncodeJob;
use crate::tool::MediaTool;

/// `MediaTool` backed by the `ffmpeg` and `ffprobe` command-line programs
///
/// Every call is a blocking subprocess; callers on an async runtime should
/// go through `spawn_blocking`.
#[derive(Debug, Clone)]
pub struct FfmpegTool {
    ffmpeg: String,
    ffprobe: String,
}

impl FfmpegTool {
    pub fn new(ffmpeg: impl Into<String>, ffprobe: impl Into<String>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    pub fn from_config(config: &ToolConfig) -> Self {
        Self::new(config.ffmpeg.clone(), config.ffprobe.clone())
    }

    /// Whether both programs start and report a version
    pub fn is_available(&self) -> bool {
        [&self.ffmpeg, &self.ffprobe].iter().all(|program| {
            Command::new(program)
                .arg("-version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|status| status.success())
                .unwrap_or(false)
        })
    }

    fn execute(program: &str, args: &[String]) -> Result<Output> {
        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => CompositorError::from(CompositionError::ToolNotFound {
                    tool: program.to_string(),
                }),
                _ => CompositorError::Io(e),
            })
    }
}

impl Default for FfmpegTool {
    fn default() -> Self {
        Self::from_config(&ToolConfig::default())
    }
}

impl MediaTool for FfmpegTool {
    fn probe(&self, path: &Path) -> Result<MediaAsset> {
        ensure_exists(path)?;

        let output = Self::execute(&self.ffprobe, &probe_args(path))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProbeError::Unrecognized {
                path: path.display().to_string(),
                reason: stderr.trim().to_string(),
            }
            .into());
        }

        parse_probe_output(path, &output.stdout)
    }

    fn run(&self, job: &EncodeJob) -> Result<()> {
        let args = job.args()?;
        debug!("Running {} {}", self.ffmpeg, args.join(" "));

        let output = Self::execute(&self.ffmpeg, &args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CompositionError::EncodeFailed {
                output: job.output.display().to_string(),
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            }
            .into());
        }

        if !job.output.is_file() {
            return Err(CompositionError::EncodeFailed {
                output: job.output.display().to_string(),
                status: output.status.to_string(),
                stderr: "encoder exited successfully but wrote no file".to_string(),
            }
            .into());
        }

        info!("Encoded {}", job.output.display());
        Ok(())
    }
}

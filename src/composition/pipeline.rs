use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::audio::AudioMixer;
use crate::composition::naming::Stage;
use crate::config::Config;
use crate::error::{CompositionError, Result};
use crate::media::probe::ensure_exists;
use crate::media::types::file_name_of;
use crate::tool::{FfmpegTool, MediaTool};
use crate::video::CoverFrameSplicer;

/// Reference to a video produced by an upstream node
///
/// Mirrors the host's `[save_output, [file, ...]]` tuple; the last file is
/// the finished video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoReference {
    pub save_output: bool,
    pub files: Vec<PathBuf>,
}

impl VideoReference {
    pub fn new(save_output: bool, files: Vec<PathBuf>) -> Self {
        Self { save_output, files }
    }

    pub fn single<P: Into<PathBuf>>(path: P) -> Self {
        Self::new(true, vec![path.into()])
    }

    /// The video the pipeline works on
    pub fn working_video(&self) -> Result<&Path> {
        self.files.last().map(PathBuf::as_path).ok_or_else(|| {
            CompositionError::InvalidInput {
                details: "video reference lists no files".to_string(),
            }
            .into()
        })
    }

    /// Change-detection key: the referenced file list itself
    pub fn change_token(&self) -> &[PathBuf] {
        &self.files
    }
}

/// Inputs for one composition run
#[derive(Debug, Clone)]
pub struct CompositionRequest {
    pub video: VideoReference,
    pub filename_prefix: String,
    pub audio: Option<PathBuf>,
    pub cover_image: Option<PathBuf>,
    /// Overrides `audio.audio_volume` from the config
    pub audio_volume: Option<f64>,
    /// Overrides `audio.original_audio_volume` from the config
    pub original_audio_volume: Option<f64>,
}

impl CompositionRequest {
    pub fn new(video: VideoReference, filename_prefix: impl Into<String>) -> Self {
        Self {
            video,
            filename_prefix: filename_prefix.into(),
            audio: None,
            cover_image: None,
            audio_volume: None,
            original_audio_volume: None,
        }
    }

    pub fn with_audio<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.audio = Some(path.into());
        self
    }

    pub fn with_cover_image<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.cover_image = Some(path.into());
        self
    }

    pub fn with_volumes(mut self, audio_volume: f64, original_audio_volume: f64) -> Self {
        self.audio_volume = Some(audio_volume);
        self.original_audio_volume = Some(original_audio_volume);
        self
    }
}

/// Preview record handed to the display layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDescriptor {
    pub filename: String,
    pub subfolder: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub format: String,
    pub fullpath: PathBuf,
}

/// Result of a composition run
#[derive(Debug, Clone)]
pub struct CompositionOutput {
    pub final_path: PathBuf,
    pub filename: String,
    pub preview: OutputDescriptor,
    /// Stages that actually ran, in order
    pub stages: Vec<Stage>,
}

impl CompositionOutput {
    /// `{"ui": {"gifs": [preview]}, "result": [[path, filename]]}`
    pub fn host_payload(&self) -> serde_json::Value {
        json!({
            "ui": { "gifs": [self.preview] },
            "result": [[self.final_path, self.filename]],
        })
    }
}

/// Orchestrates the optional cover splice and the optional audio mix
///
/// The pipeline follows a fixed order:
/// 1. Cover Frame - if a cover image is supplied, splice it in as frame zero
/// 2. Audio Mix - if an audio file is supplied, mix it onto the working video
/// 3. Output - describe whichever file came out last
///
/// Each stage blocks until its encode finishes, and a failed stage ends the
/// run with that error.
pub struct CompositionPipeline {
    config: Config,
    tool: Arc<dyn MediaTool>,
}

impl CompositionPipeline {
    pub fn new(config: Config, tool: Arc<dyn MediaTool>) -> Self {
        Self { config, tool }
    }

    /// Pipeline driven by the ffmpeg/ffprobe programs named in the config
    pub fn with_ffmpeg(config: Config) -> Self {
        let tool = Arc::new(FfmpegTool::from_config(&config.tools));
        Self::new(config, tool)
    }

    pub fn compose(&self, request: &CompositionRequest) -> Result<CompositionOutput> {
        let source = request.video.working_video()?;
        let prefix = request.filename_prefix.as_str();

        info!("🎬 Starting composition");
        info!("   Video: {:?}", source);
        info!("   Cover: {:?}", request.cover_image);
        info!("   Audio: {:?}", request.audio);

        let audio_volume = request.audio_volume.unwrap_or(self.config.audio.audio_volume);
        let original_volume = request
            .original_audio_volume
            .unwrap_or(self.config.audio.original_audio_volume);
        for (key, value) in [("audio_volume", audio_volume), ("original_audio_volume", original_volume)] {
            if !value.is_finite() || value < 0.0 {
                return Err(CompositionError::InvalidInput {
                    details: format!("{} must be a finite, non-negative gain, got {}", key, value),
                }
                .into());
            }
        }

        if request.cover_image.is_none() && request.audio.is_none() {
            ensure_exists(source)?;
            info!("   Nothing to apply, passing the input through");
            return Ok(self.finish(source.to_path_buf(), Vec::new()));
        }

        let mut working = self.tool.probe(source)?;
        let mut stages = Vec::new();

        if let Some(image) = &request.cover_image {
            info!("🖼️  Step 1: Cover frame");
            working = CoverFrameSplicer::new(self.tool.as_ref(), &self.config.cover)
                .splice(&working, image, prefix)?;
            stages.push(Stage::Cover);
        }

        if let Some(audio) = &request.audio {
            info!("🎵 Step 2: Audio mix");
            working = AudioMixer::new(self.tool.as_ref(), &self.config.audio)
                .mix(&working, audio, prefix, audio_volume, original_volume)?;
            stages.push(Stage::Audio);
        }

        let output = self.finish(working.path, stages);
        info!("🎉 Composition complete: {:?}", output.final_path);
        Ok(output)
    }

    fn finish(&self, final_path: PathBuf, stages: Vec<Stage>) -> CompositionOutput {
        let filename = file_name_of(&final_path);
        let preview = OutputDescriptor {
            filename: filename.clone(),
            subfolder: self.config.output.subfolder.clone(),
            kind: "output".to_string(),
            format: self.config.output.format.clone(),
            fullpath: final_path.clone(),
        };
        debug!("Output descriptor: {:?}", preview);

        CompositionOutput {
            final_path,
            filename,
            preview,
            stages,
        }
    }
}

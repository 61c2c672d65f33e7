use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for the Cover-Compositor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External encoder locations
    pub tools: ToolConfig,

    /// Cover-frame splicing settings
    pub cover: CoverConfig,

    /// Audio mixing settings
    pub audio: AudioMixConfig,

    /// Output descriptor settings
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.tools.validate()?;
        self.cover.validate()?;
        self.audio.validate()?;
        Ok(())
    }
}

fn require_non_empty(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: format!("{:?}", value),
        }.into());
    }
    Ok(())
}

fn require_volume(key: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }.into());
    }
    Ok(())
}

/// External tool locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Encoder binary name or path
    pub ffmpeg: String,

    /// Prober binary name or path
    pub ffprobe: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

impl ToolConfig {
    fn validate(&self) -> Result<()> {
        require_non_empty("tools.ffmpeg", &self.ffmpeg)?;
        require_non_empty("tools.ffprobe", &self.ffprobe)
    }
}

/// Cover-frame splicing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// Encoder for the re-timed video stream
    pub video_codec: String,

    /// Codec for the carried-over original audio ("copy" keeps it untouched)
    pub audio_codec: String,

    /// Video sync method passed to the encoder
    pub vsync: String,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "copy".to_string(),
            vsync: "2".to_string(),
        }
    }
}

impl CoverConfig {
    fn validate(&self) -> Result<()> {
        require_non_empty("cover.video_codec", &self.video_codec)?;
        require_non_empty("cover.audio_codec", &self.audio_codec)?;
        require_non_empty("cover.vsync", &self.vsync)
    }
}

/// Audio mixing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioMixConfig {
    /// Gain applied to the external audio track
    pub audio_volume: f64,

    /// Gain applied to the video's own audio before mixing
    pub original_audio_volume: f64,

    /// Encoder for the final audio stream
    pub codec: String,

    /// Encoder strictness level
    pub strict: String,
}

impl Default for AudioMixConfig {
    fn default() -> Self {
        Self {
            audio_volume: 0.5,
            original_audio_volume: 0.5,
            codec: "aac".to_string(),
            strict: "experimental".to_string(),
        }
    }
}

impl AudioMixConfig {
    fn validate(&self) -> Result<()> {
        require_volume("audio.audio_volume", self.audio_volume)?;
        require_volume("audio.original_audio_volume", self.original_audio_volume)?;
        require_non_empty("audio.codec", &self.codec)
    }
}

/// Output descriptor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Media-type tag reported to the preview layer
    pub format: String,

    /// Subfolder reported to the preview layer
    pub subfolder: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "video/h264-mp4".to_string(),
            subfolder: String::new(),
        }
    }
}

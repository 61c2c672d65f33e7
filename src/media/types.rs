use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::MetadataError;

/// Exact frame rate as reported by the container (`num/den` frames per second)
///
/// Kept as a ratio so that per-frame durations for rates such as 30000/1001
/// never pick up rounding drift from a pre-divided float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameRate {
    pub num: u32,
    pub den: u32,
}

impl FrameRate {
    /// Create a frame rate, rejecting zero numerators or denominators
    pub fn new(num: u32, den: u32) -> Option<Self> {
        if num == 0 || den == 0 {
            None
        } else {
            Some(Self { num, den })
        }
    }

    /// Parse the `"num/den"` (or plain integer) form used by ffprobe
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        match value.split_once('/') {
            Some((num, den)) => Self::new(num.trim().parse().ok()?, den.trim().parse().ok()?),
            None => Self::new(value.parse().ok()?, 1),
        }
    }

    /// Duration of a single frame, rounded down to the microsecond
    pub fn frame_duration(&self) -> Duration {
        let micros = u64::from(self.den) * 1_000_000 / u64::from(self.num);
        Duration::from_micros(micros)
    }

    /// Frames per second as a float, for display only
    pub fn as_f64(&self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// The primary video stream of a media file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoStream {
    pub index: usize,
    pub width: u32,
    pub height: u32,
    pub frame_rate: FrameRate,
    pub codec: Option<String>,
}

/// One audio stream of a media file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioStream {
    pub index: usize,
    pub codec: Option<String>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u32>,
}

/// Probed description of a local media file
///
/// Never mutated after probing; every file a stage writes is probed again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaAsset {
    pub path: PathBuf,
    pub duration_seconds: f64,
    pub video: Option<VideoStream>,
    pub audio_streams: Vec<AudioStream>,
}

impl MediaAsset {
    /// Whether the file carries at least one audio stream
    pub fn has_audio(&self) -> bool {
        !self.audio_streams.is_empty()
    }

    /// The video stream, or a metadata error for audio-only files
    pub fn video_stream(&self) -> Result<&VideoStream, MetadataError> {
        self.video.as_ref().ok_or_else(|| MetadataError::MissingField {
            path: self.path.display().to_string(),
            field: "video stream".to_string(),
        })
    }

    /// Container duration, rounded to the microsecond ffprobe reports in
    pub fn duration(&self) -> Duration {
        Duration::from_micros((self.duration_seconds.max(0.0) * 1_000_000.0).round() as u64)
    }

    /// The file name component of the asset's path
    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(FrameRate::parse("30/1"), FrameRate::new(30, 1));
        assert_eq!(FrameRate::parse("30000/1001"), FrameRate::new(30000, 1001));
        assert_eq!(FrameRate::parse("25"), FrameRate::new(25, 1));
        assert_eq!(FrameRate::parse("0/0"), None);
        assert_eq!(FrameRate::parse("abc"), None);
    }

    #[test]
    fn test_frame_duration_is_exact_to_the_microsecond() {
        let ntsc = FrameRate::new(30000, 1001).unwrap();
        assert_eq!(ntsc.frame_duration(), Duration::from_micros(33_366));

        let thirty = FrameRate::new(30, 1).unwrap();
        assert_eq!(thirty.frame_duration(), Duration::from_micros(33_333));

        let twenty_five = FrameRate::new(25, 1).unwrap();
        assert_eq!(twenty_five.frame_duration(), Duration::from_millis(40));
    }

    #[test]
    fn test_audio_only_asset_has_no_video_stream() {
        let asset = MediaAsset {
            path: PathBuf::from("/tmp/song.mp3"),
            duration_seconds: 4.0,
            video: None,
            audio_streams: vec![AudioStream {
                index: 0,
                codec: Some("mp3".to_string()),
                sample_rate: Some(44_100),
                channels: Some(2),
            }],
        };

        assert!(asset.has_audio());
        assert!(asset.video_stream().is_err());
        assert_eq!(asset.file_name(), "song.mp3");
        assert_eq!(asset.duration(), Duration::from_secs(4));
    }
}

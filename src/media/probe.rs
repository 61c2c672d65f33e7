use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{MetadataError, ProbeError, Result};
use crate::media::types::{AudioStream, FrameRate, MediaAsset, VideoStream};

#[derive(Debug, Deserialize)]
struct ProbeStream {
    index: usize,
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u32>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

/// Arguments for a JSON stream/format dump of `path`
pub fn probe_args(path: &Path) -> Vec<String> {
    vec![
        "-v".to_string(),
        "error".to_string(),
        "-print_format".to_string(),
        "json".to_string(),
        "-show_streams".to_string(),
        "-show_format".to_string(),
        path.display().to_string(),
    ]
}

/// Fail fast with `FileNotFound` before handing a path to the prober
pub fn ensure_exists(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(ProbeError::FileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    Ok(())
}

/// Check that a cover image decodes and return its native size
pub fn cover_image_dimensions(path: &Path) -> Result<(u32, u32)> {
    ensure_exists(path)?;
    image::image_dimensions(path).map_err(|e| {
        ProbeError::Unrecognized {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Turn ffprobe's JSON dump into a `MediaAsset`
pub fn parse_probe_output(path: &Path, json: &[u8]) -> Result<MediaAsset> {
    let shown = path.display().to_string();
    let parsed: ProbeOutput = serde_json::from_slice(json).map_err(|e| ProbeError::InvalidOutput {
        path: shown.clone(),
        reason: e.to_string(),
    })?;

    if parsed.streams.is_empty() {
        return Err(ProbeError::Unrecognized {
            path: shown,
            reason: "no streams found".to_string(),
        }
        .into());
    }

    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .map(|s| video_stream(&shown, s))
        .transpose()?;

    let audio_streams: Vec<AudioStream> = parsed
        .streams
        .iter()
        .filter(|s| s.codec_type.as_deref() == Some("audio"))
        .map(|s| AudioStream {
            index: s.index,
            codec: s.codec_name.clone(),
            sample_rate: s.sample_rate.as_deref().and_then(|r| r.parse().ok()),
            channels: s.channels,
        })
        .collect();

    let container_duration = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok());

    // Some containers only report per-stream durations
    let duration_seconds = container_duration
        .or_else(|| {
            parsed
                .streams
                .iter()
                .filter_map(|s| s.duration.as_deref().and_then(|d| d.parse::<f64>().ok()))
                .reduce(f64::max)
        })
        .ok_or_else(|| MetadataError::MissingField {
            path: shown.clone(),
            field: "duration".to_string(),
        })?;

    debug!(
        "Probed {}: {:.3}s, video={:?}, audio streams={}",
        shown,
        duration_seconds,
        video.as_ref().map(|v| (v.width, v.height, v.frame_rate.to_string())),
        audio_streams.len()
    );

    Ok(MediaAsset {
        path: path.to_path_buf(),
        duration_seconds,
        video,
        audio_streams,
    })
}

fn video_stream(shown: &str, stream: &ProbeStream) -> Result<VideoStream> {
    let missing = |field: &str| MetadataError::MissingField {
        path: shown.to_string(),
        field: field.to_string(),
    };

    let width = stream.width.ok_or_else(|| missing("width"))?;
    let height = stream.height.ok_or_else(|| missing("height"))?;

    let raw_rate = stream
        .r_frame_rate
        .as_deref()
        .or(stream.avg_frame_rate.as_deref())
        .ok_or_else(|| missing("r_frame_rate"))?;

    let frame_rate = FrameRate::parse(raw_rate)
        .or_else(|| stream.avg_frame_rate.as_deref().and_then(FrameRate::parse))
        .ok_or_else(|| MetadataError::InvalidField {
            path: shown.to_string(),
            field: "r_frame_rate".to_string(),
            value: raw_rate.to_string(),
        })?;

    Ok(VideoStream {
        index: stream.index,
        width,
        height,
        frame_rate,
        codec: stream.codec_name.clone(),
    })
}

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{CompositionError, ProbeError, Result};
use crate::media::{AudioStream, FrameRate, MediaAsset, VideoStream};
use crate::tool::job::EncodeJob;
use crate::tool::MediaTool;

/// In-memory `MediaTool` for tests
///
/// Probes answer from registered assets. Runs record the job, write a
/// placeholder file, and register an output asset that keeps the first
/// input's video and duration and carries audio only if the job maps it.
pub(crate) struct FakeTool {
    assets: Mutex<HashMap<PathBuf, MediaAsset>>,
    jobs: Mutex<Vec<EncodeJob>>,
    fail_runs: Option<String>,
}

impl FakeTool {
    pub fn new() -> Self {
        Self {
            assets: Mutex::new(HashMap::new()),
            jobs: Mutex::new(Vec::new()),
            fail_runs: None,
        }
    }

    /// Every run writes a partial file and then fails with `stderr`
    pub fn failing(stderr: &str) -> Self {
        Self {
            fail_runs: Some(stderr.to_string()),
            ..Self::new()
        }
    }

    /// Create `path` on disk and register its metadata
    pub fn add(&self, asset: MediaAsset) -> MediaAsset {
        std::fs::write(&asset.path, b"fake media").unwrap();
        self.assets.lock().unwrap().insert(asset.path.clone(), asset.clone());
        asset
    }

    pub fn jobs(&self) -> Vec<EncodeJob> {
        self.jobs.lock().unwrap().clone()
    }
}

impl MediaTool for FakeTool {
    fn probe(&self, path: &Path) -> Result<MediaAsset> {
        self.assets
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| {
                ProbeError::FileNotFound {
                    path: path.display().to_string(),
                }
                .into()
            })
    }

    fn run(&self, job: &EncodeJob) -> Result<()> {
        job.validate()?;
        self.jobs.lock().unwrap().push(job.clone());
        std::fs::write(&job.output, b"encoded").unwrap();

        if let Some(stderr) = &self.fail_runs {
            return Err(CompositionError::EncodeFailed {
                output: job.output.display().to_string(),
                status: "exit status: 1".to_string(),
                stderr: stderr.clone(),
            }
            .into());
        }

        let base = self.probe(&job.inputs[0])?;
        let output = MediaAsset {
            path: job.output.clone(),
            duration_seconds: base.duration_seconds,
            video: base.video.clone(),
            audio_streams: if job.audio.is_some() {
                vec![audio_stream(0)]
            } else {
                Vec::new()
            },
        };
        self.assets.lock().unwrap().insert(job.output.clone(), output);
        Ok(())
    }
}

pub(crate) fn audio_stream(index: usize) -> AudioStream {
    AudioStream {
        index,
        codec: Some("aac".to_string()),
        sample_rate: Some(48_000),
        channels: Some(2),
    }
}

pub(crate) fn video_asset(path: PathBuf, seconds: f64, fps: u32, audio_streams: usize) -> MediaAsset {
    MediaAsset {
        path,
        duration_seconds: seconds,
        video: Some(VideoStream {
            index: 0,
            width: 1280,
            height: 720,
            frame_rate: FrameRate { num: fps, den: 1 },
            codec: Some("h264".to_string()),
        }),
        audio_streams: (1..=audio_streams).map(audio_stream).collect(),
    }
}

pub(crate) fn audio_asset(path: PathBuf, seconds: f64) -> MediaAsset {
    MediaAsset {
        path,
        duration_seconds: seconds,
        video: None,
        audio_streams: vec![audio_stream(0)],
    }
}

/// A real decodable PNG for the cover-image check
pub(crate) fn cover_image(path: PathBuf) -> PathBuf {
    image::RgbImage::from_pixel(32, 32, image::Rgb([10, 200, 10]))
        .save(&path)
        .unwrap();
    path
}

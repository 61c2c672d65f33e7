use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::composition::naming::{stage_output, Stage};
use crate::config::CoverConfig;
use crate::error::{CompositionError, Result};
use crate::filter::{Filter, FilterChain, FilterGraph};
use crate::media::probe::cover_image_dimensions;
use crate::media::{MediaAsset, VideoStream};
use crate::tool::{encode_and_probe, Codec, EncodeJob, MediaTool, Track};

/// Replaces the first frame of a video with a still cover image
///
/// The cover is scaled to the video's exact size, shown for one frame
/// duration, and followed by the original video minus its first frame.
/// Total duration and resolution are unchanged; any audio rides along
/// untouched.
pub struct CoverFrameSplicer<'a> {
    tool: &'a dyn MediaTool,
    config: &'a CoverConfig,
}

impl<'a> CoverFrameSplicer<'a> {
    pub fn new(tool: &'a dyn MediaTool, config: &'a CoverConfig) -> Self {
        Self { tool, config }
    }

    /// Splice `image` in as frame zero of `video`
    ///
    /// # Arguments
    ///
    /// * `video` - Probed source video
    /// * `image` - Cover image; any size or aspect ratio
    /// * `prefix` - Output filename prefix
    pub fn splice(&self, video: &MediaAsset, image: &Path, prefix: &str) -> Result<MediaAsset> {
        let (image_width, image_height) = cover_image_dimensions(image)?;
        let stream = video.video_stream()?;
        let frame_duration = stream.frame_rate.frame_duration();

        info!("🖼️  Splicing cover {:?} into {:?}", image, video.path);
        debug!(
            "   Cover {}x{} -> video {}x{} @ {} fps, frame duration {}us",
            image_width,
            image_height,
            stream.width,
            stream.height,
            stream.frame_rate,
            frame_duration.as_micros()
        );

        if frame_duration.is_zero() || video.duration() <= frame_duration {
            return Err(CompositionError::InvalidInput {
                details: format!(
                    "{} is too short ({:.3}s) to replace a {}us frame",
                    video.path.display(),
                    video.duration_seconds,
                    frame_duration.as_micros()
                ),
            }
            .into());
        }

        let graph = cover_graph(stream, frame_duration);
        debug!("   Video graph: {}", graph);

        let (output, filename) = stage_output(&video.path, prefix, Stage::Cover);

        let mut job = EncodeJob::new(
            vec![video.path.clone(), image.to_path_buf()],
            Track::graph(graph, Codec::from_name(&self.config.video_codec)),
            output,
        );
        if video.has_audio() {
            // Full original audio, not re-timed with the video
            job = job.with_audio(Track::stream("0:a", Codec::from_name(&self.config.audio_codec)));
        }
        let job = job.with_option("-vsync", self.config.vsync.clone());

        let spliced = encode_and_probe(self.tool, &job)?;

        info!("   ✅ Cover frame written: {} ({:.2}s)", filename, spliced.duration_seconds);
        Ok(spliced)
    }
}

/// Video-only graph: scaled cover for one frame, then the source from frame one
pub fn cover_graph(stream: &VideoStream, frame_duration: Duration) -> FilterGraph {
    let mut graph = FilterGraph::new();

    graph.push(
        FilterChain::new(["1:v"], "cover")
            .then(Filter::Scale { width: stream.width, height: stream.height })
            .then(Filter::SetSar { num: 1, den: 1 })
            .then(Filter::Trim { start: None, duration: Some(frame_duration) })
            .then(Filter::rebase_pts()),
    );
    graph.push(
        FilterChain::new(["0:v"], "body")
            .then(Filter::Trim { start: Some(frame_duration), duration: None })
            .then(Filter::rebase_pts()),
    );
    graph.push(FilterChain::new(["cover", "body"], "vout").then(Filter::Concat {
        segments: 2,
        video: 1,
        audio: 0,
    }));

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompositorError;
    use crate::media::FrameRate;
    use crate::tool::fake::{cover_image, video_asset, FakeTool};
    use crate::tool::TrackSource;

    #[test]
    fn test_cover_graph_for_thirty_fps() {
        let stream = VideoStream {
            index: 0,
            width: 1920,
            height: 1080,
            frame_rate: FrameRate::new(30, 1).unwrap(),
            codec: None,
        };
        let graph = cover_graph(&stream, stream.frame_rate.frame_duration());

        assert_eq!(
            graph.to_string(),
            "[1:v]scale=1920:1080,setsar=1/1,trim=duration=33333us,setpts=PTS-STARTPTS[cover];\
             [0:v]trim=start=33333us,setpts=PTS-STARTPTS[body];\
             [cover][body]concat=n=2:v=1:a=0[vout]"
        );
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_splice_silent_video_maps_video_only() {
        let dir = tempfile::tempdir().unwrap();
        let tool = FakeTool::new();
        let video = tool.add(video_asset(dir.path().join("clip.mp4"), 10.0, 30, 0));
        let image = cover_image(dir.path().join("cover.png"));
        let config = CoverConfig::default();

        let spliced = CoverFrameSplicer::new(&tool, &config)
            .splice(&video, &image, "job")
            .unwrap();

        assert_eq!(spliced.duration_seconds, video.duration_seconds);
        assert_eq!(spliced.video_stream().unwrap().width, 1280);
        assert!(!spliced.has_audio());
        assert!(spliced.file_name().starts_with("job_cover_"));
        assert!(spliced.file_name().ends_with("_clip.mp4"));
        assert_eq!(spliced.path.parent(), Some(dir.path()));

        let jobs = tool.jobs();
        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        assert_eq!(job.inputs, vec![video.path.clone(), image.clone()]);
        assert!(job.audio.is_none());
        assert!(job.overwrite);
        assert!(job.output_options.contains(&("-vsync".to_string(), "2".to_string())));

        let graph = job.video.filter_graph().unwrap();
        assert!(graph.chain("cover").unwrap().contains("scale"));
        assert!(graph.chain("cover").unwrap().filters.contains(&Filter::Scale { width: 1280, height: 720 }));
    }

    #[test]
    fn test_splice_keeps_original_audio_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let tool = FakeTool::new();
        let video = tool.add(video_asset(dir.path().join("clip.mp4"), 10.0, 25, 1));
        let image = cover_image(dir.path().join("cover.png"));
        let config = CoverConfig::default();

        let spliced = CoverFrameSplicer::new(&tool, &config)
            .splice(&video, &image, "job")
            .unwrap();
        assert!(spliced.has_audio());

        let job = &tool.jobs()[0];
        let audio = job.audio.as_ref().unwrap();
        assert_eq!(audio.source, TrackSource::Stream("0:a".to_string()));
        assert_eq!(audio.codec, Codec::Copy);

        // Audio never enters the filter graph
        let complex = job.filter_complex().unwrap();
        assert!(!complex.contains("0:a"));
        assert!(complex.contains("trim=start=40000us"));
    }

    #[test]
    fn test_failed_encode_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let tool = FakeTool::failing("Invalid frame dimensions 0x0");
        let video = tool.add(video_asset(dir.path().join("clip.mp4"), 10.0, 30, 0));
        let image = cover_image(dir.path().join("cover.png"));
        let config = CoverConfig::default();

        let err = CoverFrameSplicer::new(&tool, &config)
            .splice(&video, &image, "job")
            .unwrap_err();

        assert!(err.to_string().contains("Invalid frame dimensions"));
        let output = &tool.jobs()[0].output;
        assert!(!output.exists());
    }

    #[test]
    fn test_undecodable_cover_is_rejected_before_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let tool = FakeTool::new();
        let video = tool.add(video_asset(dir.path().join("clip.mp4"), 10.0, 30, 0));
        let bogus = dir.path().join("cover.png");
        std::fs::write(&bogus, b"not a png").unwrap();
        let config = CoverConfig::default();

        let err = CoverFrameSplicer::new(&tool, &config)
            .splice(&video, &bogus, "job")
            .unwrap_err();

        assert!(matches!(err, CompositorError::Probe(_)));
        assert!(tool.jobs().is_empty());
    }

    #[test]
    fn test_audio_only_input_is_metadata_error() {
        let dir = tempfile::tempdir().unwrap();
        let tool = FakeTool::new();
        let song = tool.add(crate::tool::fake::audio_asset(dir.path().join("song.mp3"), 4.0));
        let image = cover_image(dir.path().join("cover.png"));
        let config = CoverConfig::default();

        let err = CoverFrameSplicer::new(&tool, &config)
            .splice(&song, &image, "job")
            .unwrap_err();
        assert!(matches!(err, CompositorError::Metadata(_)));
    }
}

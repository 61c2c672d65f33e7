use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::composition::naming::{stage_output, Stage};
use crate::config::AudioMixConfig;
use crate::error::{CompositionError, MetadataError, Result};
use crate::filter::{Filter, FilterChain, FilterGraph};
use crate::media::MediaAsset;
use crate::tool::{encode_and_probe, Codec, EncodeJob, MediaTool, Track};

/// How the external track is stretched to the video's length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopPlan {
    /// Extra repetitions after the first play
    pub extra_loops: u32,
    /// Samples in one play of the external track
    pub buffer_samples: u64,
}

/// Repetitions needed for `audio` to cover `video`, or `None` if it already does
pub fn loop_plan(video_seconds: f64, audio_seconds: f64, sample_rate: u32) -> Option<LoopPlan> {
    if audio_seconds >= video_seconds {
        return None;
    }
    let loops = (video_seconds / audio_seconds).ceil() as u32;
    Some(LoopPlan {
        extra_loops: loops.saturating_sub(1).max(1),
        buffer_samples: (audio_seconds * f64::from(sample_rate)).ceil() as u64,
    })
}

/// Lays an external audio track under a video
///
/// The external track is gain-adjusted, looped when it is shorter than the
/// video, trimmed to the video's length and padded with silence so the final
/// audio length always equals the video length. If the video already has an
/// audio stream it is gain-adjusted and mixed in. Video is stream-copied.
pub struct AudioMixer<'a> {
    tool: &'a dyn MediaTool,
    config: &'a AudioMixConfig,
}

impl<'a> AudioMixer<'a> {
    pub fn new(tool: &'a dyn MediaTool, config: &'a AudioMixConfig) -> Self {
        Self { tool, config }
    }

    /// Mix `audio_path` onto `video` with the configured default gains
    pub fn mix_default(&self, video: &MediaAsset, audio_path: &Path, prefix: &str) -> Result<MediaAsset> {
        self.mix(
            video,
            audio_path,
            prefix,
            self.config.audio_volume,
            self.config.original_audio_volume,
        )
    }

    pub fn mix(
        &self,
        video: &MediaAsset,
        audio_path: &Path,
        prefix: &str,
        audio_volume: f64,
        original_audio_volume: f64,
    ) -> Result<MediaAsset> {
        info!("🎵 Mixing {:?} onto {:?}", audio_path, video.path);

        video.video_stream()?;
        let external = self.tool.probe(audio_path)?;

        if !external.has_audio() {
            return Err(CompositionError::InvalidInput {
                details: format!("{} has no audio stream", audio_path.display()),
            }
            .into());
        }
        if external.duration_seconds <= 0.0 {
            return Err(CompositionError::InvalidInput {
                details: format!("{} has zero duration", audio_path.display()),
            }
            .into());
        }
        if video.audio_streams.len() > 1 {
            return Err(CompositionError::UnsupportedAudioLayout {
                path: video.path.display().to_string(),
                count: video.audio_streams.len(),
            }
            .into());
        }

        debug!(
            "   Video {:.3}s (audio: {}), external {:.3}s, gains {} / {}",
            video.duration_seconds,
            video.has_audio(),
            external.duration_seconds,
            audio_volume,
            original_audio_volume
        );

        let original_volume = video.has_audio().then_some(original_audio_volume);
        let graph = mix_graph(video, &external, audio_volume, original_volume)?;
        debug!("   Audio graph: {}", graph);

        let (output, filename) = stage_output(&video.path, prefix, Stage::Audio);

        let mut job = EncodeJob::new(
            vec![video.path.clone(), audio_path.to_path_buf()],
            Track::stream("0:v", Codec::Copy),
            output,
        )
        .with_audio(Track::graph(graph, Codec::from_name(&self.config.codec)));
        if !self.config.strict.is_empty() {
            job = job.with_option("-strict", self.config.strict.clone());
        }

        let mixed = encode_and_probe(self.tool, &job)?;

        if (mixed.duration_seconds - video.duration_seconds).abs() > 0.1 {
            warn!(
                "   Mixed output is {:.3}s, source video was {:.3}s",
                mixed.duration_seconds, video.duration_seconds
            );
        }

        info!("   ✅ Audio mixed: {} ({:.2}s)", filename, mixed.duration_seconds);
        Ok(mixed)
    }
}

/// Audio-only graph ending in `[aout]`
///
/// External branch: volume, then loop, trim and pad in that order. Looping
/// can overshoot, trimming removes the overshoot, and padding covers any
/// shortfall left by rounding. `original_volume` adds the video's own audio
/// through a two-input mix.
pub fn mix_graph(
    video: &MediaAsset,
    external: &MediaAsset,
    audio_volume: f64,
    original_volume: Option<f64>,
) -> Result<FilterGraph> {
    let target: Duration = video.duration();
    let ext_label = if original_volume.is_some() { "ext" } else { "aout" };

    let mut ext = FilterChain::new(["1:a"], ext_label).then(Filter::Volume(audio_volume));

    let sample_rate = external.audio_streams.first().and_then(|s| s.sample_rate);
    if external.duration_seconds < video.duration_seconds {
        let sample_rate = sample_rate.ok_or_else(|| MetadataError::MissingField {
            path: external.path.display().to_string(),
            field: "sample_rate".to_string(),
        })?;
        if let Some(plan) = loop_plan(video.duration_seconds, external.duration_seconds, sample_rate) {
            ext = ext.then(Filter::ALoop {
                loops: plan.extra_loops,
                size: plan.buffer_samples,
            });
        }
    }

    ext = ext
        .then(Filter::ATrim { duration: target })
        .then(Filter::APad { whole_duration: target });

    let mut graph = FilterGraph::new();
    graph.push(ext);

    if let Some(volume) = original_volume {
        graph.push(
            FilterChain::new(["0:a"], "orig")
                .then(Filter::Volume(volume))
                .then(Filter::ATrim { duration: target }),
        );
        graph.push(FilterChain::new(["orig", "ext"], "aout").then(Filter::AMix { inputs: 2 }));
    }

    graph.validate()?;
    Ok(graph)
}

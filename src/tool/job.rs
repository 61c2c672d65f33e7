use std::path::PathBuf;

use crate::error::{CompositionError, Result};
use crate::filter::FilterGraph;

/// Per-track codec choice at the mux step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Codec {
    /// Stream copy: no re-encode of samples
    Copy,
    Encode(String),
}

impl Codec {
    /// `"copy"` maps to stream copy, anything else names an encoder
    pub fn from_name(name: &str) -> Self {
        if name == "copy" {
            Self::Copy
        } else {
            Self::Encode(name.to_string())
        }
    }

    pub fn as_arg(&self) -> &str {
        match self {
            Self::Copy => "copy",
            Self::Encode(name) => name,
        }
    }
}

/// Where a muxed track comes from
#[derive(Debug, Clone, PartialEq)]
pub enum TrackSource {
    /// An input stream specifier such as `0:v` or `0:a`
    Stream(String),
    /// The final output pad of a filter graph
    Graph(FilterGraph),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub source: TrackSource,
    pub codec: Codec,
}

impl Track {
    pub fn stream(specifier: impl Into<String>, codec: Codec) -> Self {
        Self { source: TrackSource::Stream(specifier.into()), codec }
    }

    pub fn graph(graph: FilterGraph, codec: Codec) -> Self {
        Self { source: TrackSource::Graph(graph), codec }
    }

    pub fn filter_graph(&self) -> Option<&FilterGraph> {
        match &self.source {
            TrackSource::Graph(graph) => Some(graph),
            TrackSource::Stream(_) => None,
        }
    }

    fn map_arg(&self) -> Result<String> {
        match &self.source {
            TrackSource::Stream(spec) => Ok(spec.clone()),
            TrackSource::Graph(graph) => graph
                .output()
                .map(|label| format!("[{}]", label))
                .ok_or_else(|| {
                    CompositionError::GraphConstruction {
                        reason: "track graph has no output pad".to_string(),
                    }
                    .into()
                }),
        }
    }
}

/// One complete encoder invocation: inputs, independent video and audio
/// graphs, and the mux that joins them into `output`
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeJob {
    pub inputs: Vec<PathBuf>,
    pub video: Track,
    pub audio: Option<Track>,
    /// Extra output options in order, e.g. `("-vsync", "2")`
    pub output_options: Vec<(String, String)>,
    pub output: PathBuf,
    pub overwrite: bool,
}

impl EncodeJob {
    pub fn new(inputs: Vec<PathBuf>, video: Track, output: PathBuf) -> Self {
        Self {
            inputs,
            video,
            audio: None,
            output_options: Vec::new(),
            output,
            overwrite: true,
        }
    }

    pub fn with_audio(mut self, audio: Track) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.output_options.push((key.into(), value.into()));
        self
    }

    fn graphs(&self) -> impl Iterator<Item = &FilterGraph> {
        std::iter::once(&self.video)
            .chain(self.audio.as_ref())
            .filter_map(Track::filter_graph)
    }

    /// Check each graph on its own and that the two never share pad labels
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(CompositionError::GraphConstruction {
                reason: "encode job has no inputs".to_string(),
            }
            .into());
        }

        let mut labels: Vec<&str> = Vec::new();
        for graph in self.graphs() {
            graph.validate()?;
            for chain in graph.chains() {
                if labels.contains(&chain.output.as_str()) {
                    return Err(CompositionError::GraphConstruction {
                        reason: format!("pad [{}] appears in both video and audio graphs", chain.output),
                    }
                    .into());
                }
                labels.push(&chain.output);
            }
        }
        Ok(())
    }

    /// The combined `-filter_complex` value; graphs only meet here
    pub fn filter_complex(&self) -> Option<String> {
        let parts: Vec<String> = self
            .graphs()
            .filter(|g| !g.is_empty())
            .map(ToString::to_string)
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(";"))
        }
    }

    /// Full encoder argument list (without the program name)
    pub fn args(&self) -> Result<Vec<String>> {
        self.validate()?;

        let mut args = vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            (if self.overwrite { "-y" } else { "-n" }).to_string(),
        ];

        for input in &self.inputs {
            args.push("-i".to_string());
            args.push(input.display().to_string());
        }

        if let Some(graph) = self.filter_complex() {
            args.push("-filter_complex".to_string());
            args.push(graph);
        }

        args.push("-map".to_string());
        args.push(self.video.map_arg()?);
        if let Some(audio) = &self.audio {
            args.push("-map".to_string());
            args.push(audio.map_arg()?);
        }

        args.push("-c:v".to_string());
        args.push(self.video.codec.as_arg().to_string());
        if let Some(audio) = &self.audio {
            args.push("-c:a".to_string());
            args.push(audio.codec.as_arg().to_string());
        }

        for (key, value) in &self.output_options {
            args.push(key.clone());
            args.push(value.clone());
        }

        args.push(self.output.display().to_string());
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Filter, FilterChain};

    fn audio_graph(output: &str) -> FilterGraph {
        let mut graph = FilterGraph::new();
        graph.push(FilterChain::new(["1:a"], output).then(Filter::Volume(0.5)));
        graph
    }

    #[test]
    fn test_codec_from_name() {
        assert_eq!(Codec::from_name("copy"), Codec::Copy);
        assert_eq!(Codec::from_name("aac"), Codec::Encode("aac".to_string()));
    }

    #[test]
    fn test_stream_copy_args() {
        let job = EncodeJob::new(
            vec![PathBuf::from("in.mp4"), PathBuf::from("song.mp3")],
            Track::stream("0:v", Codec::Copy),
            PathBuf::from("out.mp4"),
        )
        .with_audio(Track::graph(audio_graph("aout"), Codec::from_name("aac")))
        .with_option("-strict", "experimental");

        let args = job.args().unwrap();
        let joined = args.join(" ");

        assert_eq!(args.last().map(String::as_str), Some("out.mp4"));
        assert!(joined.contains("-i in.mp4 -i song.mp3"));
        assert!(joined.contains("-filter_complex [1:a]volume=0.5[aout]"));
        assert!(joined.contains("-map 0:v -map [aout]"));
        assert!(joined.contains("-c:v copy -c:a aac"));
        assert!(joined.contains("-strict experimental"));
        assert!(args.contains(&"-y".to_string()));
    }

    #[test]
    fn test_no_overwrite_flag() {
        let mut job = EncodeJob::new(
            vec![PathBuf::from("in.mp4")],
            Track::stream("0:v", Codec::Copy),
            PathBuf::from("out.mp4"),
        );
        job.overwrite = false;

        let args = job.args().unwrap();
        assert!(args.contains(&"-n".to_string()));
        assert!(!args.contains(&"-filter_complex".to_string()));
    }

    #[test]
    fn test_shared_labels_rejected() {
        let mut video = FilterGraph::new();
        video.push(FilterChain::new(["0:v"], "out").then(Filter::rebase_pts()));

        let job = EncodeJob::new(
            vec![PathBuf::from("in.mp4")],
            Track::graph(video, Codec::from_name("libx264")),
            PathBuf::from("out.mp4"),
        )
        .with_audio(Track::graph(audio_graph("out"), Codec::from_name("aac")));

        assert!(job.validate().is_err());
    }
}

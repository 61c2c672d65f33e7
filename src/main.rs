use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};

use cover_compositor::{
    composition::{CompositionPipeline, CompositionRequest, VideoReference},
    config::Config,
    FfmpegTool,
};

#[derive(Parser)]
#[command(
    name = "cover-compositor",
    version,
    about = "Splice a cover frame into a video and mix in an external soundtrack",
    long_about = "Cover-Compositor finishes a rendered video: an optional cover image replaces the first frame, and an optional audio file is looped, trimmed and mixed under the picture."
)]
struct Cli {
    /// Input video; may be repeated, the last one is used
    #[arg(short, long, required_unless_present = "filenames_json")]
    video: Vec<PathBuf>,

    /// Upstream filenames tuple as JSON, e.g. '[true, ["a.png", "a.mp4"]]'
    #[arg(long, conflicts_with = "video")]
    filenames_json: Option<String>,

    /// Output filename prefix
    #[arg(short, long, default_value = "ComfyUI")]
    prefix: String,

    /// External audio file to mix in
    #[arg(short, long)]
    audio: Option<PathBuf>,

    /// Cover image to use as the first frame
    #[arg(long)]
    cover: Option<PathBuf>,

    /// Gain for the external audio (defaults to the config value)
    #[arg(long)]
    audio_volume: Option<f64>,

    /// Gain for the video's own audio (defaults to the config value)
    #[arg(long)]
    original_volume: Option<f64>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the ffmpeg binary
    #[arg(long)]
    ffmpeg: Option<String>,

    /// Override the ffprobe binary
    #[arg(long)]
    ffprobe: Option<String>,

    /// Print the host payload as JSON instead of the output path
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so --json output stays clean
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Cover-Compositor v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => Config::default(),
    };
    if let Some(ffmpeg) = cli.ffmpeg {
        config.tools.ffmpeg = ffmpeg;
    }
    if let Some(ffprobe) = cli.ffprobe {
        config.tools.ffprobe = ffprobe;
    }
    config.validate()?;

    if !FfmpegTool::from_config(&config.tools).is_available() {
        anyhow::bail!(
            "'{}' / '{}' not available. Install FFmpeg and make sure it is on PATH.",
            config.tools.ffmpeg,
            config.tools.ffprobe
        );
    }

    let reference = match cli.filenames_json {
        Some(json) => serde_json::from_str::<VideoReference>(&json)
            .context("--filenames-json must look like [save_output, [paths...]]")?,
        None => VideoReference::new(true, cli.video),
    };

    let mut request = CompositionRequest::new(reference, cli.prefix);
    request.audio = cli.audio;
    request.cover_image = cli.cover;
    request.audio_volume = cli.audio_volume;
    request.original_audio_volume = cli.original_volume;

    let pipeline = CompositionPipeline::with_ffmpeg(config);

    // Encodes are blocking subprocesses
    let output = tokio::task::spawn_blocking(move || pipeline.compose(&request))
        .await
        .context("composition task panicked")?
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output.host_payload())?);
    } else {
        println!("{}", output.final_path.display());
    }
    Ok(())
}

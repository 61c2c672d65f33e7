// Diagnostic binary: print what the pipeline sees for each media file

use std::path::PathBuf;

use cover_compositor::{media::probe::cover_image_dimensions, FfmpegTool, MediaTool};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        eprintln!("usage: probe-media <FILE>...");
        std::process::exit(2);
    }

    let tool = FfmpegTool::default();
    if !tool.is_available() {
        eprintln!("❌ FFmpeg not available. Install with:");
        eprintln!("   macOS: brew install ffmpeg");
        eprintln!("   Ubuntu: sudo apt install ffmpeg");
        std::process::exit(1);
    }

    for path in paths {
        println!("\n{}", path.display());

        let probe_path = path.clone();
        let probe_tool = tool.clone();
        match tokio::task::spawn_blocking(move || probe_tool.probe(&probe_path)).await? {
            Ok(asset) => {
                println!("   Duration: {:.3}s", asset.duration_seconds);
                match &asset.video {
                    Some(video) => println!(
                        "   Video: {}x{} @ {} ({:.3} fps), frame duration {}us",
                        video.width,
                        video.height,
                        video.frame_rate,
                        video.frame_rate.as_f64(),
                        video.frame_rate.frame_duration().as_micros()
                    ),
                    None => println!("   Video: none"),
                }
                for audio in &asset.audio_streams {
                    println!(
                        "   Audio #{}: {} {:?} Hz, {:?} channels",
                        audio.index,
                        audio.codec.as_deref().unwrap_or("unknown"),
                        audio.sample_rate,
                        audio.channels
                    );
                }
                println!("{}", serde_json::to_string_pretty(&asset)?);
            }
            Err(e) => println!("   ❌ {}", e.user_message()),
        }

        if let Ok((width, height)) = cover_image_dimensions(&path) {
            println!("   Usable as cover image: {}x{}", width, height);
        }
    }

    Ok(())
}

//! # Audio Mixing Module
//!
//! Lays an external soundtrack under a video: gain, loop, trim and pad the
//! external track to the video's exact length, then mix it with the video's
//! own audio if there is any. The picture is stream-copied.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cover_compositor::{audio::AudioMixer, config::AudioMixConfig};
//! use cover_compositor::tool::{FfmpegTool, MediaTool};
//!
//! # fn main() -> anyhow::Result<()> {
//! let tool = FfmpegTool::default();
//! let config = AudioMixConfig::default();
//!
//! let video = tool.probe("render.mp4".as_ref())?;
//! let mixed = AudioMixer::new(&tool, &config).mix(&video, "song.mp3".as_ref(), "ComfyUI", 0.8, 0.3)?;
//!
//! println!("Mixed into {}", mixed.path.display());
//! # Ok(())
//! # }
//! ```

pub mod mixer;

pub use mixer::{loop_plan, mix_graph, AudioMixer, LoopPlan};

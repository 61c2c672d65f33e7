use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use crate::media::types::file_name_of;

static LAST_STAMP_MICROS: AtomicI64 = AtomicI64::new(0);

/// Which stage wrote a file; embedded in the output name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Cover,
    Audio,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Cover => "cover",
            Stage::Audio => "audio",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Epoch seconds with microseconds, strictly increasing within the process
pub fn unique_timestamp() -> String {
    let now = Utc::now().timestamp_micros();
    let previous = LAST_STAMP_MICROS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
        .unwrap_or(now);
    let stamp = now.max(previous + 1);

    format!("{}.{:06}", stamp.div_euclid(1_000_000), stamp.rem_euclid(1_000_000))
}

/// `{prefix}_{stage}_{timestamp}_{source_name}`
pub fn stage_filename(prefix: &str, stage: Stage, source_name: &str) -> String {
    format!("{}_{}_{}_{}", prefix, stage, unique_timestamp(), source_name)
}

/// Output path next to `source`, plus the bare file name
pub fn stage_output(source: &Path, prefix: &str, stage: Stage) -> (PathBuf, String) {
    let filename = stage_filename(prefix, stage, &file_name_of(source));
    let dir = source.parent().unwrap_or_else(|| Path::new(""));
    (dir.join(&filename), filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_filename_layout() {
        let name = stage_filename("ComfyUI", Stage::Cover, "render_00001.mp4");
        let parts: Vec<&str> = name.splitn(4, '_').collect();

        assert_eq!(parts[0], "ComfyUI");
        assert_eq!(parts[1], "cover");
        let (secs, micros) = parts[2].split_once('.').unwrap();
        assert!(secs.parse::<i64>().unwrap() > 1_600_000_000);
        assert_eq!(micros.len(), 6);
        assert_eq!(parts[3], "render_00001.mp4");
    }

    #[test]
    fn test_timestamps_never_repeat() {
        let stamps: HashSet<String> = (0..1000).map(|_| unique_timestamp()).collect();
        assert_eq!(stamps.len(), 1000);
    }

    #[test]
    fn test_timestamps_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..250).map(|_| unique_timestamp()).collect::<Vec<_>>()))
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for stamp in handle.join().unwrap() {
                assert!(all.insert(stamp));
            }
        }
    }

    #[test]
    fn test_output_lands_next_to_source() {
        let (path, filename) = stage_output(Path::new("/renders/out/clip.mp4"), "job", Stage::Audio);

        assert_eq!(path.parent(), Some(Path::new("/renders/out")));
        assert!(filename.starts_with("job_audio_"));
        assert!(filename.ends_with("_clip.mp4"));
        assert_eq!(path.file_name().unwrap().to_string_lossy(), filename);
    }
}

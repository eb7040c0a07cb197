use std::env;
use std::path::PathBuf;

/// Runtime configuration for the recorder backend.
///
/// Constructed once in `main` and handed to components through `AppState`;
/// there are no ambient globals.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Listening port (default: 5000)
    pub port: u16,

    /// Directory holding every recorded artifact, created at startup if absent
    /// (default: "videos")
    pub video_dir: PathBuf,

    /// Name of the external transcoder binary (default: "ffmpeg")
    pub ffmpeg_bin: String,

    /// Enable transcoding finalized recordings to MP4 (default: true)
    pub enable_transcode: bool,

    /// Maximum accepted request body size in bytes (default: 64 MiB)
    pub max_chunk_size: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            video_dir: PathBuf::from("videos"),
            ffmpeg_bin: "ffmpeg".to_string(),
            enable_transcode: true,
            max_chunk_size: 64 * 1024 * 1024, // 64 MiB
        }
    }
}

impl RecorderConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            video_dir: env::var("VIDEO_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.video_dir),

            ffmpeg_bin: env::var("FFMPEG_BIN").unwrap_or(default.ffmpeg_bin),

            enable_transcode: env::var("ENABLE_TRANSCODE")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(default.enable_transcode),

            max_chunk_size: env::var("MAX_CHUNK_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_chunk_size),
        }
    }
}

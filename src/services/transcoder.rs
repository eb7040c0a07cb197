use crate::config::RecorderConfig;
use anyhow::{Context, bail};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::info;

/// Converts a raw recording into a broadly playable container.
///
/// Modeled as a capability so the finalize path can be exercised in tests
/// without an ffmpeg binary on the host.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Probes whether the external tool is usable on this host.
    async fn is_available(&self) -> bool;

    /// Re-encodes `input` into `output`. The call blocks until the external
    /// process exits; there is no timeout or cancellation.
    async fn transcode(&self, input: &Path, output: &Path) -> anyhow::Result<()>;
}

/// Shells out to ffmpeg with fixed parameters: 10 fps output, constant-quality
/// H.264, yuv420p for broad playback compatibility, faststart layout for
/// progressive playback.
pub struct FfmpegTranscoder {
    binary: String,
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    async fn transcode(&self, input: &Path, output: &Path) -> anyhow::Result<()> {
        let status = Command::new(&self.binary)
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args([
                "-r", "10", "-c:v", "libx264", "-preset", "veryfast", "-crf", "18", "-pix_fmt",
                "yuv420p", "-movflags", "+faststart",
            ])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .with_context(|| format!("failed to spawn {}", self.binary))?;

        if !status.success() {
            bail!("{} exited with {}", self.binary, status);
        }
        if !tokio::fs::try_exists(output).await.unwrap_or(false) {
            bail!("{} reported success but produced no output", self.binary);
        }
        Ok(())
    }
}

/// Transcoder that is never available; finalize keeps the raw container.
pub struct NoopTranscoder;

#[async_trait]
impl Transcoder for NoopTranscoder {
    async fn is_available(&self) -> bool {
        false
    }

    async fn transcode(&self, _input: &Path, _output: &Path) -> anyhow::Result<()> {
        bail!("transcoding is disabled")
    }
}

pub fn setup_transcoder(config: &RecorderConfig) -> Arc<dyn Transcoder> {
    if config.enable_transcode {
        info!("🎞️  Transcoder: {} (mp4, 10 fps)", config.ffmpeg_bin);
        Arc::new(FfmpegTranscoder::new(&config.ffmpeg_bin))
    } else {
        info!("🎞️  Transcoder disabled, keeping raw recordings");
        Arc::new(NoopTranscoder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_unavailable() {
        let transcoder = FfmpegTranscoder::new("definitely-not-an-installed-binary");
        assert!(!transcoder.is_available().await);
    }

    #[tokio::test]
    async fn missing_binary_fails_transcode() {
        let transcoder = FfmpegTranscoder::new("definitely-not-an-installed-binary");
        let err = transcoder
            .transcode(Path::new("in.webm"), Path::new("out.mp4"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to spawn"));
    }

    #[tokio::test]
    async fn noop_is_never_available() {
        assert!(!NoopTranscoder.is_available().await);
    }
}

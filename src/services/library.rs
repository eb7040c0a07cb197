use crate::utils::time::format_system_time;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;
use utoipa::ToSchema;

/// One row of the `/status` listing, derived on demand from filesystem
/// metadata. Never persisted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VideoEntry {
    pub filename: String,
    pub bytes: u64,
    /// Modification time, `%Y-%m-%dT%H:%M:%SZ`
    pub modified: String,
    /// Fetch URL for this artifact
    pub url: String,
    /// Container format: "mp4" or "webm"
    #[serde(rename = "type")]
    pub kind: String,
}

/// Read-only view over the artifact directory.
#[derive(Debug, Clone)]
pub struct VideoLibrary {
    root: PathBuf,
}

impl VideoLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Lists finished videos (both container formats), newest first.
    ///
    /// Partial uploads carry a `.partial` suffix and never match.
    pub async fn list_videos(&self) -> std::io::Result<Vec<VideoEntry>> {
        let mut rows: Vec<(SystemTime, VideoEntry)> = Vec::new();
        let mut dir = fs::read_dir(&self.root).await?;

        while let Some(entry) = dir.next_entry().await? {
            let Ok(filename) = entry.file_name().into_string() else {
                continue;
            };
            let kind = match Path::new(&filename).extension().and_then(|e| e.to_str()) {
                Some("mp4") => "mp4",
                Some("webm") => "webm",
                _ => continue,
            };
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata.modified().unwrap_or(UNIX_EPOCH);
            rows.push((
                modified,
                VideoEntry {
                    url: format!("/video/{filename}"),
                    filename,
                    bytes: metadata.len(),
                    modified: format_system_time(modified),
                    kind: kind.to_string(),
                },
            ));
        }

        rows.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(rows.into_iter().map(|(_, entry)| entry).collect())
    }

    /// The artifact `/latest` should serve: the newest transcoded video if any
    /// exists, otherwise the newest video overall.
    pub async fn latest_video(&self) -> std::io::Result<Option<VideoEntry>> {
        let videos = self.list_videos().await?;
        Ok(videos
            .iter()
            .find(|v| v.kind == "mp4")
            .or_else(|| videos.first())
            .cloned())
    }

    /// Most recently modified snapshot image, if any.
    pub async fn latest_snapshot(&self) -> std::io::Result<Option<PathBuf>> {
        let mut newest: Option<(SystemTime, PathBuf)> = None;
        let mut dir = fs::read_dir(&self.root).await?;

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("jpg") {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata.modified().unwrap_or(UNIX_EPOCH);
            if newest.as_ref().is_none_or(|(t, _)| modified > *t) {
                newest = Some((modified, path));
            }
        }

        Ok(newest.map(|(_, path)| path))
    }
}

use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncRead, AsyncWriteExt};

/// The file classes a recording session can leave behind.
///
/// Everything lives flat in one directory as `{session}.{extension}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// In-progress upload target, renamed on finalize
    PartialVideo,
    /// Finalized raw recording as produced by the browser
    Video,
    /// Transcoded, broadly playable copy
    TranscodedVideo,
    /// Most recent still image for the session
    Snapshot,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::PartialVideo => "webm.partial",
            ArtifactKind::Video => "webm",
            ArtifactKind::TranscodedVideo => "mp4",
            ArtifactKind::Snapshot => "jpg",
        }
    }
}

/// Flat on-disk store for recording artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Opens the store, creating the directory if absent.
    pub async fn open(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn artifact_path(&self, session: &str, kind: ArtifactKind) -> PathBuf {
        self.root.join(self.artifact_name(session, kind))
    }

    pub fn artifact_name(&self, session: &str, kind: ArtifactKind) -> String {
        format!("{}.{}", session, kind.extension())
    }

    /// Appends uploaded bytes to the session's partial file, creating it on
    /// first use. Returns the new total size of the partial file.
    pub async fn append_chunk(
        &self,
        session: &str,
        mut chunk: impl AsyncRead + Unpin + Send,
    ) -> std::io::Result<u64> {
        let path = self.artifact_path(session, ArtifactKind::PartialVideo);
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .await?;
        tokio::io::copy(&mut chunk, &mut file).await?;
        file.flush().await?;
        Ok(file.metadata().await?.len())
    }

    /// Truncate-and-write the session's snapshot. A new snapshot destroys the
    /// previous one. Returns the snapshot's filename.
    pub async fn write_snapshot(&self, session: &str, bytes: &[u8]) -> std::io::Result<String> {
        let path = self.artifact_path(session, ArtifactKind::Snapshot);
        fs::write(&path, bytes).await?;
        Ok(self.artifact_name(session, ArtifactKind::Snapshot))
    }

    pub async fn exists(&self, session: &str, kind: ArtifactKind) -> std::io::Result<bool> {
        fs::try_exists(self.artifact_path(session, kind)).await
    }

    /// Consumes the partial file by renaming it to its finalized name.
    /// A finalized video is never reopened for append.
    pub async fn promote_partial(&self, session: &str) -> std::io::Result<String> {
        fs::rename(
            self.artifact_path(session, ArtifactKind::PartialVideo),
            self.artifact_path(session, ArtifactKind::Video),
        )
        .await?;
        Ok(self.artifact_name(session, ArtifactKind::Video))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_naming() {
        let store = ArtifactStore {
            root: PathBuf::from("/data/videos"),
        };
        assert_eq!(
            store.artifact_path("abc", ArtifactKind::PartialVideo),
            PathBuf::from("/data/videos/abc.webm.partial")
        );
        assert_eq!(store.artifact_name("abc", ArtifactKind::Video), "abc.webm");
        assert_eq!(
            store.artifact_name("abc", ArtifactKind::TranscodedVideo),
            "abc.mp4"
        );
        assert_eq!(store.artifact_name("abc", ArtifactKind::Snapshot), "abc.jpg");
    }

    #[tokio::test]
    async fn append_accumulates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path()).await.unwrap();

        assert_eq!(store.append_chunk("s1", &b"hello "[..]).await.unwrap(), 6);
        assert_eq!(store.append_chunk("s1", &b"world"[..]).await.unwrap(), 11);

        let bytes = fs::read(store.artifact_path("s1", ArtifactKind::PartialVideo))
            .await
            .unwrap();
        assert_eq!(bytes, b"hello world");
    }

    #[tokio::test]
    async fn snapshot_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path()).await.unwrap();

        store.write_snapshot("s1", b"first").await.unwrap();
        let name = store.write_snapshot("s1", b"second").await.unwrap();
        assert_eq!(name, "s1.jpg");

        let bytes = fs::read(store.artifact_path("s1", ArtifactKind::Snapshot))
            .await
            .unwrap();
        assert_eq!(bytes, b"second");
    }

    #[tokio::test]
    async fn promote_consumes_partial() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path()).await.unwrap();

        store.append_chunk("s1", &b"data"[..]).await.unwrap();
        let name = store.promote_partial("s1").await.unwrap();
        assert_eq!(name, "s1.webm");

        assert!(!store.exists("s1", ArtifactKind::PartialVideo).await.unwrap());
        assert!(store.exists("s1", ArtifactKind::Video).await.unwrap());
    }
}

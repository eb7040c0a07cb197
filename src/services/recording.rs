use crate::services::storage::{ArtifactKind, ArtifactStore};
use crate::services::transcoder::Transcoder;
use crate::utils::session_locks::SessionLocks;
use std::sync::Arc;
use tokio::io::AsyncRead;
use tracing::{info, warn};

/// Result of a finalize request.
#[derive(Debug)]
pub enum FinalizeOutcome {
    /// Partial file was promoted now; transcoding was attempted.
    Finalized { webm: String, mp4: Option<String> },
    /// A finalized video already existed; nothing was touched.
    AlreadyFinalized { webm: String, mp4: Option<String> },
    /// Neither a partial nor a finalized video exists for the session.
    NothingRecorded,
}

/// Recording lifecycle: chunk intake, snapshot overwrite, finalize.
///
/// All mutating operations for one session are serialized through
/// [`SessionLocks`]; different sessions proceed concurrently.
pub struct RecordingService {
    store: ArtifactStore,
    transcoder: Arc<dyn Transcoder>,
    locks: SessionLocks,
}

impl RecordingService {
    pub fn new(store: ArtifactStore, transcoder: Arc<dyn Transcoder>) -> Self {
        Self {
            store,
            transcoder,
            locks: SessionLocks::new(),
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Appends one uploaded chunk; returns the new total partial size.
    pub async fn append_chunk(
        &self,
        session: &str,
        chunk: impl AsyncRead + Unpin + Send,
    ) -> std::io::Result<u64> {
        let _guard = self.locks.lock(session).await;
        self.store.append_chunk(session, chunk).await
    }

    /// Overwrites the session's snapshot; returns the snapshot filename.
    pub async fn write_snapshot(&self, session: &str, bytes: &[u8]) -> std::io::Result<String> {
        let _guard = self.locks.lock(session).await;
        self.store.write_snapshot(session, bytes).await
    }

    /// Finalizes a recording.
    ///
    /// Idempotent: a second call returns the existing names without touching
    /// the files or re-running the transcoder. The transcode step is best
    /// effort; its failure never fails finalization.
    pub async fn finalize(&self, session: &str) -> std::io::Result<FinalizeOutcome> {
        let _guard = self.locks.lock(session).await;

        if self.store.exists(session, ArtifactKind::Video).await? {
            let mp4 = if self.store.exists(session, ArtifactKind::TranscodedVideo).await? {
                Some(self.store.artifact_name(session, ArtifactKind::TranscodedVideo))
            } else {
                None
            };
            return Ok(FinalizeOutcome::AlreadyFinalized {
                webm: self.store.artifact_name(session, ArtifactKind::Video),
                mp4,
            });
        }

        if !self.store.exists(session, ArtifactKind::PartialVideo).await? {
            return Ok(FinalizeOutcome::NothingRecorded);
        }

        let webm = self.store.promote_partial(session).await?;
        info!("📼 Finalized recording {webm}");

        let mp4 = self.transcode_best_effort(session).await;
        Ok(FinalizeOutcome::Finalized { webm, mp4 })
    }

    async fn transcode_best_effort(&self, session: &str) -> Option<String> {
        if !self.transcoder.is_available().await {
            warn!("Transcoder unavailable, keeping raw container for {session}");
            return None;
        }

        let input = self.store.artifact_path(session, ArtifactKind::Video);
        let output = self.store.artifact_path(session, ArtifactKind::TranscodedVideo);
        match self.transcoder.transcode(&input, &output).await {
            Ok(()) => {
                let name = self.store.artifact_name(session, ArtifactKind::TranscodedVideo);
                info!("🎞️  Transcoded {name}");
                Some(name)
            }
            Err(e) => {
                warn!("Transcode failed for {session}: {e:#}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::transcoder::NoopTranscoder;

    async fn service(dir: &std::path::Path) -> RecordingService {
        let store = ArtifactStore::open(dir).await.unwrap();
        RecordingService::new(store, Arc::new(NoopTranscoder))
    }

    #[tokio::test]
    async fn finalize_without_upload_reports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = service(dir.path()).await;
        assert!(matches!(
            recorder.finalize("ghost").await.unwrap(),
            FinalizeOutcome::NothingRecorded
        ));
    }

    #[tokio::test]
    async fn finalize_promotes_then_replays() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = service(dir.path()).await;

        recorder.append_chunk("s1", &b"chunk"[..]).await.unwrap();

        match recorder.finalize("s1").await.unwrap() {
            FinalizeOutcome::Finalized { webm, mp4 } => {
                assert_eq!(webm, "s1.webm");
                assert!(mp4.is_none());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        // second call is idempotent
        match recorder.finalize("s1").await.unwrap() {
            FinalizeOutcome::AlreadyFinalized { webm, mp4 } => {
                assert_eq!(webm, "s1.webm");
                assert!(mp4.is_none());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}

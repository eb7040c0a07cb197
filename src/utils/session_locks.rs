use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Serializes filesystem operations per session identifier.
///
/// Append, snapshot overwrite and the finalize rename for one session must
/// not interleave; recordings for different sessions stay fully concurrent.
#[derive(Debug, Clone, Default)]
pub struct SessionLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self {
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Acquires the lock for the given session identifier.
    /// The lock is released when the returned guard is dropped.
    pub async fn lock(&self, session: &str) -> tokio::sync::OwnedMutexGuard<()> {
        let mutex = self
            .locks
            .entry(session.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();

        // The inner Arc<Mutex> is held by the DashMap, so it won't disappear
        // while a guard is outstanding. Entries stay in the map until cleanup()
        // runs; session counts are small enough that this is not a concern.
        mutex.lock_owned().await
    }

    /// Removes locks that are not currently held by any task.
    pub fn cleanup(&self) {
        self.locks.retain(|_, mutex| Arc::strong_count(mutex) > 1);
    }
}

//! File-based Session Store Adapter
//!
//! Keeps all checkout sessions in a single pretty-printed JSON object keyed
//! by session id, in insertion order. The file is small, bounded and meant to
//! be readable by an operator.
//!
//! Writes go to a sibling temp file which is then renamed over the original,
//! so a crash never leaves a half-written collection behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::foundation::{CheckoutSessionId, Timestamp};
use crate::domain::payment::{CheckoutSession, SessionStatus, StoreError};
use crate::ports::{
    RecordingClaim, SessionStats, SessionStore, StatusUpdate, DEFAULT_MAX_SESSIONS,
    RECORDING_LEASE_SECS,
};

use super::session_map::SessionMap;

/// JSON file backed session store.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
    max_sessions: usize,
}

impl FileSessionStore {
    /// Create a store for the given file. The file is created on first write.
    ///
    /// # Example
    /// ```ignore
    /// let store = FileSessionStore::new("./data/paymongo_sessions.json");
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Arc::new(Mutex::new(())),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    /// Share a write lock with other handles on the same file.
    pub fn with_lock(mut self, lock: Arc<Mutex<()>>) -> Self {
        self.lock = lock;
        self
    }

    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions;
        self
    }

    /// The write lock, for handing to another handle.
    pub fn lock(&self) -> Arc<Mutex<()>> {
        Arc::clone(&self.lock)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<SessionMap, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(SessionMap::default()),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(SessionMap::default());
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Session file is not valid JSON");
            StoreError::Corrupted(e.to_string())
        })
    }

    async fn write_all(&self, sessions: &SessionMap) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;
        }

        let json = serde_json::to_vec_pretty(sessions)
            .map_err(|e| StoreError::Io(format!("Failed to serialize sessions: {}", e)))?;

        let tmp_path = self.temp_path();
        let mut file = fs::File::create(&tmp_path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        file.write_all(&json)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        file.sync_all()
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        drop(file);

        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "sessions.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn trim(&self, sessions: &mut SessionMap) {
        let evicted = sessions.evict_oldest(self.max_sessions);
        if evicted > 0 {
            tracing::debug!(evicted, max_sessions = self.max_sessions, "Evicted oldest sessions");
        }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(
        &self,
        session_id: &CheckoutSessionId,
    ) -> Result<Option<CheckoutSession>, StoreError> {
        let sessions = self.read_all().await?;
        Ok(sessions.get(session_id).cloned())
    }

    async fn save(&self, session: &CheckoutSession) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;

        let mut sessions = self.read_all().await?;
        if !sessions.insert(session)? {
            return Ok(());
        }
        self.trim(&mut sessions);
        self.write_all(&sessions).await
    }

    async fn update_status(
        &self,
        session_id: &CheckoutSessionId,
        status: SessionStatus,
    ) -> Result<StatusUpdate, StoreError> {
        let _guard = self.lock.lock().await;

        let mut sessions = self.read_all().await?;
        let outcome = sessions.set_status(session_id, status, Timestamp::now())?;
        if outcome == StatusUpdate::Updated {
            self.trim(&mut sessions);
            self.write_all(&sessions).await?;
        }
        Ok(outcome)
    }

    async fn begin_recording(
        &self,
        candidate: &CheckoutSession,
    ) -> Result<RecordingClaim, StoreError> {
        let _guard = self.lock.lock().await;

        let mut sessions = self.read_all().await?;
        let claim = sessions.begin_recording(candidate, Timestamp::now(), RECORDING_LEASE_SECS);
        if claim.is_held() {
            self.trim(&mut sessions);
            self.write_all(&sessions).await?;
        }
        Ok(claim)
    }

    async fn release_recording(&self, session_id: &CheckoutSessionId) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;

        let mut sessions = self.read_all().await?;
        if sessions.release_recording(session_id) {
            self.write_all(&sessions).await?;
        }
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<CheckoutSession>, StoreError> {
        Ok(self.read_all().await?.recent(limit))
    }

    async fn stats(&self) -> Result<SessionStats, StoreError> {
        Ok(self.read_all().await?.stats())
    }
}

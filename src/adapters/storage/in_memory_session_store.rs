//! In-Memory Session Store Adapter
//!
//! Same semantics as the file store without touching disk.
//! Useful for testing and development.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::foundation::{CheckoutSessionId, Timestamp};
use crate::domain::payment::{CheckoutSession, SessionStatus, StoreError};
use crate::ports::{
    RecordingClaim, SessionStats, SessionStore, StatusUpdate, DEFAULT_MAX_SESSIONS,
    RECORDING_LEASE_SECS,
};

use super::session_map::SessionMap;

/// In-memory storage for checkout sessions
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<SessionMap>>,
    max_sessions: usize,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(SessionMap::default())),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions;
        self
    }

    /// Number of stored sessions
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(
        &self,
        session_id: &CheckoutSessionId,
    ) -> Result<Option<CheckoutSession>, StoreError> {
        Ok(self.sessions.lock().await.get(session_id).cloned())
    }

    async fn save(&self, session: &CheckoutSession) -> Result<(), StoreError> {
        let mut sessions = self.sessions.lock().await;
        if sessions.insert(session)? {
            sessions.evict_oldest(self.max_sessions);
        }
        Ok(())
    }

    async fn update_status(
        &self,
        session_id: &CheckoutSessionId,
        status: SessionStatus,
    ) -> Result<StatusUpdate, StoreError> {
        self.sessions
            .lock()
            .await
            .set_status(session_id, status, Timestamp::now())
    }

    async fn begin_recording(
        &self,
        candidate: &CheckoutSession,
    ) -> Result<RecordingClaim, StoreError> {
        let mut sessions = self.sessions.lock().await;
        let claim = sessions.begin_recording(candidate, Timestamp::now(), RECORDING_LEASE_SECS);
        if claim == RecordingClaim::Adopted {
            sessions.evict_oldest(self.max_sessions);
        }
        Ok(claim)
    }

    async fn release_recording(&self, session_id: &CheckoutSessionId) -> Result<(), StoreError> {
        self.sessions.lock().await.release_recording(session_id);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<CheckoutSession>, StoreError> {
        Ok(self.sessions.lock().await.recent(limit))
    }

    async fn stats(&self) -> Result<SessionStats, StoreError> {
        Ok(self.sessions.lock().await.stats())
    }
}

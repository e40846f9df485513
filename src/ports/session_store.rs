//! Session Store Port - Durable record of PayMongo checkout sessions.
//!
//! The store is the only cross-request state in the gateway. It tracks which
//! checkout sessions are still pending and which have already been recorded
//! in UISP, which is what makes webhook processing idempotent.
//!
//! Every write is a read-modify-write over the whole collection performed
//! under one lock, followed by trimming to the configured bound.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::CheckoutSessionId;
use crate::domain::payment::{CheckoutSession, SessionStatus, StoreError};

/// Default number of sessions kept before the oldest are evicted.
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// How long a recording claim keeps other deliveries away. Longer than the
/// UISP request timeout; a claim left behind by a crash lapses after it.
pub const RECORDING_LEASE_SECS: i64 = 120;

/// Port for persisting checkout sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session by its PayMongo id.
    async fn load(
        &self,
        session_id: &CheckoutSessionId,
    ) -> Result<Option<CheckoutSession>, StoreError>;

    /// Save a session keyed by its id.
    ///
    /// # Errors
    ///
    /// `StoreError::Conflict` when a record with the same id but a different
    /// amount already exists. Saving a record identical in amount is a
    /// no-op and never resets the stored status.
    async fn save(&self, session: &CheckoutSession) -> Result<(), StoreError>;

    /// Move a session to `status`.
    ///
    /// Unknown ids are not an error; the outcome reports them.
    async fn update_status(
        &self,
        session_id: &CheckoutSessionId,
        status: SessionStatus,
    ) -> Result<StatusUpdate, StoreError>;

    /// Claim the right to record a paid checkout in UISP.
    ///
    /// Runs under the store lock, so of several concurrent deliveries for
    /// one session only the first gets a held claim. A session the store has
    /// never seen is inserted from `candidate`.
    async fn begin_recording(
        &self,
        candidate: &CheckoutSession,
    ) -> Result<RecordingClaim, StoreError>;

    /// Drop a claim after a failed UISP write so a redelivery can retry.
    async fn release_recording(&self, session_id: &CheckoutSessionId) -> Result<(), StoreError>;

    /// Most recent sessions, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<CheckoutSession>, StoreError>;

    /// Counts by status.
    async fn stats(&self) -> Result<SessionStats, StoreError>;
}

/// Outcome of `SessionStore::update_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate {
    /// Status changed and was persisted.
    Updated,

    /// Session was already in the requested status.
    Unchanged,

    /// No session with that id.
    NotFound,
}

/// Outcome of `SessionStore::begin_recording`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingClaim {
    /// Pending session claimed by this delivery.
    Claimed,

    /// Session was unknown; stored from the event and claimed.
    Adopted,

    /// Payment already recorded.
    AlreadyCompleted,

    /// Another delivery holds an unexpired claim.
    InProgress,
}

impl RecordingClaim {
    /// True when the caller now holds the claim.
    pub fn is_held(&self) -> bool {
        matches!(self, RecordingClaim::Claimed | RecordingClaim::Adopted)
    }
}

/// Session counts for the status endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SessionStore) {}
    }

    #[test]
    fn only_claimed_and_adopted_are_held() {
        assert!(RecordingClaim::Claimed.is_held());
        assert!(RecordingClaim::Adopted.is_held());
        assert!(!RecordingClaim::AlreadyCompleted.is_held());
        assert!(!RecordingClaim::InProgress.is_held());
    }

    #[test]
    fn stats_serialize_as_plain_counts() {
        let stats = SessionStats {
            total: 3,
            pending: 1,
            completed: 2,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["total"], 3);
        assert_eq!(json["pending"], 1);
        assert_eq!(json["completed"], 2);
    }
}

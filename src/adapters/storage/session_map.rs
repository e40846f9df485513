//! Ordered session collection shared by the store adapters.
//!
//! Keeps sessions in insertion order so eviction can drop the oldest, and
//! serializes as a plain JSON object keyed by session id.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CheckoutSessionId, Timestamp};
use crate::domain::payment::{CheckoutSession, SessionStatus, StoreError};
use crate::ports::{RecordingClaim, SessionStats, StatusUpdate};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct SessionMap {
    entries: IndexMap<String, CheckoutSession>,
}

impl SessionMap {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, session_id: &CheckoutSessionId) -> Option<&CheckoutSession> {
        self.entries.get(session_id.as_str())
    }

    /// Inserts a new session at the newest position.
    ///
    /// Returns `Ok(false)` when an identical-amount record already exists,
    /// leaving it untouched.
    pub fn insert(&mut self, session: &CheckoutSession) -> Result<bool, StoreError> {
        if let Some(existing) = self.entries.get(session.session_id.as_str()) {
            if existing.amount_minor != session.amount_minor {
                return Err(StoreError::Conflict {
                    session_id: session.session_id.to_string(),
                });
            }
            return Ok(false);
        }

        self.entries
            .insert(session.session_id.to_string(), session.clone());
        Ok(true)
    }

    /// Changes a session's status in place, keeping its position.
    pub fn set_status(
        &mut self,
        session_id: &CheckoutSessionId,
        status: SessionStatus,
        at: Timestamp,
    ) -> Result<StatusUpdate, StoreError> {
        let Some(session) = self.entries.get_mut(session_id.as_str()) else {
            return Ok(StatusUpdate::NotFound);
        };

        match session.apply_status(status, at) {
            Ok(true) => Ok(StatusUpdate::Updated),
            Ok(false) => Ok(StatusUpdate::Unchanged),
            Err(e) => Err(StoreError::InvalidTransition {
                session_id: session_id.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Takes the recording claim on `candidate`'s session, inserting the
    /// candidate at the newest position when the id is unknown.
    pub fn begin_recording(
        &mut self,
        candidate: &CheckoutSession,
        now: Timestamp,
        lease_secs: i64,
    ) -> RecordingClaim {
        match self.entries.get_mut(candidate.session_id.as_str()) {
            Some(session) if session.is_completed() => RecordingClaim::AlreadyCompleted,
            Some(session) if session.is_being_recorded(now, lease_secs) => {
                RecordingClaim::InProgress
            }
            Some(session) => {
                session.recording_since = Some(now);
                RecordingClaim::Claimed
            }
            None => {
                let mut session = candidate.clone();
                session.recording_since = Some(now);
                self.entries.insert(candidate.session_id.to_string(), session);
                RecordingClaim::Adopted
            }
        }
    }

    /// Clears a recording claim. Returns true when one was held.
    pub fn release_recording(&mut self, session_id: &CheckoutSessionId) -> bool {
        match self.entries.get_mut(session_id.as_str()) {
            Some(session) if session.recording_since.is_some() => {
                session.recording_since = None;
                true
            }
            _ => false,
        }
    }

    /// Drops the oldest sessions until at most `max` remain.
    ///
    /// Returns the number of sessions removed.
    pub fn evict_oldest(&mut self, max: usize) -> usize {
        let excess = self.entries.len().saturating_sub(max);
        if excess > 0 {
            self.entries.drain(..excess);
        }
        excess
    }

    pub fn recent(&self, limit: usize) -> Vec<CheckoutSession> {
        self.entries.values().rev().take(limit).cloned().collect()
    }

    pub fn stats(&self) -> SessionStats {
        let completed = self.entries.values().filter(|s| s.is_completed()).count();
        SessionStats {
            total: self.entries.len(),
            pending: self.entries.len() - completed,
            completed,
        }
    }
}

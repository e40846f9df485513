//! GetGatewayStatusHandler - Query handler for the operator status summary.

use std::sync::Arc;

use crate::domain::payment::{CheckoutSession, StoreError};
use crate::ports::{SessionStats, SessionStore};

/// Number of sessions listed by default.
pub const DEFAULT_RECENT_LIMIT: usize = 20;

/// Query for session counts and the most recent sessions.
#[derive(Debug, Clone, Copy)]
pub struct GetGatewayStatusQuery {
    pub recent_limit: usize,
}

impl Default for GetGatewayStatusQuery {
    fn default() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetGatewayStatusResult {
    pub stats: SessionStats,
    /// Newest first.
    pub recent: Vec<CheckoutSession>,
}

pub struct GetGatewayStatusHandler {
    session_store: Arc<dyn SessionStore>,
}

impl GetGatewayStatusHandler {
    pub fn new(session_store: Arc<dyn SessionStore>) -> Self {
        Self { session_store }
    }

    pub async fn handle(
        &self,
        query: GetGatewayStatusQuery,
    ) -> Result<GetGatewayStatusResult, StoreError> {
        let stats = self.session_store.stats().await?;
        let recent = self.session_store.recent(query.recent_limit).await?;
        Ok(GetGatewayStatusResult { stats, recent })
    }
}

//! Refresh Record Entity
//!
//! One record per user identity, owned by the session store. Overwritten on
//! login (last-write-wins), deleted on logout. Concurrent logins for the
//! same identity race on this slot; the loser's provider session is
//! orphaned - an accepted property of the single-session design.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{ProviderRefreshArtifact, UserId};

/// Persisted refresh session
#[derive(Debug, Clone)]
pub struct RefreshRecord {
    pub user_id: UserId,
    pub provider_artifact: ProviderRefreshArtifact,
    pub created_at: DateTime<Utc>,
}

impl RefreshRecord {
    pub fn new(
        user_id: UserId,
        provider_artifact: ProviderRefreshArtifact,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            provider_artifact,
            created_at: now,
        }
    }
}

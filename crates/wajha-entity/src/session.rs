//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A server-side session record, keyed by the opaque id carried in the
/// session cookie. Owned exclusively by the session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session identifier.
    pub id: Uuid,
    /// The authenticated user this session belongs to.
    pub user_id: Uuid,
    /// When the session was first established.
    pub created_at: DateTime<Utc>,
    /// Absolute expiry, pushed forward on every touch (rolling).
    pub expires_at: DateTime<Utc>,
    /// Last activity seen on this session.
    pub last_seen: DateTime<Utc>,
}

impl Session {
    /// Whether the session has passed its expiry.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let live = Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            created_at: now,
            expires_at: now + Duration::hours(24),
            last_seen: now,
        };
        assert!(!live.is_expired());

        let stale = Session {
            expires_at: now - Duration::seconds(1),
            ..live.clone()
        };
        assert!(stale.is_expired());
    }
}

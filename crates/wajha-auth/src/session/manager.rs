//! Session store and lifecycle manager.
//!
//! Sessions are opaque server-side records; the cookie carries only the
//! id. The manager exclusively owns the records — callers (the
//! authentication service, the API extractors) only request lifecycle
//! transitions.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use wajha_core::error::AppError;
use wajha_core::result::AppResult;
use wajha_entity::session::Session;

/// In-memory session store with rolling expiry.
#[derive(Debug)]
pub struct SessionManager {
    /// Session lifetime, re-applied on every touch.
    ttl: Duration,
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionManager {
    /// Creates a manager whose sessions live `ttl` past their last touch.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn lock_read(&self) -> AppResult<std::sync::RwLockReadGuard<'_, HashMap<Uuid, Session>>> {
        self.sessions
            .read()
            .map_err(|_| AppError::internal("Session store lock poisoned"))
    }

    fn lock_write(&self) -> AppResult<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, Session>>> {
        self.sessions
            .write()
            .map_err(|_| AppError::internal("Session store lock poisoned"))
    }

    /// Establishes a fresh session for the given user.
    pub fn establish(&self, user_id: Uuid) -> AppResult<Session> {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            created_at: now,
            expires_at: now + self.ttl,
            last_seen: now,
        };

        self.lock_write()?.insert(session.id, session.clone());
        debug!(session_id = %session.id, user_id = %user_id, "Session established");
        Ok(session)
    }

    /// Returns the live session with the given id, if any.
    ///
    /// An expired record is dropped on read and reported as absent.
    pub fn get(&self, id: Uuid) -> AppResult<Option<Session>> {
        let expired = {
            let sessions = self.lock_read()?;
            match sessions.get(&id) {
                Some(session) if !session.is_expired() => return Ok(Some(session.clone())),
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            self.lock_write()?.remove(&id);
        }
        Ok(None)
    }

    /// Extends the session's expiry from now (rolling semantics).
    ///
    /// Returns the refreshed session, or `None` if the id is unknown or
    /// already expired.
    pub fn touch(&self, id: Uuid) -> AppResult<Option<Session>> {
        let mut sessions = self.lock_write()?;
        match sessions.get_mut(&id) {
            Some(session) if !session.is_expired() => {
                let now = Utc::now();
                session.last_seen = now;
                session.expires_at = now + self.ttl;
                Ok(Some(session.clone()))
            }
            Some(_) => {
                sessions.remove(&id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Issues a new id for the session, discarding the old one.
    ///
    /// The associated user is preserved; expiry restarts from now. This
    /// runs at login, after credential verification, to defeat session
    /// fixation.
    pub fn regenerate(&self, id: Uuid) -> AppResult<Option<Session>> {
        let mut sessions = self.lock_write()?;
        let Some(old) = sessions.remove(&id) else {
            return Ok(None);
        };
        if old.is_expired() {
            return Ok(None);
        }

        let now = Utc::now();
        let fresh = Session {
            id: Uuid::new_v4(),
            user_id: old.user_id,
            created_at: old.created_at,
            expires_at: now + self.ttl,
            last_seen: now,
        };
        sessions.insert(fresh.id, fresh.clone());
        debug!(old_id = %id, new_id = %fresh.id, "Session id regenerated");
        Ok(Some(fresh))
    }

    /// Destroys the session with the given id.
    ///
    /// Returns whether a record was actually removed.
    pub fn destroy(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.lock_write()?.remove(&id).is_some())
    }

    /// Removes all expired records. Returns the number evicted.
    pub fn sweep(&self) -> AppResult<usize> {
        let mut sessions = self.lock_write()?;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());
        Ok(before - sessions.len())
    }

    /// Number of live records (including not-yet-swept expired ones).
    pub fn len(&self) -> usize {
        self.lock_read().map(|s| s.len()).unwrap_or(0)
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_establish_and_get() {
        let manager = SessionManager::new(Duration::hours(24));
        let user_id = Uuid::new_v4();

        let session = manager.establish(user_id).unwrap();
        let loaded = manager.get(session.id).unwrap().unwrap();
        assert_eq!(loaded.user_id, user_id);
        assert!(!loaded.is_expired());

        assert!(manager.get(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_touch_extends_expiry() {
        let manager = SessionManager::new(Duration::hours(24));
        let session = manager.establish(Uuid::new_v4()).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));
        let touched = manager.touch(session.id).unwrap().unwrap();
        assert!(touched.expires_at > session.expires_at);
        assert!(touched.last_seen > session.last_seen);
    }

    #[test]
    fn test_expired_session_dropped_on_read() {
        let manager = SessionManager::new(Duration::zero());
        let session = manager.establish(Uuid::new_v4()).unwrap();

        assert!(manager.get(session.id).unwrap().is_none());
        assert!(manager.touch(session.id).unwrap().is_none());
        assert_eq!(manager.len(), 0);
    }

    #[test]
    fn test_regenerate_rotates_id_and_invalidates_old() {
        let manager = SessionManager::new(Duration::hours(24));
        let user_id = Uuid::new_v4();
        let old = manager.establish(user_id).unwrap();

        let fresh = manager.regenerate(old.id).unwrap().unwrap();
        assert_ne!(fresh.id, old.id);
        assert_eq!(fresh.user_id, user_id);

        assert!(manager.get(old.id).unwrap().is_none());
        assert!(manager.get(fresh.id).unwrap().is_some());
    }

    #[test]
    fn test_destroy() {
        let manager = SessionManager::new(Duration::hours(24));
        let session = manager.establish(Uuid::new_v4()).unwrap();

        assert!(manager.destroy(session.id).unwrap());
        assert!(!manager.destroy(session.id).unwrap());
        assert!(manager.get(session.id).unwrap().is_none());
    }

    #[test]
    fn test_sweep_evicts_only_expired() {
        let short = SessionManager::new(Duration::zero());
        short.establish(Uuid::new_v4()).unwrap();
        short.establish(Uuid::new_v4()).unwrap();
        assert_eq!(short.sweep().unwrap(), 2);
        assert!(short.is_empty());

        let long = SessionManager::new(Duration::hours(1));
        long.establish(Uuid::new_v4()).unwrap();
        assert_eq!(long.sweep().unwrap(), 0);
        assert_eq!(long.len(), 1);
    }
}

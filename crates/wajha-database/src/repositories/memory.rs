//! In-memory credential store.
//!
//! Used when `database.mode = "memory"` — local development without a
//! database, and the end-to-end test suite. Same contract as the
//! PostgreSQL store, including case-insensitive username uniqueness.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use wajha_core::error::AppError;
use wajha_core::result::AppResult;
use wajha_entity::user::{CreateUser, User};

use super::CredentialStore;

/// Credential store over a `RwLock<HashMap>`.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_read(&self) -> AppResult<std::sync::RwLockReadGuard<'_, HashMap<Uuid, User>>> {
        self.users
            .read()
            .map_err(|_| AppError::internal("Credential store lock poisoned"))
    }

    fn lock_write(&self) -> AppResult<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, User>>> {
        self.users
            .write()
            .map_err(|_| AppError::internal("Credential store lock poisoned"))
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.lock_read()?;
        Ok(users
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let users = self.lock_read()?;
        Ok(users.get(&id).cloned())
    }

    async fn insert(&self, data: &CreateUser) -> AppResult<User> {
        let mut users = self.lock_write()?;

        if users
            .values()
            .any(|u| u.username.eq_ignore_ascii_case(&data.username))
        {
            return Err(AppError::conflict("Username already exists"));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: data.username.clone(),
            password_hash: data.password_hash.clone(),
            email: data.email.clone(),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        let mut users = self.lock_write()?;
        match users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(())
            }
            None => Err(AppError::not_found(format!("User {id} not found"))),
        }
    }

    async fn count(&self) -> AppResult<u64> {
        let users = self.lock_read()?;
        Ok(users.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(username: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            password_hash: "aa.bb".to_string(),
            email: None,
            first_name: None,
            last_name: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let store = MemoryCredentialStore::new();
        let user = store.insert(&candidate("karim")).await.unwrap();

        let by_name = store.find_by_username("KARIM").await.unwrap().unwrap();
        assert_eq!(by_name.id, user.id);

        let by_id = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "karim");
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryCredentialStore::new();
        store.insert(&candidate("layla")).await.unwrap();
        let err = store.insert(&candidate("Layla")).await.unwrap_err();
        assert_eq!(err.kind, wajha_core::error::ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_update_password() {
        let store = MemoryCredentialStore::new();
        let user = store.insert(&candidate("omar")).await.unwrap();

        store.update_password(user.id, "cc.dd").await.unwrap();
        let reloaded = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.password_hash, "cc.dd");

        let missing = store.update_password(Uuid::new_v4(), "ee.ff").await;
        assert!(missing.is_err());
    }
}

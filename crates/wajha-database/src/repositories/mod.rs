//! Credential store trait and its implementations.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use wajha_core::result::AppResult;
use wajha_entity::user::{CreateUser, User};

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;

/// Persistence boundary for user records.
///
/// The store enforces column-level username uniqueness only; business
/// rules (pre-insert uniqueness check, password policy) belong to the
/// authentication service.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find a user by username (case-insensitive).
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Insert a new user record.
    async fn insert(&self, data: &CreateUser) -> AppResult<User>;

    /// Replace a user's stored password form.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()>;

    /// Count stored users.
    async fn count(&self) -> AppResult<u64>;
}

//! # wajha-database
//!
//! Credential persistence for Wajha: the [`CredentialStore`] trait plus a
//! PostgreSQL implementation for production and an in-memory
//! implementation for development and tests.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::CredentialStore;
pub use repositories::memory::MemoryCredentialStore;
pub use repositories::postgres::PgCredentialStore;

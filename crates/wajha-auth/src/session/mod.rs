//! Server-side session lifecycle management.

pub mod cleanup;
pub mod manager;

pub use cleanup::SessionCleanup;
pub use manager::SessionManager;

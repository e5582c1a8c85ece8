//! # wajha-auth
//!
//! The authentication and audit core of the Wajha backend.
//!
//! ## Modules
//!
//! - `password` — scrypt password hashing with constant-time verification
//! - `session` — server-side session lifecycle (establish, touch, regenerate, destroy)
//! - `audit` — bounded in-memory audit trail with filtered queries
//! - `service` — the authentication service orchestrating the above

pub mod audit;
pub mod password;
pub mod service;
pub mod session;

pub use audit::{AuditLog, AuditQuery};
pub use password::PasswordHasher;
pub use service::{AuthService, ClientInfo, Registration};
pub use session::{SessionCleanup, SessionManager};

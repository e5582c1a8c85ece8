//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use wajha_auth::audit::AuditLog;
use wajha_auth::service::AuthService;
use wajha_auth::session::SessionManager;
use wajha_core::config::AppConfig;
use wajha_database::CredentialStore;

use crate::middleware::rate_limit::LoginThrottle;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// User credential store
    pub users: Arc<dyn CredentialStore>,
    /// Session lifecycle manager
    pub sessions: Arc<SessionManager>,
    /// Audit trail
    pub audit: Arc<AuditLog>,
    /// Authentication workflows
    pub auth: Arc<AuthService>,
    /// Login rate limiter and slow-down guard
    pub login_throttle: Arc<LoginThrottle>,
    /// Key for signing session cookies
    pub cookie_key: Key,
}

// Lets SignedCookieJar pull its signing key straight from AppState.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

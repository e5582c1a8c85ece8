//! Authentication service.
//!
//! Orchestrates the credential store, password hasher, session manager
//! and audit trail. All credential failures surface the same generic
//! message so responses never reveal whether a username exists; internal
//! failures propagate as themselves and are audited as login errors.

use std::sync::Arc;

use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use wajha_core::error::AppError;
use wajha_core::result::AppResult;
use wajha_database::CredentialStore;
use wajha_entity::audit::{AuditAction, NewAuditEvent};
use wajha_entity::session::Session;
use wajha_entity::user::{CreateUser, User};

use crate::audit::AuditLog;
use crate::password::PasswordHasher;
use crate::session::SessionManager;

/// Shared generic message for every credential failure. Unknown username
/// and wrong password must be byte-identical to the client.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Caller-side request metadata carried into audit entries.
#[derive(Debug, Clone)]
pub struct ClientInfo {
    pub ip_address: String,
    pub user_agent: Option<String>,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            ip_address: "unknown".to_string(),
            user_agent: None,
        }
    }
}

/// New-account parameters accepted by [`AuthService::register`].
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Core authentication workflows.
pub struct AuthService {
    users: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    sessions: Arc<SessionManager>,
    audit: Arc<AuditLog>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        sessions: Arc<SessionManager>,
        audit: Arc<AuditLog>,
    ) -> Self {
        Self {
            users,
            hasher,
            sessions,
            audit,
        }
    }

    /// Verifies credentials and establishes a fresh session.
    ///
    /// A pre-existing session (anonymous or from another account) passed
    /// in `prior_session` is destroyed first. The session established
    /// after verification is immediately regenerated so the id handed to
    /// the client never predates authentication.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        prior_session: Option<Uuid>,
        client: &ClientInfo,
    ) -> AppResult<(User, Session)> {
        // Internal failures are audited as LOGIN_ERROR and propagated as
        // themselves; only credential failures get the generic message.
        let user = match self.users.find_by_username(username).await {
            Ok(user) => user,
            Err(e) => {
                self.audit_login_error(username, None, client, &e);
                return Err(e);
            }
        };

        let Some(user) = user else {
            self.audit_login_failed(username, None, client);
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        let verified = match self
            .hasher
            .verify_offloaded(password.to_string(), user.password_hash.clone())
            .await
        {
            Ok(verified) => verified,
            Err(e) => {
                self.audit_login_error(username, Some(user.id), client, &e);
                return Err(e);
            }
        };

        if !verified {
            self.audit_login_failed(username, Some(user.id), client);
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        if let Some(prior) = prior_session {
            // Best effort; a stale or foreign id must not block login.
            let _ = self.sessions.destroy(prior);
        }

        let established = self.sessions.establish(user.id)?;
        let session = self
            .sessions
            .regenerate(established.id)?
            .ok_or_else(|| AppError::internal("Freshly established session vanished"))?;

        let mut event = NewAuditEvent::new(AuditAction::LoginSuccess, "auth");
        event.user_id = Some(user.id);
        event.ip_address = client.ip_address.clone();
        event.user_agent = client.user_agent.clone();
        event.details = Some(json!({ "username": user.username }));
        self.audit.append(event);

        info!(user_id = %user.id, "User logged in");
        Ok((user, session))
    }

    /// Creates a new account and signs it in.
    pub async fn register(&self, data: Registration, _client: &ClientInfo) -> AppResult<(User, Session)> {
        if self.users.find_by_username(&data.username).await?.is_some() {
            return Err(AppError::conflict("Username already exists"));
        }

        let password_hash = self.hasher.hash_offloaded(data.password).await?;
        let user = self
            .users
            .insert(&CreateUser {
                username: data.username,
                password_hash,
                email: data.email,
                first_name: data.first_name,
                last_name: data.last_name,
            })
            .await?;

        let session = self.sessions.establish(user.id)?;
        info!(user_id = %user.id, "User registered");
        Ok((user, session))
    }

    /// Destroys the session and records the logout.
    ///
    /// Session destruction is best effort: a failure is logged and
    /// audited but the caller still gets a success, so the client always
    /// ends up signed out locally.
    pub fn logout(&self, session_id: Uuid, user: Option<&User>, client: &ClientInfo) {
        let destroy_error = match self.sessions.destroy(session_id) {
            Ok(_) => None,
            Err(e) => {
                warn!(session_id = %session_id, "Session destruction failed: {}", e);
                Some(e.to_string())
            }
        };

        let mut event = NewAuditEvent::new(AuditAction::Logout, "auth");
        event.user_id = user.map(|u| u.id);
        event.ip_address = client.ip_address.clone();
        event.user_agent = client.user_agent.clone();
        event.success = destroy_error.is_none();
        event.error = destroy_error;
        self.audit.append(event);
    }

    /// Replaces the user's password after re-verifying the current one.
    pub async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let verified = self
            .hasher
            .verify_offloaded(current_password.to_string(), user.password_hash.clone())
            .await?;
        if !verified {
            return Err(AppError::authentication("Current password is incorrect"));
        }

        let password_hash = self.hasher.hash_offloaded(new_password.to_string()).await?;
        self.users.update_password(user.id, &password_hash).await?;
        info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    /// Resolves a session cookie to its user, refreshing the rolling
    /// expiry. A session whose user no longer exists is destroyed.
    pub async fn resolve_session(&self, session_id: Uuid) -> AppResult<Option<(User, Session)>> {
        let Some(session) = self.sessions.touch(session_id)? else {
            return Ok(None);
        };

        match self.users.find_by_id(session.user_id).await? {
            Some(user) => Ok(Some((user, session))),
            None => {
                self.sessions.destroy(session_id)?;
                Ok(None)
            }
        }
    }

    /// The audit trail this service writes to.
    pub fn audit(&self) -> &Arc<AuditLog> {
        &self.audit
    }

    /// The session store this service manages.
    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    fn audit_login_failed(&self, username: &str, user_id: Option<Uuid>, client: &ClientInfo) {
        let mut event = NewAuditEvent::new(AuditAction::LoginFailed, "auth");
        event.user_id = user_id;
        event.ip_address = client.ip_address.clone();
        event.user_agent = client.user_agent.clone();
        event.success = false;
        event.error = Some(INVALID_CREDENTIALS.to_string());
        event.details = Some(json!({ "username": username }));
        self.audit.append(event);
    }

    fn audit_login_error(
        &self,
        username: &str,
        user_id: Option<Uuid>,
        client: &ClientInfo,
        cause: &AppError,
    ) {
        error!(username, "Login aborted by internal error: {}", cause);
        let mut event = NewAuditEvent::new(AuditAction::LoginError, "auth");
        event.user_id = user_id;
        event.ip_address = client.ip_address.clone();
        event.user_agent = client.user_agent.clone();
        event.success = false;
        event.error = Some(cause.to_string());
        event.details = Some(json!({ "username": username }));
        self.audit.append(event);
    }
}

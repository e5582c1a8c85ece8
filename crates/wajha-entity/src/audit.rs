//! Audit log entry entity model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of security-relevant action an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A request hit the login endpoint (recorded by the middleware,
    /// regardless of outcome).
    LoginAttempt,
    /// Credentials verified and a session established.
    LoginSuccess,
    /// Credentials rejected.
    LoginFailed,
    /// The login path failed with an internal error.
    LoginError,
    /// Session destroyed by the user.
    Logout,
    /// A new account was registered.
    Register,
    /// A resource was created.
    Create,
    /// A resource was read.
    Read,
    /// A resource was updated.
    Update,
    /// A resource was deleted.
    Delete,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LoginAttempt => "LOGIN_ATTEMPT",
            Self::LoginSuccess => "LOGIN_SUCCESS",
            Self::LoginFailed => "LOGIN_FAILED",
            Self::LoginError => "LOGIN_ERROR",
            Self::Logout => "LOGOUT",
            Self::Register => "REGISTER",
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        };
        write!(f, "{s}")
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LOGIN_ATTEMPT" => Ok(Self::LoginAttempt),
            "LOGIN_SUCCESS" => Ok(Self::LoginSuccess),
            "LOGIN_FAILED" => Ok(Self::LoginFailed),
            "LOGIN_ERROR" => Ok(Self::LoginError),
            "LOGOUT" => Ok(Self::Logout),
            "REGISTER" => Ok(Self::Register),
            "CREATE" => Ok(Self::Create),
            "READ" => Ok(Self::Read),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            other => Err(format!("Unknown audit action: {other}")),
        }
    }
}

/// An immutable fact about one security-relevant action.
///
/// Entries are appended, never mutated. The acting user is a weak
/// reference — the user may have been deleted since.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Unique entry identifier.
    pub id: Uuid,
    /// The acting user, if their identity was confirmed.
    pub user_id: Option<Uuid>,
    /// The action performed.
    pub action: AuditAction,
    /// The target resource name (e.g. `"articles"`, `"auth"`).
    pub resource: String,
    /// The target resource id, if the path named one.
    pub resource_id: Option<String>,
    /// Free-form request detail (method, path, query, redacted body).
    pub details: Option<serde_json::Value>,
    /// Caller IP address.
    pub ip_address: String,
    /// Caller User-Agent string.
    pub user_agent: Option<String>,
    /// When the action was detected server-side.
    pub timestamp: DateTime<Utc>,
    /// Whether the action succeeded (final HTTP status < 400).
    pub success: bool,
    /// Internal error message, never echoed to clients.
    pub error: Option<String>,
}

/// Data required to append a new audit entry; id and timestamp are
/// assigned by the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditEvent {
    /// The acting user, if known.
    pub user_id: Option<Uuid>,
    /// The action performed.
    pub action: AuditAction,
    /// Target resource name.
    pub resource: String,
    /// Target resource id.
    pub resource_id: Option<String>,
    /// Request detail.
    pub details: Option<serde_json::Value>,
    /// Caller IP address.
    pub ip_address: String,
    /// Caller User-Agent.
    pub user_agent: Option<String>,
    /// Whether the action succeeded.
    pub success: bool,
    /// Internal error message.
    pub error: Option<String>,
}

impl NewAuditEvent {
    /// A minimal event for the given action, to be filled in by the caller.
    pub fn new(action: AuditAction, resource: impl Into<String>) -> Self {
        Self {
            user_id: None,
            action,
            resource: resource.into(),
            resource_id: None,
            details: None,
            ip_address: "unknown".to_string(),
            user_agent: None,
            success: true,
            error: None,
        }
    }
}

//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username.
    #[validate(length(min = 3, max = 100, message = "Username must be 3-100 characters"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Email.
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Password change request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password.
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    /// New password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Query parameters accepted by the audit trail endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditLogParams {
    /// Filter by acting user.
    pub user_id: Option<uuid::Uuid>,
    /// Filter by action name (e.g. `LOGIN_FAILED`).
    pub action: Option<String>,
    /// Filter by resource name.
    pub resource: Option<String>,
    /// Inclusive lower bound on entry timestamp.
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    /// Inclusive upper bound on entry timestamp.
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
    /// Maximum number of entries to return.
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterRequest {
            username: "dina".to_string(),
            password: "Sup3rSecret".to_string(),
            email: Some("dina@example.com".to_string()),
            first_name: None,
            last_name: None,
        };
        assert!(ok.validate().is_ok());

        let short_password = RegisterRequest {
            password: "short".to_string(),
            ..ok.clone()
        };
        assert!(short_password.validate().is_err());

        let bad_email = RegisterRequest {
            email: Some("not-an-email".to_string()),
            ..ok
        };
        assert!(bad_email.validate().is_err());
    }
}

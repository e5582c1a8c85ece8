//! Request-auditing middleware.
//!
//! Wraps every request but only commits an audit entry when the request
//! matches policy: a mutating verb against a configured sensitive path
//! prefix, or any request to the login/logout paths. GET requests to
//! other paths are deliberately never audited to keep the trail useful.
//!
//! The entry is written after the handler runs, so success reflects the
//! final status code rather than the request intent. Captured request
//! bodies have credential fields redacted before they reach the trail.

use axum::body::{Body, HttpBody, to_bytes};
use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use wajha_entity::audit::{AuditAction, NewAuditEvent};

use crate::extractors::ClientMeta;
use crate::extractors::auth::session_id_from_parts;
use crate::state::AppState;

const AUTH_PATHS: [&str; 2] = ["/api/login", "/api/logout"];

fn is_mutating(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

fn is_auth_path(path: &str) -> bool {
    AUTH_PATHS.contains(&path)
}

/// Whether a request to `path` with `method` must be audited.
fn should_audit(state: &AppState, method: &Method, path: &str) -> bool {
    if is_auth_path(path) {
        return true;
    }
    is_mutating(method)
        && state
            .config
            .audit
            .sensitive_prefixes
            .iter()
            .any(|prefix| path == prefix || path.starts_with(&format!("{prefix}/")))
}

/// Derives the audit action from the request shape.
fn derive_action(method: &Method, path: &str) -> AuditAction {
    if path == "/api/login" {
        return AuditAction::LoginAttempt;
    }
    if path == "/api/logout" {
        return AuditAction::Logout;
    }
    if path == "/api/register" {
        return AuditAction::Register;
    }
    match *method {
        Method::POST => AuditAction::Create,
        Method::PUT | Method::PATCH => AuditAction::Update,
        Method::DELETE => AuditAction::Delete,
        _ => AuditAction::Read,
    }
}

/// Splits `/api/<resource>/<id>/...` into resource name and id.
fn derive_resource(path: &str) -> (String, Option<String>) {
    if is_auth_path(path) || path == "/api/register" {
        return ("auth".to_string(), None);
    }
    let mut segments = path.trim_start_matches("/api/").split('/');
    let resource = segments.next().unwrap_or("unknown").to_string();
    let resource_id = segments.next().filter(|s| !s.is_empty()).map(String::from);
    (resource, resource_id)
}

/// Replaces every credential-bearing field in a captured body.
///
/// Matches any key containing "password", which covers `password`,
/// `newPassword`, `current_password` and the like in either case style.
fn redact_credentials(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, entry) in map.iter_mut() {
                if key.to_ascii_lowercase().contains("password") {
                    *entry = Value::String("[REDACTED]".to_string());
                } else {
                    redact_credentials(entry);
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                redact_credentials(item);
            }
        }
        _ => {}
    }
}

/// Audit trail middleware. Buffers mutating request bodies (bounded) so
/// they can be recorded redacted, then replays them to the handler.
pub async fn audit_trail(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if !should_audit(&state, &method, &path) {
        return next.run(request).await;
    }

    let (mut parts, body) = request.into_parts();
    let client = ClientMeta::from_headers(&parts.headers);
    let session_user = match session_id_from_parts(&mut parts, &state).await {
        Some(session_id) => resolve_user(&state, session_id).await,
        None => None,
    };

    // Capture is best effort and must never cost the request its body:
    // anything oversized or of unknown length goes through untouched and
    // is simply recorded without details.
    let capture = is_mutating(&method) && body_fits(&body, state.config.audit.max_body_bytes);
    let (details, body) = if capture {
        match to_bytes(body, state.config.audit.max_body_bytes).await {
            Ok(bytes) => {
                let details = serde_json::from_slice::<Value>(&bytes).ok().map(|mut v| {
                    redact_credentials(&mut v);
                    v
                });
                (details, Body::from(bytes))
            }
            // The body stream failed; the handler could not have read it
            // either, so forwarding it empty changes nothing.
            Err(_) => {
                debug!(path = %path, "Failed to buffer request body for audit");
                (None, Body::empty())
            }
        }
    } else {
        if is_mutating(&method) {
            debug!(path = %path, "Request body too large to audit, skipping capture");
        }
        (None, body)
    };

    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let status = response.status();
    let (resource, resource_id) = derive_resource(&path);
    let mut event = NewAuditEvent::new(derive_action(&method, &path), &resource);
    event.user_id = session_user;
    event.resource_id = resource_id;
    event.details = details;
    event.ip_address = client.ip_address.clone();
    event.user_agent = client.user_agent.clone();
    event.success = status.as_u16() < 400;
    if !event.success {
        event.error = Some(format!("HTTP {}", status.as_u16()));
    }
    state.audit.append(event);

    response
}

/// Whether the body is known to fit within the capture limit.
fn body_fits(body: &Body, limit: usize) -> bool {
    HttpBody::size_hint(body)
        .upper()
        .is_some_and(|bytes| bytes <= limit as u64)
}

async fn resolve_user(state: &AppState, session_id: Uuid) -> Option<Uuid> {
    state
        .sessions
        .get(session_id)
        .ok()
        .flatten()
        .map(|s| s.user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_heuristics() {
        assert_eq!(
            derive_action(&Method::POST, "/api/login"),
            AuditAction::LoginAttempt
        );
        assert_eq!(
            derive_action(&Method::POST, "/api/logout"),
            AuditAction::Logout
        );
        assert_eq!(
            derive_action(&Method::POST, "/api/register"),
            AuditAction::Register
        );
        assert_eq!(
            derive_action(&Method::POST, "/api/articles"),
            AuditAction::Create
        );
        assert_eq!(
            derive_action(&Method::PUT, "/api/articles/3"),
            AuditAction::Update
        );
        assert_eq!(
            derive_action(&Method::DELETE, "/api/articles/3"),
            AuditAction::Delete
        );
    }

    #[test]
    fn test_resource_derivation() {
        assert_eq!(derive_resource("/api/login"), ("auth".to_string(), None));
        assert_eq!(
            derive_resource("/api/articles"),
            ("articles".to_string(), None)
        );
        assert_eq!(
            derive_resource("/api/articles/3"),
            ("articles".to_string(), Some("3".to_string()))
        );
        assert_eq!(
            derive_resource("/api/case-studies/7/publish"),
            ("case-studies".to_string(), Some("7".to_string()))
        );
    }

    #[test]
    fn test_body_size_gate() {
        assert!(body_fits(&Body::from("small"), 1024));
        assert!(!body_fits(&Body::from(vec![0u8; 2048]), 1024));
    }

    #[test]
    fn test_redaction_covers_nested_and_variant_keys() {
        let mut body = json!({
            "username": "dina",
            "password": "Sup3rSecret",
            "newPassword": "Another1",
            "profile": { "current_password": "Old1", "bio": "hi" },
            "items": [ { "confirmPassword": "Another1" } ]
        });
        redact_credentials(&mut body);

        assert_eq!(body["username"], "dina");
        assert_eq!(body["password"], "[REDACTED]");
        assert_eq!(body["newPassword"], "[REDACTED]");
        assert_eq!(body["profile"]["current_password"], "[REDACTED]");
        assert_eq!(body["profile"]["bio"], "hi");
        assert_eq!(body["items"][0]["confirmPassword"], "[REDACTED]");
    }
}

//! Health check handler.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Health check response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Whether the credential store answers queries.
    pub store_ok: bool,
    /// Live session count.
    pub active_sessions: usize,
    /// Retained audit entries.
    pub audit_entries: usize,
}

/// GET /api/health
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    let store_ok = state.users.count().await.is_ok();
    Ok(Json(HealthResponse {
        status: if store_ok { "ok" } else { "degraded" }.to_string(),
        store_ok,
        active_sessions: state.sessions.len(),
        audit_entries: state.audit.len(),
    }))
}

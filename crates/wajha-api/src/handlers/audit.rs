//! Audit trail query handler.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Query, State};

use wajha_auth::audit::AuditQuery;
use wajha_core::error::AppError;
use wajha_entity::audit::{AuditAction, AuditLogEntry};

use crate::dto::request::AuditLogParams;
use crate::error::ApiError;
use crate::dto::response::ApiResponse;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// GET /api/audit-logs
///
/// Entries come back newest first; all filters combine with AND.
pub async fn list_audit_logs(
    State(state): State<AppState>,
    _current: CurrentUser,
    Query(params): Query<AuditLogParams>,
) -> Result<Json<ApiResponse<Vec<AuditLogEntry>>>, ApiError> {
    let action = params
        .action
        .as_deref()
        .map(AuditAction::from_str)
        .transpose()
        .map_err(AppError::validation)?;

    let entries = state.audit.query(&AuditQuery {
        user_id: params.user_id,
        action,
        resource: params.resource,
        start_date: params.start_date,
        end_date: params.end_date,
        limit: params.limit,
    });

    Ok(Json(ApiResponse::ok(entries)))
}

//! User self-service handlers.

use axum::Json;
use axum::extract::State;

use wajha_core::error::AppError;

use crate::dto::request::ChangePasswordRequest;
use crate::error::ApiError;
use crate::dto::response::{ApiResponse, MessageResponse, UserResponse};
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// GET /api/user
pub async fn me(current: CurrentUser) -> Json<ApiResponse<UserResponse>> {
    Json(ApiResponse::ok(UserResponse::from(current.user)))
}

/// PUT /api/user/password
pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    validator::Validate::validate(&req).map_err(|e| AppError::validation(e.to_string()))?;

    state
        .auth
        .change_password(&current.user, &req.current_password, &req.new_password)
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Password changed successfully".to_string(),
    })))
}

//! Auth handlers — register, login, logout.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::SignedCookieJar;
use uuid::Uuid;

use wajha_auth::service::Registration;
use wajha_core::error::AppError;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::error::ApiError;
use crate::dto::response::{ApiResponse, MessageResponse, UserResponse};
use crate::extractors::ClientMeta;
use crate::middleware::session::{removal_cookie, session_cookie};
use crate::state::AppState;

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    client: ClientMeta,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, SignedCookieJar, Json<ApiResponse<UserResponse>>), ApiError> {
    validator::Validate::validate(&req).map_err(|e| AppError::validation(e.to_string()))?;

    let (user, session) = state
        .auth
        .register(
            Registration {
                username: req.username,
                password: req.password,
                email: req.email,
                first_name: req.first_name,
                last_name: req.last_name,
            },
            &client,
        )
        .await?;

    let jar = jar.add(session_cookie(&state.config, session.id));
    Ok((
        StatusCode::CREATED,
        jar,
        Json(ApiResponse::ok(UserResponse::from(user))),
    ))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    client: ClientMeta,
    Json(req): Json<LoginRequest>,
) -> Result<(SignedCookieJar, Json<ApiResponse<UserResponse>>), ApiError> {
    validator::Validate::validate(&req).map_err(|e| AppError::validation(e.to_string()))?;

    let prior_session = jar
        .get(&state.config.session.cookie_name)
        .and_then(|c| Uuid::parse_str(c.value()).ok());

    let (user, session) = state
        .auth
        .login(&req.username, &req.password, prior_session, &client)
        .await?;

    let jar = jar.add(session_cookie(&state.config, session.id));
    Ok((jar, Json(ApiResponse::ok(UserResponse::from(user)))))
}

/// POST /api/logout
///
/// Always succeeds from the client's point of view. The server-side
/// record is destroyed best-effort; the cookie is cleared either way.
pub async fn logout(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    client: ClientMeta,
) -> (SignedCookieJar, Json<ApiResponse<MessageResponse>>) {
    let cookie_name = state.config.session.cookie_name.clone();

    if let Some(session_id) = jar
        .get(&cookie_name)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
    {
        let user = match state.auth.resolve_session(session_id).await {
            Ok(Some((user, _))) => Some(user),
            _ => None,
        };
        state.auth.logout(session_id, user.as_ref(), &client);
    }

    let jar = jar.remove(removal_cookie(&state.config));
    (
        jar,
        Json(ApiResponse::ok(MessageResponse {
            message: "Logged out successfully".to_string(),
        })),
    )
}

//! `CurrentUser` extractor — resolves the signed session cookie to an
//! authenticated user and injects it into handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::Key;
use uuid::Uuid;

use wajha_core::error::AppError;
use wajha_entity::session::Session;
use wajha_entity::user::User;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated request context available in handlers.
///
/// Extraction touches the session, so every authenticated request rolls
/// the expiry forward. A missing, tampered, expired or orphaned cookie
/// rejects with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub session: Session,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session_id = session_id_from_parts(parts, state)
            .await
            .ok_or_else(|| AppError::authentication("Authentication required"))?;

        let (user, session) = state
            .auth
            .resolve_session(session_id)
            .await?
            .ok_or_else(|| AppError::authentication("Authentication required"))?;

        Ok(CurrentUser { user, session })
    }
}

/// Reads the session id from the signed cookie jar, if present and intact.
pub async fn session_id_from_parts(parts: &mut Parts, state: &AppState) -> Option<Uuid> {
    // The key type must be spelled out: both `Key` and `AppState` itself
    // satisfy `FromRef<AppState>`, so inference cannot pick one.
    let jar = SignedCookieJar::<Key>::from_request_parts(parts, state)
        .await
        .ok()?;
    let cookie = jar.get(&state.config.session.cookie_name)?;
    Uuid::parse_str(cookie.value()).ok()
}

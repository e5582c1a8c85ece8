//! Session cookie construction and rolling refresh.

use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;
use uuid::Uuid;

use wajha_core::config::AppConfig;

use crate::state::AppState;

/// Builds the session cookie for a freshly established or refreshed
/// session.
///
/// `HttpOnly` keeps the id away from page scripts, `SameSite=Strict`
/// blocks cross-site sends, and `Secure` is set in production where TLS
/// terminates in front of the server.
pub fn session_cookie(config: &AppConfig, session_id: Uuid) -> Cookie<'static> {
    let mut cookie = Cookie::new(config.session.cookie_name.clone(), session_id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_secure(config.server.is_production());
    cookie.set_max_age(Duration::hours(config.session.ttl_hours as i64));
    cookie
}

/// Builds an expired cookie that clears the session from the client.
pub fn removal_cookie(config: &AppConfig) -> Cookie<'static> {
    let mut cookie = Cookie::new(config.session.cookie_name.clone(), "");
    cookie.set_path("/");
    cookie
}

/// Re-issues the session cookie on authenticated requests so the client
/// side of the rolling expiry tracks the server side.
///
/// Handlers that set the cookie themselves (login, logout) win: if the
/// response already carries a `Set-Cookie` for the session, the refresh
/// is skipped.
pub async fn rolling_refresh(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    request: Request,
    next: Next,
) -> Response {
    let cookie_name = state.config.session.cookie_name.clone();
    let session_id = jar
        .get(&cookie_name)
        .and_then(|c| Uuid::parse_str(c.value()).ok());

    let response = next.run(request).await;

    let Some(session_id) = session_id else {
        return response;
    };

    let already_set = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .any(|v| v.to_str().is_ok_and(|v| v.starts_with(&cookie_name)));
    if already_set {
        return response;
    }

    // Only refresh sessions that are still live after the handler ran.
    match state.sessions.get(session_id) {
        Ok(Some(_)) => {
            let jar = jar.add(session_cookie(&state.config, session_id));
            (jar, response).into_response()
        }
        _ => response,
    }
}

//! Route definitions for the Wajha HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState`
//! and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Middleware order (outermost first): request logging, CORS, tracing,
/// audit trail, rolling session refresh. The login throttle wraps only
/// the login route.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes(&state))
        .merge(user_routes())
        .merge(audit_routes())
        .merge(health_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server);

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::session::rolling_refresh,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::audit::audit_trail,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Auth endpoints: register, login, logout
fn auth_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route(
            "/login",
            post(handlers::auth::login).layer(axum_middleware::from_fn_with_state(
                state.clone(),
                middleware::rate_limit::login_throttle,
            )),
        )
        .route("/logout", post(handlers::auth::logout))
}

/// User self-service endpoints
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(handlers::user::me))
        .route("/user/password", put(handlers::user::change_password))
}

/// Audit trail endpoints
fn audit_routes() -> Router<AppState> {
    Router::new().route("/audit-logs", get(handlers::audit::list_audit_logs))
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}

//! Application builder — wires state, router, and background tasks.

use std::sync::Arc;

use axum::Router;
use axum_extra::extract::cookie::Key;
use tokio::sync::watch;
use tracing::info;

use wajha_auth::audit::AuditLog;
use wajha_auth::password::PasswordHasher;
use wajha_auth::service::AuthService;
use wajha_auth::session::{SessionCleanup, SessionManager};
use wajha_core::config::{AppConfig, DatabaseMode};
use wajha_core::error::AppError;
use wajha_database::{CredentialStore, DatabasePool, MemoryCredentialStore, PgCredentialStore};
use wajha_entity::user::CreateUser;

use crate::middleware::rate_limit::LoginThrottle;
use crate::router::build_router;
use crate::state::AppState;

/// Assembles the shared application state over a credential store.
pub fn build_state(config: AppConfig, users: Arc<dyn CredentialStore>) -> AppState {
    let config = Arc::new(config);
    let hasher = PasswordHasher::new(&config.auth);
    let sessions = Arc::new(SessionManager::new(chrono::Duration::hours(
        config.session.ttl_hours as i64,
    )));
    let audit = Arc::new(AuditLog::new(config.audit.capacity));
    let auth = Arc::new(AuthService::new(
        Arc::clone(&users),
        hasher,
        Arc::clone(&sessions),
        Arc::clone(&audit),
    ));
    let login_throttle = Arc::new(LoginThrottle::new(config.rate_limit.clone()));
    let cookie_key = Key::derive_from(config.session.secret.as_bytes());

    AppState {
        config,
        users,
        sessions,
        audit,
        auth,
        login_throttle,
        cookie_key,
    }
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Opens the configured credential store backend.
pub async fn open_credential_store(config: &AppConfig) -> Result<Arc<dyn CredentialStore>, AppError> {
    match config.database.mode {
        DatabaseMode::Postgres => {
            let pool = DatabasePool::connect(&config.database).await?;
            wajha_database::migration::run_migrations(pool.pool()).await?;
            Ok(Arc::new(PgCredentialStore::new(pool.pool().clone())))
        }
        DatabaseMode::Memory => {
            info!("Using in-memory credential store");
            Ok(Arc::new(MemoryCredentialStore::new()))
        }
    }
}

/// Creates the initial admin account when the store is empty and a
/// bootstrap password is configured.
pub async fn bootstrap_admin(state: &AppState) -> Result<(), AppError> {
    let Some(password) = state.config.auth.bootstrap_admin_password.clone() else {
        return Ok(());
    };
    if state.users.count().await? > 0 {
        return Ok(());
    }

    let hasher = PasswordHasher::new(&state.config.auth);
    let password_hash = hasher.hash_offloaded(password).await?;
    let admin = state
        .users
        .insert(&CreateUser {
            username: "admin".to_string(),
            password_hash,
            email: None,
            first_name: None,
            last_name: None,
        })
        .await?;
    info!(user_id = %admin.id, "Bootstrap admin account created");
    Ok(())
}

/// Runs the Wajha server with the given configuration.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    let users = open_credential_store(&config).await?;
    let state = build_state(config, users);
    bootstrap_admin(&state).await?;

    // Background sweep of expired sessions, cancelled on shutdown.
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let cleanup = SessionCleanup::new(
        Arc::clone(&state.sessions),
        state.config.session.cleanup_interval_minutes,
    );
    let cleanup_handle = tokio::spawn(async move { cleanup.run(cancel_rx).await });

    let addr = format!(
        "{}:{}",
        state.config.server.host, state.config.server.port
    );
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!("Listening on {}", addr);

    let app = build_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    let _ = cancel_tx.send(true);
    let _ = cleanup_handle.await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

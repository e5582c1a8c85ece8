//! Shared harness for integration tests.
//!
//! Builds the full router over the in-memory credential store with fast
//! scrypt parameters, and drives it with `tower::ServiceExt::oneshot`
//! so no socket is bound.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use serde_json::Value;
use tower::ServiceExt;

use wajha_api::app::{build_app, build_state};
use wajha_core::config::app::ServerConfig;
use wajha_core::config::audit::AuditConfig;
use wajha_core::config::auth::AuthConfig;
use wajha_core::config::logging::LoggingConfig;
use wajha_core::config::rate_limit::RateLimitConfig;
use wajha_core::config::session::SessionConfig;
use wajha_core::config::{AppConfig, DatabaseConfig};
use wajha_database::MemoryCredentialStore;

pub struct TestApp {
    pub router: Router,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig::default(),
        auth: AuthConfig {
            // Low-cost derivation keeps the suite fast.
            scrypt_log_n: 4,
            scrypt_r: 8,
            scrypt_p: 1,
            bootstrap_admin_password: None,
        },
        session: SessionConfig {
            secret: "integration-test-secret-0123456789ab".to_string(),
            ..SessionConfig::default_for_tests()
        },
        rate_limit: RateLimitConfig {
            // No artificial latency in tests unless a test opts in.
            slowdown_delay_ms: 0,
            slowdown_max_delay_ms: 0,
            ..RateLimitConfig::default()
        },
        audit: AuditConfig::default(),
        logging: LoggingConfig::default(),
    }
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(test_config())
}

pub fn spawn_app_with(config: AppConfig) -> TestApp {
    let state = build_state(config, Arc::new(MemoryCredentialStore::new()));
    TestApp {
        router: build_app(state),
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn post(&self, path: &str, body: Value, cookie: Option<&str>) -> Response<Body> {
        self.request("POST", path, Some(body), cookie).await
    }

    pub async fn put(&self, path: &str, body: Value, cookie: Option<&str>) -> Response<Body> {
        self.request("PUT", path, Some(body), cookie).await
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        self.request("GET", path, None, cookie).await
    }

    pub async fn register(&self, username: &str, password: &str) -> Response<Body> {
        self.post(
            "/api/register",
            serde_json::json!({ "username": username, "password": password }),
            None,
        )
        .await
    }

    pub async fn login(
        &self,
        username: &str,
        password: &str,
        cookie: Option<&str>,
    ) -> Response<Body> {
        self.post(
            "/api/login",
            serde_json::json!({ "username": username, "password": password }),
            cookie,
        )
        .await
    }
}

/// Extracts the `name=value` session cookie pair from a response, ready
/// to send back in a `Cookie` header.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("wajha.sid="))
        .and_then(|v| v.split(';').next())
        .map(String::from)
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

//! Audit trail integration tests.

mod common;

use axum::http::StatusCode;
use common::{body_json, session_cookie, spawn_app, spawn_app_with, test_config};
use serde_json::Value;

async fn fetch_logs(app: &common::TestApp, cookie: &str, query: &str) -> Vec<Value> {
    let path = if query.is_empty() {
        "/api/audit-logs".to_string()
    } else {
        format!("/api/audit-logs?{query}")
    };
    let response = app.get(&path, Some(cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]
        .as_array()
        .cloned()
        .unwrap_or_default()
}

#[tokio::test]
async fn test_audit_logs_require_a_session() {
    let app = spawn_app();
    let response = app.get("/api/audit-logs", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_failed_login_emits_exactly_one_login_failed() {
    let app = spawn_app();

    let registered = app.register("alice", "Passw0rd1").await;
    let cookie = session_cookie(&registered).unwrap();

    app.login("alice", "wrongpass", None).await;

    let failures = fetch_logs(&app, &cookie, "action=LOGIN_FAILED").await;
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["success"], false);
    assert_eq!(failures[0]["resource"], "auth");
}

#[tokio::test]
async fn test_successful_login_is_audited_with_user_id() {
    let app = spawn_app();

    let registered = app.register("alice", "Passw0rd1").await;
    let user_id = body_json(registered).await["data"]["id"].clone();

    let logged_in = app.login("alice", "Passw0rd1", None).await;
    let cookie = session_cookie(&logged_in).unwrap();

    let successes = fetch_logs(&app, &cookie, "action=LOGIN_SUCCESS").await;
    assert_eq!(successes.len(), 1);
    assert_eq!(successes[0]["success"], true);
    assert_eq!(successes[0]["user_id"], user_id);
}

#[tokio::test]
async fn test_entries_come_back_newest_first() {
    let app = spawn_app();

    app.register("alice", "Passw0rd1").await;
    app.login("alice", "wrongpass", None).await;
    let logged_in = app.login("alice", "Passw0rd1", None).await;
    let cookie = session_cookie(&logged_in).unwrap();

    let entries = fetch_logs(&app, &cookie, "").await;
    assert!(entries.len() >= 3);

    let timestamps: Vec<chrono::DateTime<chrono::Utc>> = entries
        .iter()
        .map(|e| e["timestamp"].as_str().unwrap().parse().unwrap())
        .collect();
    assert!(timestamps.windows(2).all(|pair| pair[0] >= pair[1]));

    // The trail holds the whole story: registration, the failure, the
    // final success.
    let actions: Vec<&str> = entries
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert!(actions.contains(&"REGISTER"));
    assert!(actions.contains(&"LOGIN_FAILED"));
    assert!(actions.contains(&"LOGIN_SUCCESS"));
}

#[tokio::test]
async fn test_captured_bodies_have_passwords_redacted() {
    let app = spawn_app();

    let registered = app.register("alice", "Passw0rd1").await;
    let cookie = session_cookie(&registered).unwrap();

    let entries = fetch_logs(&app, &cookie, "action=REGISTER").await;
    assert_eq!(entries.len(), 1);
    let details = &entries[0]["details"];
    assert_eq!(details["username"], "alice");
    assert_eq!(details["password"], "[REDACTED]");

    // Login attempts are captured too, and equally redacted.
    let logged_in = app.login("alice", "Passw0rd1", None).await;
    let cookie = session_cookie(&logged_in).unwrap();
    let attempts = fetch_logs(&app, &cookie, "action=LOGIN_ATTEMPT").await;
    assert!(!attempts.is_empty());
    for attempt in attempts {
        assert_eq!(attempt["details"]["password"], "[REDACTED]");
    }
}

#[tokio::test]
async fn test_reads_outside_auth_paths_are_not_audited() {
    let app = spawn_app();

    let registered = app.register("alice", "Passw0rd1").await;
    let cookie = session_cookie(&registered).unwrap();

    app.get("/api/user", Some(&cookie)).await;
    app.get("/api/health", None).await;

    let entries = fetch_logs(&app, &cookie, "").await;
    assert!(entries.iter().all(|e| e["action"] != "READ"));
}

#[tokio::test]
async fn test_failed_mutations_are_recorded_as_failures() {
    let app = spawn_app();

    let registered = app.register("alice", "Passw0rd1").await;
    let cookie = session_cookie(&registered).unwrap();

    // Duplicate registration fails with 400 and must be audited as such.
    app.register("alice", "Different1").await;

    let entries = fetch_logs(&app, &cookie, "action=REGISTER").await;
    assert_eq!(entries.len(), 2);
    // Newest first: the duplicate attempt leads.
    assert_eq!(entries[0]["success"], false);
    assert_eq!(entries[0]["error"], "HTTP 400");
    assert_eq!(entries[1]["success"], true);
}

#[tokio::test]
async fn test_filter_by_resource_and_limit() {
    let app = spawn_app();

    let registered = app.register("alice", "Passw0rd1").await;
    let cookie = session_cookie(&registered).unwrap();
    app.login("alice", "wrongpass", None).await;
    app.login("alice", "wrongpass", None).await;

    let auth_entries = fetch_logs(&app, &cookie, "resource=auth").await;
    assert!(auth_entries.len() >= 3);

    let limited = fetch_logs(&app, &cookie, "limit=2").await;
    assert_eq!(limited.len(), 2);
}

#[tokio::test]
async fn test_oversized_bodies_pass_through_uncaptured() {
    let mut config = test_config();
    config.audit.max_body_bytes = 1024;
    let app = spawn_app_with(config);

    // Well past the capture limit but otherwise a valid registration.
    let response = app
        .post(
            "/api/register",
            serde_json::json!({
                "username": "alice",
                "password": "Passw0rd1",
                "first_name": "x".repeat(4096),
            }),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = session_cookie(&response).unwrap();

    // The entry is still recorded, just without the captured body.
    let entries = fetch_logs(&app, &cookie, "action=REGISTER").await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["success"], true);
    assert!(entries[0]["details"].is_null());
}

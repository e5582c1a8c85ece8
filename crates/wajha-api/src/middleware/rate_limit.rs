//! Login throttling — hard fixed-window rate limit plus progressive
//! slow-down, both keyed by caller IP.
//!
//! Both guards share one attempt counter per address. The hard limit
//! rejects outright once the window's attempt budget is spent; below
//! that, attempts past the slow-down threshold are delayed by a growing
//! amount before the credential check runs. Keying is by IP only, so a
//! distributed attacker can spread attempts across addresses; per-username
//! counting was considered and deferred.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::Mutex;
use tracing::warn;

use wajha_core::config::rate_limit::RateLimitConfig;

use crate::error::ApiErrorResponse;
use crate::extractors::ClientMeta;
use crate::state::AppState;

/// Outcome of registering one login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Throttle {
    /// Proceed immediately.
    Allow,
    /// Proceed after the given delay.
    Delay(Duration),
    /// Reject; the window resets after the given number of seconds.
    Reject { retry_after_seconds: u64 },
}

#[derive(Debug)]
struct Window {
    started: Instant,
    attempts: u32,
}

/// Shared per-IP attempt counters for the login endpoint.
#[derive(Debug)]
pub struct LoginThrottle {
    config: RateLimitConfig,
    windows: Mutex<HashMap<String, Window>>,
}

impl LoginThrottle {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Counts one attempt for `key` and decides how to treat it.
    ///
    /// Rejected attempts are not counted toward the window, preserving
    /// the "no more than N attempts evaluated" guarantee.
    pub async fn register_attempt(&self, key: &str) -> Throttle {
        let window_len = Duration::from_secs(self.config.window_seconds);
        let now = Instant::now();

        let mut windows = self.windows.lock().await;
        windows.retain(|_, w| now.duration_since(w.started) < window_len);

        let window = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            attempts: 0,
        });

        if window.attempts >= self.config.max_attempts {
            let elapsed = now.duration_since(window.started);
            let remaining = window_len.saturating_sub(elapsed);
            return Throttle::Reject {
                retry_after_seconds: remaining.as_secs().max(1),
            };
        }

        window.attempts += 1;
        let over = window
            .attempts
            .saturating_sub(self.config.slowdown_threshold);
        if over > 0 {
            let delay_ms = (u64::from(over) * self.config.slowdown_delay_ms)
                .min(self.config.slowdown_max_delay_ms);
            Throttle::Delay(Duration::from_millis(delay_ms))
        } else {
            Throttle::Allow
        }
    }
}

/// Middleware guarding the login route.
pub async fn login_throttle(
    State(state): State<AppState>,
    client: ClientMeta,
    request: Request,
    next: Next,
) -> Response {
    match state.login_throttle.register_attempt(&client.ip_address).await {
        Throttle::Allow => next.run(request).await,
        Throttle::Delay(delay) => {
            tokio::time::sleep(delay).await;
            next.run(request).await
        }
        Throttle::Reject {
            retry_after_seconds,
        } => {
            warn!(ip = %client.ip_address, "Login rate limit exceeded");
            let body = ApiErrorResponse {
                error: "RATE_LIMITED".to_string(),
                message: "Too many login attempts, please try again later".to_string(),
                retry_after_seconds: Some(retry_after_seconds),
            };
            (
                StatusCode::TOO_MANY_REQUESTS,
                [("retry-after", retry_after_seconds.to_string())],
                Json(body),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> RateLimitConfig {
        RateLimitConfig {
            window_seconds: 900,
            max_attempts: 5,
            slowdown_threshold: 2,
            slowdown_delay_ms: 500,
            slowdown_max_delay_ms: 20_000,
        }
    }

    #[tokio::test]
    async fn test_sixth_attempt_is_rejected() {
        let throttle = LoginThrottle::new(fast_config());

        for _ in 0..5 {
            assert!(!matches!(
                throttle.register_attempt("203.0.113.9").await,
                Throttle::Reject { .. }
            ));
        }
        let sixth = throttle.register_attempt("203.0.113.9").await;
        let Throttle::Reject {
            retry_after_seconds,
        } = sixth
        else {
            panic!("expected rejection, got {sixth:?}");
        };
        assert!(retry_after_seconds >= 1);
        assert!(retry_after_seconds <= 900);
    }

    #[tokio::test]
    async fn test_addresses_are_throttled_independently() {
        let throttle = LoginThrottle::new(fast_config());

        for _ in 0..5 {
            throttle.register_attempt("203.0.113.9").await;
        }
        assert!(matches!(
            throttle.register_attempt("203.0.113.9").await,
            Throttle::Reject { .. }
        ));
        assert!(!matches!(
            throttle.register_attempt("198.51.100.4").await,
            Throttle::Reject { .. }
        ));
    }

    #[tokio::test]
    async fn test_slowdown_grows_then_caps() {
        let throttle = LoginThrottle::new(RateLimitConfig {
            max_attempts: 100,
            ..fast_config()
        });

        assert_eq!(throttle.register_attempt("k").await, Throttle::Allow);
        assert_eq!(throttle.register_attempt("k").await, Throttle::Allow);
        assert_eq!(
            throttle.register_attempt("k").await,
            Throttle::Delay(Duration::from_millis(500))
        );
        assert_eq!(
            throttle.register_attempt("k").await,
            Throttle::Delay(Duration::from_millis(1000))
        );

        for _ in 0..50 {
            throttle.register_attempt("k").await;
        }
        assert_eq!(
            throttle.register_attempt("k").await,
            Throttle::Delay(Duration::from_millis(20_000))
        );
    }

    #[tokio::test]
    async fn test_window_reset_clears_the_counter() {
        let throttle = LoginThrottle::new(RateLimitConfig {
            window_seconds: 0,
            ..fast_config()
        });

        for _ in 0..10 {
            // Every call starts a new window, so nothing ever rejects.
            assert!(!matches!(
                throttle.register_attempt("k").await,
                Throttle::Reject { .. }
            ));
        }
    }
}

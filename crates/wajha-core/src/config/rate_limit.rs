//! Login rate limiting configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the two login guards: the hard fixed-window limiter
/// and the progressive slow-down. Both are keyed by caller IP and share
/// one attempt counter per window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Fixed window length in seconds.
    #[serde(default = "default_window")]
    pub window_seconds: u64,
    /// Attempts allowed per window before the hard limiter rejects.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Attempts allowed per window before the slow-down starts delaying.
    #[serde(default = "default_slowdown_threshold")]
    pub slowdown_threshold: u32,
    /// Delay increment in milliseconds per attempt beyond the threshold.
    #[serde(default = "default_slowdown_delay")]
    pub slowdown_delay_ms: u64,
    /// Maximum slow-down delay in milliseconds.
    #[serde(default = "default_slowdown_max_delay")]
    pub slowdown_max_delay_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_seconds: default_window(),
            max_attempts: default_max_attempts(),
            slowdown_threshold: default_slowdown_threshold(),
            slowdown_delay_ms: default_slowdown_delay(),
            slowdown_max_delay_ms: default_slowdown_max_delay(),
        }
    }
}

fn default_window() -> u64 {
    15 * 60
}

fn default_max_attempts() -> u32 {
    5
}

fn default_slowdown_threshold() -> u32 {
    2
}

fn default_slowdown_delay() -> u64 {
    500
}

fn default_slowdown_max_delay() -> u64 {
    20_000
}

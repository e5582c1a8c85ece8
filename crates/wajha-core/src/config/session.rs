//! Session management configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Cookie signing secret. Required; minimum 32 bytes.
    pub secret: String,
    /// Session cookie name. Deliberately not a framework default.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Session lifetime in hours, refreshed on each authenticated request.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
    /// Interval for expired session cleanup in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
}

impl SessionConfig {
    /// A config with defaults and an empty secret, for unit tests.
    pub fn default_for_tests() -> Self {
        Self {
            secret: String::new(),
            cookie_name: default_cookie_name(),
            ttl_hours: default_ttl_hours(),
            cleanup_interval_minutes: default_cleanup_interval(),
        }
    }
}

fn default_cookie_name() -> String {
    "wajha.sid".to_string()
}

fn default_ttl_hours() -> u64 {
    24
}

fn default_cleanup_interval() -> u64 {
    15
}

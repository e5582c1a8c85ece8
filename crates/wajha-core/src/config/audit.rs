//! Audit trail configuration.

use serde::{Deserialize, Serialize};

/// Audit trail configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Maximum number of entries retained in memory (oldest evicted first).
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Path prefixes whose mutating requests are audited.
    #[serde(default = "default_sensitive_prefixes")]
    pub sensitive_prefixes: Vec<String>,
    /// Maximum request body bytes captured into an audit entry.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            sensitive_prefixes: default_sensitive_prefixes(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_capacity() -> usize {
    1000
}

fn default_sensitive_prefixes() -> Vec<String> {
    [
        "/api/register",
        "/api/user",
        "/api/users",
        "/api/articles",
        "/api/services",
        "/api/industries",
        "/api/case-studies",
        "/api/testimonials",
        "/api/seo",
        "/api/settings",
        "/api/contact-submissions",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

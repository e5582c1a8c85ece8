//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// scrypt cost parameter as log2(N).
    #[serde(default = "default_log_n")]
    pub scrypt_log_n: u8,
    /// scrypt block size parameter.
    #[serde(default = "default_r")]
    pub scrypt_r: u32,
    /// scrypt parallelism parameter.
    #[serde(default = "default_p")]
    pub scrypt_p: u32,
    /// If set and the credential store is empty at startup, an `admin`
    /// user is created with this password. The value is never logged.
    #[serde(default)]
    pub bootstrap_admin_password: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            scrypt_log_n: default_log_n(),
            scrypt_r: default_r(),
            scrypt_p: default_p(),
            bootstrap_admin_password: None,
        }
    }
}

fn default_log_n() -> u8 {
    14
}

fn default_r() -> u32 {
    8
}

fn default_p() -> u32 {
    1
}

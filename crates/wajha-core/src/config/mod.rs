//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod audit;
pub mod auth;
pub mod logging;
pub mod rate_limit;
pub mod session;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::audit::AuditConfig;
use self::auth::AuthConfig;
use self::logging::LoggingConfig;
use self::rate_limit::RateLimitConfig;
use self::session::SessionConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Credential store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session management settings.
    pub session: SessionConfig,
    /// Login rate limiting settings.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Audit trail settings.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend selection for the credential store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseMode {
    /// PostgreSQL-backed store (production).
    Postgres,
    /// In-memory store (development and tests).
    Memory,
}

/// Credential store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Which backend to use.
    #[serde(default = "default_mode")]
    pub mode: DatabaseMode,
    /// PostgreSQL connection URL (required when `mode = "postgres"`).
    #[serde(default)]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            url: String::new(),
            max_connections: default_max_connections(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `WAJHA__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("WAJHA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate values that must be present and sane at process start.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.session.secret.len() < 32 {
            return Err(AppError::configuration(
                "session.secret must be at least 32 bytes",
            ));
        }
        if self.database.mode == DatabaseMode::Postgres && self.database.url.is_empty() {
            return Err(AppError::configuration(
                "database.url is required when database.mode = \"postgres\"",
            ));
        }
        if self.server.is_production() && self.server.cors.allowed_origins.is_empty() {
            return Err(AppError::configuration(
                "server.cors.allowed_origins must be set in production",
            ));
        }
        Ok(())
    }
}

fn default_mode() -> DatabaseMode {
    DatabaseMode::Memory
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            session: SessionConfig {
                secret: "0123456789abcdef0123456789abcdef".to_string(),
                ..SessionConfig::default_for_tests()
            },
            rate_limit: RateLimitConfig::default(),
            audit: AuditConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_validate_accepts_sane_defaults() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_secret() {
        let mut config = base_config();
        config.session.secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_url_for_postgres() {
        let mut config = base_config();
        config.database.mode = DatabaseMode::Postgres;
        assert!(config.validate().is_err());
    }
}

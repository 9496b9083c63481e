//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod access;
pub mod app;
pub mod auth;
pub mod cache;
pub mod database;
pub mod logging;
pub mod mail;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::access::AccessConfig;
pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::cache::{CacheConfig, RedisCacheConfig};
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::mail::MailConfig;
pub use self::storage::StorageConfig;

use crate::error::AppError;

/// Deployment environment the process runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development.
    #[default]
    Development,
    /// Automated tests.
    Test,
    /// Production deployment.
    Production,
}

impl Environment {
    /// Whether this is a production deployment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Return the environment as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay) and
/// `DECKSHARE__*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment.
    #[serde(default)]
    pub environment: Environment,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Cache provider settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Token signing settings.
    pub auth: AuthConfig,
    /// Share-link access and OTP policy settings.
    #[serde(default)]
    pub access: AccessConfig,
    /// Outbound mail settings.
    #[serde(default)]
    pub mail: MailConfig,
    /// Blob store settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml` with an environment-specific overlay
    /// and environment variables prefixed with `DECKSHARE__`, then
    /// validates the result.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DECKSHARE")
                    .prefix_separator("__")
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

    /// Check cross-section invariants that serde defaults cannot express.
    ///
    /// The process must refuse to start rather than run with a missing
    /// signing secret or an in-process OTP store in production.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.validate()?;
        self.access.validate()?;

        if self.environment.is_production() && self.cache.provider != "redis" {
            return Err(AppError::configuration(format!(
                "Cache provider '{}' is not allowed in production; use 'redis'",
                self.cache.provider
            )));
        }

        Ok(())
    }
}

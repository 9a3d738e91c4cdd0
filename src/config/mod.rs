//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `CAREER_QUEST` prefix
//! and nested values are separated by a double underscore.
//!
//! # Example
//!
//! ```no_run
//! use career_quest::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod aptitude;
mod auth;
mod error;
mod server;
mod storage;

pub use ai::AiConfig;
pub use aptitude::AptitudeConfig;
pub use auth::{AuthConfig, MIN_PRODUCTION_SECRET_LEN};
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Agent calls a single request may make back to back: an evaluation then
/// the next question, or an analysis then stage generation.
pub const AGENT_CALLS_PER_REQUEST: u64 = 2;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Bearer token verification
    pub auth: AuthConfig,

    /// Remote agent service; local fallbacks when unset
    #[serde(default)]
    pub ai: AiConfig,

    /// Session expiry and sweeping
    #[serde(default)]
    pub aptitude: AptitudeConfig,

    /// Session and roadmap persistence
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CAREER_QUEST` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `CAREER_QUEST__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CAREER_QUEST__AUTH__JWT_SECRET=...` -> `auth.jwt_secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CAREER_QUEST")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load, then validate.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.ai.validate()?;
        self.aptitude.validate()?;
        self.storage.validate()?;
        self.validate_timeout_budget()?;
        Ok(())
    }

    /// Every agent call of a request must be able to time out and fall back
    /// before the HTTP layer gives up on the request.
    fn validate_timeout_budget(&self) -> Result<(), ValidationError> {
        let needed = self.ai.timeout_secs.saturating_mul(AGENT_CALLS_PER_REQUEST);
        if needed >= self.server.request_timeout_secs {
            return Err(ValidationError::AiTimeoutExceedsRequest {
                ai_secs: self.ai.timeout_secs,
                calls: AGENT_CALLS_PER_REQUEST,
                request_secs: self.server.request_timeout_secs,
            });
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("JWT secret must be at least {min} characters in production")]
    JwtSecretTooShort { min: usize },

    #[error("AI service URL must start with http:// or https://")]
    InvalidAiServiceUrl,

    #[error("AI timeout must be between 1 and 120 seconds")]
    InvalidAiTimeout,

    #[error(
        "AI timeout of {ai_secs}s leaves no room for {calls} agent calls within the {request_secs}s request timeout"
    )]
    AiTimeoutExceedsRequest {
        ai_secs: u64,
        calls: u64,
        request_secs: u64,
    },

    #[error("Session TTL must be positive")]
    InvalidSessionTtl,

    #[error("Sweep interval must be positive")]
    InvalidSweepInterval,

    #[error("Storage data_dir must not be empty for the file backend")]
    MissingDataDir,
}

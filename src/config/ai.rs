//! AI agent service configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Remote agent service settings.
///
/// Without a `base_url` every collaborator runs on its local fallback.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Base URL of the agent service, e.g. `http://localhost:8000`
    pub base_url: Option<String>,

    /// Bearer key sent to the agent service
    pub api_key: Option<Secret<String>>,

    /// Per-call timeout in seconds before the fallback answers
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured and non-blank service URL.
    pub fn service_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = self.service_url() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidAiServiceUrl);
            }
        }
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidAiTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert!(config.service_url().is_none());
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_url_means_local_only() {
        let config = AiConfig {
            base_url: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(config.service_url().is_none());
    }

    #[test]
    fn test_validation_rejects_non_http_url() {
        let config = AiConfig {
            base_url: Some("ftp://agents".to_string()),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidAiServiceUrl));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = AiConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidAiTimeout));
    }
}

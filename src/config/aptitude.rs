//! Aptitude session tuning

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct AptitudeConfig {
    /// Minutes without activity before an in-progress session is abandoned
    #[serde(default = "default_session_ttl")]
    pub session_ttl_mins: i64,

    /// Seconds between sweeps for abandoned sessions
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl AptitudeConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.session_ttl_mins <= 0 {
            return Err(ValidationError::InvalidSessionTtl);
        }
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::InvalidSweepInterval);
        }
        Ok(())
    }
}

impl Default for AptitudeConfig {
    fn default() -> Self {
        Self {
            session_ttl_mins: default_session_ttl(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_session_ttl() -> i64 {
    24 * 60
}

fn default_sweep_interval() -> u64 {
    300
}

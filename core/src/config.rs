//! Client configuration.
//!
//! The only tunable is the request timeout. It is held by the `Http` client
//! rather than a mutable global, so two clients can run with different
//! settings side by side.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Environment variable consulted by `ClientConfig::from_env`.
pub const TIMEOUT_ENV: &str = "PLAINHTTP_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Defaults, overridden by `PLAINHTTP_TIMEOUT_SECS` when it is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_value(std::env::var(TIMEOUT_ENV).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = value {
            config.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: TIMEOUT_ENV.to_string(),
                value: raw.to_string(),
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

//! Revocation store deadline and cleanup cadence

use serde::{Deserialize, Serialize};

use super::env_or;
use crate::errors::{ConfigError, ConfigResult};

/// Revocation list configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RevocationConfig {
    /// Deadline for a single revocation store round trip, in milliseconds
    pub store_timeout_ms: u64,

    /// How often the cleanup sweep runs, in seconds
    pub cleanup_interval_secs: u64,

    /// Whether the background sweep runs at all
    #[serde(default = "default_cleanup_enabled")]
    pub cleanup_enabled: bool,
}

impl Default for RevocationConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: 250,
            cleanup_interval_secs: 86_400, // daily
            cleanup_enabled: default_cleanup_enabled(),
        }
    }
}

impl RevocationConfig {
    /// Load from `REVOCATION_*` environment variables
    pub fn from_env() -> ConfigResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            store_timeout_ms: env_or("REVOCATION_STORE_TIMEOUT_MS", defaults.store_timeout_ms)?,
            cleanup_interval_secs: env_or(
                "REVOCATION_CLEANUP_INTERVAL_SECS",
                defaults.cleanup_interval_secs,
            )?,
            cleanup_enabled: env_or("REVOCATION_CLEANUP_ENABLED", defaults.cleanup_enabled)?,
        })
    }

    pub fn store_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.store_timeout_ms)
    }

    pub fn cleanup_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cleanup_interval_secs)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.store_timeout_ms == 0 {
            return Err(ConfigError::invalid("store_timeout_ms", "must be greater than zero"));
        }
        if self.cleanup_interval_secs == 0 {
            return Err(ConfigError::invalid("cleanup_interval_secs", "must be greater than zero"));
        }
        Ok(())
    }
}

fn default_cleanup_enabled() -> bool {
    true
}

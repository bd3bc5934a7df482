//! Token-bucket admission limits for the authentication endpoints

use serde::{Deserialize, Serialize};

use super::env_or;
use crate::errors::{ConfigError, ConfigResult};

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Bucket capacity (maximum burst per key)
    pub capacity: u32,

    /// Tokens added back to each bucket per second
    pub refill_per_second: f64,

    /// Upper bound on the number of keys holding a bucket at once
    #[serde(default = "default_max_tracked_keys")]
    pub max_tracked_keys: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            capacity: 10,
            refill_per_second: 10.0,
            max_tracked_keys: default_max_tracked_keys(),
        }
    }
}

impl RateLimitConfig {
    /// Load from `RATE_LIMIT_*` environment variables
    pub fn from_env() -> ConfigResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            enabled: env_or("RATE_LIMIT_ENABLED", defaults.enabled)?,
            capacity: env_or("RATE_LIMIT_CAPACITY", defaults.capacity)?,
            refill_per_second: env_or("RATE_LIMIT_REFILL_PER_SECOND", defaults.refill_per_second)?,
            max_tracked_keys: env_or("RATE_LIMIT_MAX_TRACKED_KEYS", defaults.max_tracked_keys)?,
        })
    }

    /// Create a configuration for development (more lenient)
    pub fn development() -> Self {
        Self {
            enabled: true,
            capacity: 100,
            refill_per_second: 100.0,
            max_tracked_keys: default_max_tracked_keys(),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.capacity == 0 {
            return Err(ConfigError::invalid("capacity", "must be greater than zero"));
        }
        if !(self.refill_per_second > 0.0) {
            return Err(ConfigError::invalid("refill_per_second", "must be greater than zero"));
        }
        if self.max_tracked_keys == 0 {
            return Err(ConfigError::invalid("max_tracked_keys", "must be greater than zero"));
        }
        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}

fn default_max_tracked_keys() -> usize {
    100_000
}

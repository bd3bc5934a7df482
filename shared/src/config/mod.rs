//! Configuration module with business-specific sub-modules
//!
//! - `auth` - token signing secret, lifetimes and rotation
//! - `database` - MySQL connection pool
//! - `environment` - environment detection and logging
//! - `rate_limit` - admission control for register and login
//! - `revocation` - revocation store deadline and cleanup cadence

pub mod auth;
pub mod database;
pub mod environment;
pub mod rate_limit;
pub mod revocation;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{ConfigError, ConfigResult};

pub use auth::{
    validate_secret, JwtConfig, MIN_ACCESS_TOKEN_EXPIRY_MS, MIN_REFRESH_TOKEN_EXPIRY_MS,
    MIN_SECRET_BYTES,
};
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use rate_limit::RateLimitConfig;
pub use revocation::RevocationConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub environment: Environment,

    pub database: DatabaseConfig,

    pub jwt: JwtConfig,

    pub revocation: RevocationConfig,

    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
            revocation: RevocationConfig::default(),
            rate_limit: RateLimitConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and validate it
    pub fn from_env() -> ConfigResult<Self> {
        let environment = Environment::from_env();
        let mut rate_limit = RateLimitConfig::from_env()?;
        if environment.is_development() && std::env::var("RATE_LIMIT_CAPACITY").is_err() {
            rate_limit = RateLimitConfig::development();
        }

        let config = Self {
            environment,
            database: DatabaseConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            revocation: RevocationConfig::from_env()?,
            rate_limit,
            logging: LoggingConfig::from_env(environment),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate every section; the first failure wins
    pub fn validate(&self) -> ConfigResult<()> {
        self.jwt.validate()?;
        self.revocation.validate()?;
        self.rate_limit.validate()?;
        Ok(())
    }
}

/// Read `key` from the environment, falling back to `default` when unset
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> ConfigResult<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid(key, format!("cannot parse '{}'", raw))),
        Err(_) => Ok(default),
    }
}

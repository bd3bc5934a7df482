//! Token signing and lifetime configuration

use serde::{Deserialize, Serialize};

use super::env_or;
use crate::errors::{ConfigError, ConfigResult};

/// Minimum HMAC secret length in bytes (256 bits for HS256)
pub const MIN_SECRET_BYTES: usize = 32;

/// Minimum access token lifetime (1 minute)
pub const MIN_ACCESS_TOKEN_EXPIRY_MS: i64 = 60_000;

/// Minimum refresh token lifetime (5 minutes)
pub const MIN_REFRESH_TOKEN_EXPIRY_MS: i64 = 300_000;

/// Maximum lifetime for either class (10 years); keeps every expiry
/// representable by the durable store
pub const MAX_TOKEN_EXPIRY_MS: i64 = 3_650 * 86_400_000;

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared HMAC secret for signing tokens
    pub secret: String,

    /// Access token lifetime in milliseconds
    pub access_token_expiry_ms: i64,

    /// Refresh token lifetime in milliseconds
    pub refresh_token_expiry_ms: i64,

    /// Issue a new refresh token (and revoke the old one) on every refresh
    #[serde(default)]
    pub rotate_refresh_tokens: bool,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_token_expiry_ms: 900_000,      // 15 minutes
            refresh_token_expiry_ms: 604_800_000, // 7 days
            rotate_refresh_tokens: false,
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Load from `JWT_*` environment variables
    pub fn from_env() -> ConfigResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            secret: std::env::var("JWT_SECRET").unwrap_or_default(),
            access_token_expiry_ms: env_or(
                "JWT_ACCESS_TOKEN_EXPIRY_MS",
                defaults.access_token_expiry_ms,
            )?,
            refresh_token_expiry_ms: env_or(
                "JWT_REFRESH_TOKEN_EXPIRY_MS",
                defaults.refresh_token_expiry_ms,
            )?,
            rotate_refresh_tokens: env_or(
                "JWT_ROTATE_REFRESH_TOKENS",
                defaults.rotate_refresh_tokens,
            )?,
        })
    }

    /// Set access token expiry in milliseconds
    pub fn with_access_expiry_ms(mut self, ms: i64) -> Self {
        self.access_token_expiry_ms = ms;
        self
    }

    /// Set refresh token expiry in milliseconds
    pub fn with_refresh_expiry_ms(mut self, ms: i64) -> Self {
        self.refresh_token_expiry_ms = ms;
        self
    }

    /// Enable or disable refresh token rotation
    pub fn with_rotation(mut self, rotate: bool) -> Self {
        self.rotate_refresh_tokens = rotate;
        self
    }

    /// Check the secret and lifetimes against their bounds
    pub fn validate(&self) -> ConfigResult<()> {
        validate_secret(self.secret.as_bytes())?;

        if self.access_token_expiry_ms < MIN_ACCESS_TOKEN_EXPIRY_MS {
            return Err(ConfigError::AccessLifetimeTooShort {
                actual_ms: self.access_token_expiry_ms,
                minimum_ms: MIN_ACCESS_TOKEN_EXPIRY_MS,
            });
        }

        if self.refresh_token_expiry_ms < MIN_REFRESH_TOKEN_EXPIRY_MS {
            return Err(ConfigError::RefreshLifetimeTooShort {
                actual_ms: self.refresh_token_expiry_ms,
                minimum_ms: MIN_REFRESH_TOKEN_EXPIRY_MS,
            });
        }

        for (class, actual_ms) in [
            ("access", self.access_token_expiry_ms),
            ("refresh", self.refresh_token_expiry_ms),
        ] {
            if actual_ms > MAX_TOKEN_EXPIRY_MS {
                return Err(ConfigError::LifetimeTooLong {
                    class,
                    actual_ms,
                    maximum_ms: MAX_TOKEN_EXPIRY_MS,
                });
            }
        }

        Ok(())
    }
}

/// Reject empty or short HMAC secrets
pub fn validate_secret(secret: &[u8]) -> ConfigResult<()> {
    if secret.is_empty() {
        return Err(ConfigError::EmptySecret);
    }
    if secret.len() < MIN_SECRET_BYTES {
        return Err(ConfigError::WeakSecret {
            actual: secret.len(),
            minimum: MIN_SECRET_BYTES,
        });
    }
    Ok(())
}

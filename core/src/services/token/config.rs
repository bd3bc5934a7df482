//! Configuration for the token service

use ag_shared::config::{JwtConfig, RevocationConfig};
use ag_shared::ConfigResult;
use chrono::Duration;

use crate::domain::entities::token::TokenClass;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// HMAC signing secret
    pub secret: String,
    /// Access token lifetime in milliseconds
    pub access_token_expiry_ms: i64,
    /// Refresh token lifetime in milliseconds
    pub refresh_token_expiry_ms: i64,
    /// Deadline for each revocation store round trip
    pub store_timeout: std::time::Duration,
}

impl TokenServiceConfig {
    /// Build from the validated shared configuration
    pub fn from_shared(jwt: &JwtConfig, revocation: &RevocationConfig) -> ConfigResult<Self> {
        jwt.validate()?;
        revocation.validate()?;
        Ok(Self {
            secret: jwt.secret.clone(),
            access_token_expiry_ms: jwt.access_token_expiry_ms,
            refresh_token_expiry_ms: jwt.refresh_token_expiry_ms,
            store_timeout: revocation.store_timeout(),
        })
    }

    /// Lifetime for tokens of `class`, truncated to whole seconds
    pub fn lifetime(&self, class: TokenClass) -> Duration {
        let ms = match class {
            TokenClass::Access => self.access_token_expiry_ms,
            TokenClass::Refresh => self.refresh_token_expiry_ms,
        };
        Duration::seconds(ms / 1_000)
    }

    fn as_jwt_config(&self) -> JwtConfig {
        JwtConfig::new(self.secret.clone())
            .with_access_expiry_ms(self.access_token_expiry_ms)
            .with_refresh_expiry_ms(self.refresh_token_expiry_ms)
    }

    /// Same checks as startup validation
    pub fn validate(&self) -> ConfigResult<()> {
        self.as_jwt_config().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifetime_truncates_to_seconds() {
        let config = TokenServiceConfig {
            secret: "s".repeat(32),
            access_token_expiry_ms: 60_999,
            refresh_token_expiry_ms: 300_000,
            store_timeout: std::time::Duration::from_millis(250),
        };
        assert_eq!(config.lifetime(TokenClass::Access), Duration::seconds(60));
        assert_eq!(config.lifetime(TokenClass::Refresh), Duration::seconds(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_shared_rejects_short_lifetime() {
        let jwt = JwtConfig::new("s".repeat(32)).with_access_expiry_ms(1_000);
        assert!(TokenServiceConfig::from_shared(&jwt, &RevocationConfig::default()).is_err());
    }

    #[test]
    fn test_from_shared_rejects_unstorable_lifetime() {
        let jwt = JwtConfig::new("s".repeat(32)).with_refresh_expiry_ms(i64::MAX);
        assert!(TokenServiceConfig::from_shared(&jwt, &RevocationConfig::default()).is_err());
    }
}

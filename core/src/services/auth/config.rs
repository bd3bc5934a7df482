//! Configuration for the authentication service

use ag_shared::config::JwtConfig;

/// Configuration for the authentication service
#[derive(Debug, Clone, Default)]
pub struct AuthServiceConfig {
    /// Issue a new refresh token (revoking the presented one) on refresh;
    /// otherwise the presented refresh token is handed back unchanged
    pub rotate_refresh_tokens: bool,
}

impl From<&JwtConfig> for AuthServiceConfig {
    fn from(jwt: &JwtConfig) -> Self {
        Self {
            rotate_refresh_tokens: jwt.rotate_refresh_tokens,
        }
    }
}

//! Main token service implementation

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::entities::principal::Principal;
use crate::domain::entities::token::{
    identity_prefix, Claims, ExtraClaims, RevocationRecord, TokenClass, TokenPair,
    RESERVED_CLAIMS,
};
use crate::domain::entities::user::Role;
use crate::errors::{DomainError, DomainResult, StoreError, TokenError};
use crate::repositories::{RevocationStore, StoreResult};
use crate::services::clock::Clock;

use super::bearer::normalize_token;
use super::codec::ClaimCodec;
use super::config::TokenServiceConfig;
use super::signer::Signer;

/// Stable identity of a token: lowercase hex SHA-256 of its normalized form
pub fn token_identity(token: &str) -> String {
    hex::encode(Sha256::digest(normalize_token(token).as_bytes()))
}

/// Issues, validates and revokes bearer tokens
///
/// The only component allowed to mint or revoke tokens. Holds no mutable
/// state of its own; every concurrent call goes straight to the store.
pub struct TokenService<R: RevocationStore> {
    store: Arc<R>,
    clock: Arc<dyn Clock>,
    codec: ClaimCodec,
    config: TokenServiceConfig,
}

impl<R: RevocationStore> TokenService<R> {
    /// Creates a new token service instance
    ///
    /// # Errors
    /// `DomainError::Configuration` when the secret or a lifetime is below its minimum
    pub fn new(
        store: Arc<R>,
        clock: Arc<dyn Clock>,
        config: TokenServiceConfig,
    ) -> DomainResult<Self> {
        config.validate()?;
        let signer = Signer::new(config.secret.as_bytes())?;
        let codec = ClaimCodec::new(signer)?;

        Ok(Self {
            store,
            clock,
            codec,
            config,
        })
    }

    pub fn store(&self) -> &Arc<R> {
        &self.store
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Mint a token of `class` for `subject`
    ///
    /// `expiresAt` is `now` (truncated to the second) plus the configured
    /// lifetime for the class.
    pub fn issue(
        &self,
        subject: &str,
        roles: &BTreeSet<Role>,
        extra: ExtraClaims,
        class: TokenClass,
    ) -> DomainResult<String> {
        if let Some(name) = extra.keys().find(|k| RESERVED_CLAIMS.contains(&k.as_str())) {
            return Err(DomainError::Validation {
                message: format!("extra claim '{}' is reserved", name),
            });
        }

        let iat = self.clock.now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat,
            exp: iat + self.config.lifetime(class).num_seconds(),
            jti: Uuid::new_v4().to_string(),
            token_type: class,
            roles: roles.clone(),
            extra,
        };

        let token = self.codec.encode(&claims)?;
        debug!(subject = %claims.sub, token_class = %class, exp = claims.exp, "Issued token");
        Ok(token)
    }

    /// Mint an access token carrying `access_extra` and a bare refresh token
    pub fn issue_pair(
        &self,
        subject: &str,
        roles: &BTreeSet<Role>,
        access_extra: ExtraClaims,
    ) -> DomainResult<TokenPair> {
        let access_token = self.issue(subject, roles, access_extra, TokenClass::Access)?;
        let refresh_token = self.issue(subject, roles, ExtraClaims::new(), TokenClass::Refresh)?;
        Ok(TokenPair::new(access_token, refresh_token))
    }

    /// Resolve `token` to its claims, or fail as malformed, expired or revoked
    ///
    /// A store failure or deadline miss during the revocation lookup is
    /// reported as `Revoked`; the outage itself is logged at error level.
    /// An expired token that still has a revocation record reports `Revoked`
    /// until the sweep removes the record.
    pub async fn validate(&self, token: &str, class: TokenClass) -> DomainResult<Claims> {
        let token = normalize_token(token);
        let claims = match self.codec.decode(token, self.clock.now()) {
            Ok(claims) => claims,
            Err(DomainError::Token(TokenError::Expired)) => {
                return Err(self.expired_or_revoked(token, class).await.into());
            }
            Err(e) => return Err(e),
        };

        if claims.token_type != class {
            return Err(TokenError::malformed(format!(
                "expected {} token, found {}",
                class, claims.token_type
            ))
            .into());
        }

        let identity = token_identity(token);
        match self.with_deadline("exists", self.store.exists(&identity, class)).await {
            Ok(false) => Ok(claims),
            Ok(true) => {
                warn!(
                    subject = %claims.sub,
                    token_class = %class,
                    token_id = identity_prefix(&identity),
                    "Revoked token presented"
                );
                Err(TokenError::Revoked.into())
            }
            Err(store_error) => {
                error!(
                    error = %store_error,
                    subject = %claims.sub,
                    token_class = %class,
                    "Revocation store unavailable during validation; rejecting token"
                );
                Err(TokenError::Revoked.into())
            }
        }
    }

    /// `validate` plus a subject match, collapsed to a boolean
    pub async fn validate_against_subject(
        &self,
        token: &str,
        expected_subject: &str,
        class: TokenClass,
    ) -> bool {
        match self.validate(token, class).await {
            Ok(claims) => claims.sub == expected_subject,
            Err(e) => {
                debug!(error = %e, token_class = %class, "Subject check failed");
                false
            }
        }
    }

    /// Validate an access token and return the caller it identifies
    pub async fn authenticate(&self, token: &str) -> DomainResult<Principal> {
        self.validate(token, TokenClass::Access)
            .await
            .map(Principal::from)
    }

    /// Add `token` to the revocation list under `class`
    ///
    /// Returns `true` when this call stored the record. Revoking an expired
    /// token is a no-op returning `false`; revoking the same token twice
    /// stores one record, succeeds both times, and returns `false` the
    /// second time.
    ///
    /// # Errors
    /// * `TokenError::Malformed` - the token never decoded, or is of another class
    /// * `StoreError` - the insert failed or missed its deadline
    pub async fn revoke(&self, token: &str, class: TokenClass) -> DomainResult<bool> {
        let token = normalize_token(token);
        let now = self.clock.now();

        let claims = match self.codec.decode(token, now) {
            Ok(claims) => claims,
            Err(DomainError::Token(TokenError::Expired)) => {
                debug!(token_class = %class, "Skipping revocation of expired token");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        if claims.token_type != class {
            return Err(TokenError::malformed(format!(
                "cannot revoke {} token as {}",
                claims.token_type, class
            ))
            .into());
        }

        let record = RevocationRecord::new(
            token_identity(token),
            class,
            claims.sub.clone(),
            now,
            claims.expires_at(),
        );
        let token_id = record.identity_prefix().to_string();

        let inserted = self
            .with_deadline("insert", self.store.insert(record))
            .await?;

        if inserted {
            info!(subject = %claims.sub, token_class = %class, token_id = %token_id, "Token revoked");
        } else {
            warn!(
                subject = %claims.sub,
                token_class = %class,
                token_id = %token_id,
                "Token already revoked; duplicate absorbed"
            );
        }
        Ok(inserted)
    }

    async fn expired_or_revoked(&self, token: &str, class: TokenClass) -> TokenError {
        let identity = token_identity(token);
        match self.with_deadline("exists", self.store.exists(&identity, class)).await {
            Ok(false) => {
                debug!(token_class = %class, "Expired token presented");
                TokenError::Expired
            }
            Ok(true) => {
                warn!(
                    token_class = %class,
                    token_id = identity_prefix(&identity),
                    "Revoked token presented after expiry"
                );
                TokenError::Revoked
            }
            Err(store_error) => {
                error!(
                    error = %store_error,
                    token_class = %class,
                    "Revocation store unavailable during validation; rejecting expired token"
                );
                TokenError::Revoked
            }
        }
    }

    /// Delete revocation records whose expiry is before `now`
    ///
    /// Runs off the request path, so it is not bound by the store deadline.
    pub async fn cleanup_expired(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        Ok(self.store.delete_expired_before(now).await?)
    }

    async fn with_deadline<T>(
        &self,
        operation: &str,
        call: impl Future<Output = StoreResult<T>>,
    ) -> StoreResult<T> {
        match tokio::time::timeout(self.config.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::unavailable(format!(
                "{} exceeded deadline of {}ms",
                operation,
                self.config.store_timeout.as_millis()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_identity_ignores_bearer_prefix() {
        let bare = token_identity("a.b.c");
        assert_eq!(bare.len(), 64);
        assert_eq!(bare, token_identity("Bearer a.b.c"));
        assert_eq!(bare, token_identity("  a.b.c  "));
        assert_ne!(bare, token_identity("a.b.d"));
    }
}

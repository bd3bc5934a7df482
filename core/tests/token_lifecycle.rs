//! End-to-end token lifecycle through the public API

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use ag_core::errors::{AuthError, DomainError, TokenError};
use ag_core::repositories::{MemoryRevocationStore, MemoryUserDirectory, RevocationStore};
use ag_core::services::token::{manual_ticker, token_identity};
use ag_core::{
    AuthService, AuthServiceConfig, CleanupConfig, CleanupScheduler, ExtraClaims, ManualClock,
    PasswordVerifier, RegisterRequest, Role, TokenClass, TokenService, TokenServiceConfig,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};

struct PlainPasswords;

#[async_trait]
impl PasswordVerifier for PlainPasswords {
    async fn hash(&self, plaintext: &str) -> Result<String, DomainError> {
        Ok(plaintext.chars().rev().collect())
    }

    async fn matches(&self, plaintext: &str, hash: &str) -> Result<bool, DomainError> {
        Ok(plaintext.chars().rev().collect::<String>() == hash)
    }
}

struct Fixture {
    tokens: Arc<TokenService<MemoryRevocationStore>>,
    store: Arc<MemoryRevocationStore>,
    clock: Arc<ManualClock>,
    auth: AuthService<MemoryUserDirectory, PlainPasswords, MemoryRevocationStore>,
}

fn fixture() -> Fixture {
    let clock = Arc::new(ManualClock::new(
        Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    ));
    let store = Arc::new(MemoryRevocationStore::new());
    let config = TokenServiceConfig {
        secret: "integration-secret-at-least-32-bytes".to_string(),
        access_token_expiry_ms: 60_000,
        refresh_token_expiry_ms: 300_000,
        store_timeout: Duration::from_millis(250),
    };
    let tokens = Arc::new(TokenService::new(store.clone(), clock.clone(), config).unwrap());
    let auth = AuthService::new(
        Arc::new(MemoryUserDirectory::new()),
        Arc::new(PlainPasswords),
        tokens.clone(),
        AuthServiceConfig::default(),
    );

    Fixture {
        tokens,
        store,
        clock,
        auth,
    }
}

fn basic() -> BTreeSet<Role> {
    BTreeSet::from([Role::BasicUser])
}

#[tokio::test]
async fn access_token_expires_after_its_lifetime() {
    let f = fixture();
    let token = f
        .tokens
        .issue("u1", &basic(), ExtraClaims::new(), TokenClass::Access)
        .unwrap();

    let claims = f.tokens.validate(&token, TokenClass::Access).await.unwrap();
    assert_eq!(claims.sub, "u1");
    assert_eq!(claims.roles, basic());

    f.clock.advance_ms(61_000);
    let err = f.tokens.validate(&token, TokenClass::Access).await.unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::Expired)));
}

#[tokio::test]
async fn revoked_refresh_token_cannot_refresh_but_login_still_works() {
    let f = fixture();
    let session = f
        .auth
        .register(RegisterRequest::new("u1", "u1@example.com", "pa55word"))
        .await
        .unwrap();

    f.tokens
        .revoke(&session.refresh_token, TokenClass::Refresh)
        .await
        .unwrap();

    let err = f.auth.refresh(&session.refresh_token).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::InvalidRefreshToken { .. })
    ));

    let login = f.auth.login("u1@example.com", "pa55word").await.unwrap();
    assert_ne!(login.refresh_token, session.refresh_token);
    assert!(f
        .tokens
        .validate(&login.refresh_token, TokenClass::Refresh)
        .await
        .is_ok());
}

#[tokio::test]
async fn revocation_outlives_expiry_until_swept() {
    let f = fixture();
    let token = f
        .tokens
        .issue("u1", &basic(), ExtraClaims::new(), TokenClass::Access)
        .unwrap();
    f.tokens.revoke(&token, TokenClass::Access).await.unwrap();

    let identity = token_identity(&token);
    assert!(f.store.exists(&identity, TokenClass::Access).await.unwrap());

    f.clock.advance_ms(120_000);
    let err = f.tokens.validate(&token, TokenClass::Access).await.unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::Revoked)));

    let scheduler = Arc::new(CleanupScheduler::new(
        f.tokens.clone(),
        CleanupConfig::default(),
    ));
    let (ticker, trigger) = manual_ticker();
    let handle = scheduler.spawn(ticker).unwrap();

    assert!(trigger.fire().await);
    assert!(!f.store.exists(&identity, TokenClass::Access).await.unwrap());

    // Still rejected, now by the expiry check
    let err = f.tokens.validate(&token, TokenClass::Access).await.unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::Expired)));

    assert_eq!(handle.shutdown().await.unwrap(), 1);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let f = fixture();
    let session = f
        .auth
        .register(RegisterRequest::new("u2", "u2@example.com", "pa55word"))
        .await
        .unwrap();

    let principal = f.tokens.authenticate(&session.access_token).await.unwrap();
    assert_eq!(principal.username(), Some("u2"));

    f.auth
        .logout(&session.access_token, &session.refresh_token)
        .await
        .unwrap();

    assert!(f.tokens.authenticate(&session.access_token).await.is_err());
    assert!(f.auth.refresh(&session.refresh_token).await.is_err());
    assert_eq!(f.store.len().await, 2);
}

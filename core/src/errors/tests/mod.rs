//! Unit tests for domain error types

use ag_shared::ConfigError;

use crate::errors::{AuthError, DomainError, StoreError, TokenError};

#[test]
fn test_token_error_codes() {
    assert_eq!(TokenError::malformed("x").error_code(), "TOKEN_MALFORMED");
    assert_eq!(TokenError::Expired.error_code(), "TOKEN_EXPIRED");
    assert_eq!(TokenError::Revoked.error_code(), "TOKEN_REVOKED");
}

#[test]
fn test_domain_error_bridges() {
    let err: DomainError = TokenError::Revoked.into();
    assert_eq!(err.error_code(), "TOKEN_REVOKED");
    assert_eq!(err.as_token_error(), Some(&TokenError::Revoked));

    let err: DomainError = StoreError::unavailable("timeout").into();
    assert_eq!(err.error_code(), "STORE_UNAVAILABLE");
    assert!(err.as_token_error().is_none());

    let err: DomainError = ConfigError::EmptySecret.into();
    assert!(matches!(err, DomainError::Configuration(ConfigError::EmptySecret)));
}

#[test]
fn test_invalid_credentials_message_is_generic() {
    let message = AuthError::InvalidCredentials.to_string();
    assert_eq!(message, "Invalid email or password");
}

#[test]
fn test_logout_failed_carries_cause() {
    let cause = DomainError::Store(StoreError::unavailable("connection refused"));
    let err = AuthError::LogoutFailed {
        source: Box::new(cause),
    };
    assert_eq!(err.error_code(), "LOGOUT_FAILED");
    assert!(err.to_string().contains("connection refused"));

    match err {
        AuthError::LogoutFailed { source } => {
            assert!(matches!(*source, DomainError::Store(StoreError::Unavailable { .. })));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

//! Error types for token handling, revocation storage and the authentication flow
//!
//! Each variant maps to one stable machine-readable code via `error_code()`.
//! Human-facing wording is left to whichever transport sits in front of the
//! authentication flow.

use thiserror::Error;

use super::DomainError;

/// Token-related errors
///
/// Resolution order when validating a token string is strict:
/// malformed, then expired, then revoked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token: {reason}")]
    Malformed { reason: String },

    #[error("Token expired")]
    Expired,

    #[error("Token revoked")]
    Revoked,

    #[error("Token generation failed: {reason}")]
    GenerationFailed { reason: String },
}

impl TokenError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => "TOKEN_MALFORMED",
            Self::Expired => "TOKEN_EXPIRED",
            Self::Revoked => "TOKEN_REVOKED",
            Self::GenerationFailed { .. } => "TOKEN_GENERATION_FAILED",
        }
    }
}

/// Revocation store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached, or did not answer within its deadline
    #[error("Revocation store unavailable: {message}")]
    Unavailable { message: String },

    /// Integrity fault other than an idempotent duplicate insert
    #[error("Revocation store constraint violation: {message}")]
    ConstraintViolation { message: String },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "STORE_UNAVAILABLE",
            Self::ConstraintViolation { .. } => "STORE_CONSTRAINT_VIOLATION",
        }
    }
}

/// Authentication flow errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Email already registered: {email}")]
    DuplicateEmail { email: String },

    #[error("Username already taken: {username}")]
    DuplicateUsername { username: String },

    /// Deliberately identical for unknown accounts and wrong passwords
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account disabled")]
    AccountDisabled,

    #[error("Invalid refresh token: {message}")]
    InvalidRefreshToken { message: String },

    #[error("Logout failed: {source}")]
    LogoutFailed { source: Box<DomainError> },

    #[error("Too many requests")]
    RateLimitExceeded,
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateEmail { .. } => "DUPLICATE_EMAIL",
            Self::DuplicateUsername { .. } => "DUPLICATE_USERNAME",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountDisabled => "ACCOUNT_DISABLED",
            Self::InvalidRefreshToken { .. } => "INVALID_REFRESH_TOKEN",
            Self::LogoutFailed { .. } => "LOGOUT_FAILED",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
        }
    }
}

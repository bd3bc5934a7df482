//! Password hashing seam

use async_trait::async_trait;

use crate::errors::DomainError;

/// Adaptive password hashing, implemented outside the core
#[async_trait]
pub trait PasswordVerifier: Send + Sync {
    /// Hash `plaintext` for storage
    async fn hash(&self, plaintext: &str) -> Result<String, DomainError>;

    /// Whether `plaintext` matches a stored `hash`
    ///
    /// A hash in an unrecognised format is a mismatch, not an error.
    async fn matches(&self, plaintext: &str, hash: &str) -> Result<bool, DomainError>;
}

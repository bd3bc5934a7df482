//! Revocation store trait: the durable denylist of token identities.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::token::{RevocationRecord, TokenClass};
use crate::errors::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persisted mapping from (token identity, token class) to revocation metadata
///
/// Implementations must be safe to call concurrently; callers hold no lock
/// around any of these operations.
///
/// # Failure policy
/// An unreachable store must answer `Err(StoreError::Unavailable)`, never
/// `Ok(false)`. Callers treat an unknown revocation status as revoked.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Point lookup of a revocation entry
    ///
    /// # Returns
    /// * `Ok(true)` - The token has been revoked under this class
    /// * `Ok(false)` - No entry for this (identity, class) pair
    /// * `Err(StoreError)` - Revocation status unknown
    async fn exists(&self, token_identity: &str, token_class: TokenClass) -> StoreResult<bool>;

    /// Insert a revocation entry
    ///
    /// A second insert of an already-present (identity, class) pair is absorbed.
    ///
    /// # Returns
    /// * `Ok(true)` - A new entry was stored
    /// * `Ok(false)` - The pair was already present; nothing changed
    /// * `Err(StoreError::ConstraintViolation)` - Integrity fault unrelated to the duplicate
    async fn insert(&self, record: RevocationRecord) -> StoreResult<bool>;

    /// Delete every entry whose `expires_at` is strictly before `instant`
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of entries removed
    async fn delete_expired_before(&self, instant: DateTime<Utc>) -> StoreResult<u64>;
}

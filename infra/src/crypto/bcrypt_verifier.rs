//! bcrypt implementation of the PasswordVerifier trait.
//!
//! Hashing is CPU-bound, so both operations run on the blocking pool.

use async_trait::async_trait;
use tokio::task;
use tracing::warn;

use ag_core::errors::DomainError;
use ag_core::services::auth::PasswordVerifier;

/// PasswordVerifier using bcrypt with a fixed cost
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordVerifier {
    cost: u32,
}

impl Default for BcryptPasswordVerifier {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl BcryptPasswordVerifier {
    /// Verifier with an explicit work factor (4..=31)
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

fn join_error(e: task::JoinError) -> DomainError {
    DomainError::Internal {
        message: format!("password hashing task failed: {}", e),
    }
}

#[async_trait]
impl PasswordVerifier for BcryptPasswordVerifier {
    async fn hash(&self, plaintext: &str) -> Result<String, DomainError> {
        let plaintext = plaintext.to_string();
        let cost = self.cost;

        task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(join_error)?
            .map_err(|e| DomainError::Internal {
                message: format!("password hashing failed: {}", e),
            })
    }

    async fn matches(&self, plaintext: &str, hash: &str) -> Result<bool, DomainError> {
        let plaintext = plaintext.to_string();
        let hash = hash.to_string();

        let verified = task::spawn_blocking(move || bcrypt::verify(plaintext, &hash))
            .await
            .map_err(join_error)?;

        match verified {
            Ok(matched) => Ok(matched),
            Err(e) => {
                warn!(error = %e, "Stored password hash is unreadable; treating as mismatch");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> BcryptPasswordVerifier {
        BcryptPasswordVerifier::with_cost(4)
    }

    #[tokio::test]
    async fn test_hash_then_match() {
        let verifier = fast();
        let hash = verifier.hash("correct horse").await.unwrap();

        assert!(hash.starts_with("$2"));
        assert_ne!(hash, "correct horse");
        assert!(verifier.matches("correct horse", &hash).await.unwrap());
        assert!(!verifier.matches("wrong", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let verifier = fast();
        let first = verifier.hash("pw").await.unwrap();
        let second = verifier.hash("pw").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_garbage_hash_is_a_mismatch() {
        assert!(!fast().matches("pw", "not-a-bcrypt-hash").await.unwrap());
    }

    #[test]
    fn test_default_cost() {
        assert_eq!(BcryptPasswordVerifier::default().cost(), bcrypt::DEFAULT_COST);
    }
}

//! MySQL implementation of the RevocationStore trait.
//!
//! Rows are keyed by `(token_hash, token_class)`; the raw token is never
//! stored. An index on `expires_at` keeps the cleanup sweep cheap.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use tracing::debug;

use ag_core::domain::entities::token::{RevocationRecord, TokenClass};
use ag_core::repositories::{RevocationStore, StoreResult};

use super::{is_unique_violation, map_store_error};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS revoked_tokens (
        token_hash CHAR(64) NOT NULL,
        token_class VARCHAR(16) NOT NULL,
        subject VARCHAR(320) NOT NULL,
        revoked_at DATETIME NOT NULL,
        expires_at DATETIME NOT NULL,
        PRIMARY KEY (token_hash, token_class),
        INDEX idx_revoked_tokens_expires_at (expires_at)
    )
"#;

/// MySQL implementation of RevocationStore
pub struct MySqlRevocationStore {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlRevocationStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Create the `revoked_tokens` table if it does not exist yet
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| map_store_error("create revoked_tokens", e))?;
        Ok(())
    }
}

#[async_trait]
impl RevocationStore for MySqlRevocationStore {
    async fn exists(&self, token_identity: &str, token_class: TokenClass) -> StoreResult<bool> {
        let query = r#"
            SELECT 1
            FROM revoked_tokens
            WHERE token_hash = ? AND token_class = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(token_identity)
            .bind(token_class.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_store_error("exists", e))?;

        Ok(row.is_some())
    }

    async fn insert(&self, record: RevocationRecord) -> StoreResult<bool> {
        let query = r#"
            INSERT INTO revoked_tokens (
                token_hash, token_class, subject, revoked_at, expires_at
            ) VALUES (?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(&record.token_identity)
            .bind(record.token_class.as_str())
            .bind(&record.subject)
            .bind(record.revoked_at)
            .bind(record.expires_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(true),
            // The primary key is the (hash, class) pair, so this is the duplicate
            Err(e) if is_unique_violation(&e) => {
                debug!(token_class = %record.token_class, "Revocation row already present");
                Ok(false)
            }
            Err(e) => Err(map_store_error("insert", e)),
        }
    }

    async fn delete_expired_before(&self, instant: DateTime<Utc>) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < ?")
            .bind(instant)
            .execute(&self.pool)
            .await
            .map_err(|e| map_store_error("delete expired", e))?;

        Ok(result.rows_affected())
    }
}

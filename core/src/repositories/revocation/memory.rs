//! In-process revocation store backed by a `tokio` RwLock'd map

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::token::{RevocationRecord, TokenClass};

use super::r#trait::{RevocationStore, StoreResult};

type RecordKey = (String, TokenClass);

/// Revocation store for tests and single-process deployments
#[derive(Debug, Clone, Default)]
pub struct MemoryRevocationStore {
    records: Arc<RwLock<HashMap<RecordKey, RevocationRecord>>>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Copy of the stored entry for a pair, if any
    pub async fn get(&self, token_identity: &str, token_class: TokenClass) -> Option<RevocationRecord> {
        self.records
            .read()
            .await
            .get(&(token_identity.to_string(), token_class))
            .cloned()
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn exists(&self, token_identity: &str, token_class: TokenClass) -> StoreResult<bool> {
        let records = self.records.read().await;
        Ok(records.contains_key(&(token_identity.to_string(), token_class)))
    }

    async fn insert(&self, record: RevocationRecord) -> StoreResult<bool> {
        let mut records = self.records.write().await;
        let key = (record.token_identity.clone(), record.token_class);

        // First writer wins; later inserts never overwrite
        if records.contains_key(&key) {
            return Ok(false);
        }
        records.insert(key, record);
        Ok(true)
    }

    async fn delete_expired_before(&self, instant: DateTime<Utc>) -> StoreResult<u64> {
        let mut records = self.records.write().await;
        let initial_count = records.len();

        records.retain(|_, record| record.expires_at >= instant);

        Ok((initial_count - records.len()) as u64)
    }
}

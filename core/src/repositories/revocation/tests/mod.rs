//! Tests for the in-memory revocation store

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::domain::entities::token::{RevocationRecord, TokenClass};
use crate::repositories::revocation::{MemoryRevocationStore, RevocationStore};

fn record(identity: &str, class: TokenClass, expires_in: Duration) -> RevocationRecord {
    let now = Utc::now();
    RevocationRecord::new(
        identity.to_string(),
        class,
        "u1@example.com".to_string(),
        now,
        now + expires_in,
    )
}

#[tokio::test]
async fn test_insert_then_exists() {
    let store = MemoryRevocationStore::new();
    assert!(!store.exists("abc", TokenClass::Access).await.unwrap());

    let inserted = store
        .insert(record("abc", TokenClass::Access, Duration::minutes(15)))
        .await
        .unwrap();

    assert!(inserted);
    assert!(store.exists("abc", TokenClass::Access).await.unwrap());
}

#[tokio::test]
async fn test_classes_are_independent() {
    let store = MemoryRevocationStore::new();
    store
        .insert(record("abc", TokenClass::Access, Duration::minutes(15)))
        .await
        .unwrap();

    assert!(!store.exists("abc", TokenClass::Refresh).await.unwrap());
}

#[tokio::test]
async fn test_duplicate_insert_is_absorbed() {
    let store = MemoryRevocationStore::new();
    let first = record("abc", TokenClass::Refresh, Duration::days(7));
    let mut second = first.clone();
    second.subject = "someone-else@example.com".to_string();

    assert!(store.insert(first.clone()).await.unwrap());
    assert!(!store.insert(second).await.unwrap());

    assert_eq!(store.len().await, 1);
    assert_eq!(store.get("abc", TokenClass::Refresh).await, Some(first));
}

#[tokio::test]
async fn test_concurrent_inserts_store_one_record() {
    let store = Arc::new(MemoryRevocationStore::new());
    let rec = record("same", TokenClass::Access, Duration::minutes(15));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = Arc::clone(&store);
            let rec = rec.clone();
            tokio::spawn(async move { store.insert(rec).await.unwrap() })
        })
        .collect();

    let mut new_rows = 0;
    for handle in handles {
        if handle.await.unwrap() {
            new_rows += 1;
        }
    }

    assert_eq!(new_rows, 1);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_delete_expired_before() {
    let store = MemoryRevocationStore::new();
    store
        .insert(record("old", TokenClass::Access, Duration::minutes(-1)))
        .await
        .unwrap();
    store
        .insert(record("live", TokenClass::Access, Duration::minutes(10)))
        .await
        .unwrap();

    let deleted = store.delete_expired_before(Utc::now()).await.unwrap();

    assert_eq!(deleted, 1);
    assert!(!store.exists("old", TokenClass::Access).await.unwrap());
    assert!(store.exists("live", TokenClass::Access).await.unwrap());

    // Nothing left to sweep
    assert_eq!(store.delete_expired_before(Utc::now()).await.unwrap(), 0);
}

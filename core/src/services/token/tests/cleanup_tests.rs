//! Tests for the cleanup scheduler

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::token::{ExtraClaims, TokenClass};
use crate::domain::entities::user::Role;
use crate::services::clock::Clock;
use crate::services::token::{manual_ticker, CleanupConfig, CleanupScheduler, IntervalTicker};

use super::mocks::{memory_service, service_with, UnreachableStore};

fn daily() -> CleanupConfig {
    CleanupConfig {
        interval: Duration::from_secs(86_400),
        enabled: true,
    }
}

#[tokio::test]
async fn test_run_once_removes_only_expired_records() {
    let (service, store, clock) = memory_service();
    let roles = BTreeSet::from([Role::BasicUser]);

    let access = service
        .issue("u1", &roles, ExtraClaims::new(), TokenClass::Access)
        .unwrap();
    let refresh = service
        .issue("u1", &roles, ExtraClaims::new(), TokenClass::Refresh)
        .unwrap();
    service.revoke(&access, TokenClass::Access).await.unwrap();
    service.revoke(&refresh, TokenClass::Refresh).await.unwrap();

    // Access (60s) is past expiry, refresh (300s) is not
    clock.advance_ms(120_000);

    let scheduler = CleanupScheduler::new(Arc::new(service), daily());
    let result = scheduler.run_once().await.unwrap();

    assert_eq!(result.deleted, 1);
    assert_eq!(result.swept_before, clock.now());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_run_once_reports_store_failure() {
    let (service, _) = service_with(Arc::new(UnreachableStore::default()));
    let scheduler = CleanupScheduler::new(Arc::new(service), daily());

    assert!(scheduler.run_once().await.is_err());
}

#[tokio::test]
async fn test_background_task_sweeps_on_each_tick() {
    let (service, store, clock) = memory_service();
    let service = Arc::new(service);
    let roles = BTreeSet::from([Role::BasicUser]);

    let scheduler = Arc::new(CleanupScheduler::new(service.clone(), daily()));
    let (ticker, trigger) = manual_ticker();
    let handle = scheduler.spawn(ticker).unwrap();

    let token = service
        .issue("u1", &roles, ExtraClaims::new(), TokenClass::Access)
        .unwrap();
    service.revoke(&token, TokenClass::Access).await.unwrap();

    // Not yet expired: the sweep leaves it
    assert!(trigger.fire().await);
    assert_eq!(store.len().await, 1);

    clock.advance_ms(61_000);
    assert!(trigger.fire().await);
    assert!(store.is_empty().await);

    assert_eq!(handle.shutdown().await.unwrap(), 2);
}

#[tokio::test]
async fn test_failed_sweep_keeps_task_alive() {
    let (service, _) = service_with(Arc::new(UnreachableStore::default()));
    let scheduler = Arc::new(CleanupScheduler::new(Arc::new(service), daily()));
    let (ticker, trigger) = manual_ticker();
    let handle = scheduler.spawn(ticker).unwrap();

    assert!(trigger.fire().await);
    assert!(trigger.fire().await);
    assert!(!handle.is_finished());

    assert_eq!(handle.shutdown().await.unwrap(), 2);
}

#[tokio::test]
async fn test_disabled_scheduler_does_not_spawn() {
    let (service, _, _) = memory_service();
    let config = CleanupConfig {
        enabled: false,
        ..daily()
    };
    let scheduler = Arc::new(CleanupScheduler::new(Arc::new(service), config));

    assert!(scheduler.spawn(IntervalTicker::new(Duration::from_secs(1))).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_interval_ticker_drives_daily_sweep() {
    let (service, store, clock) = memory_service();
    let service = Arc::new(service);
    let roles = BTreeSet::from([Role::BasicUser]);

    let token = service
        .issue("u1", &roles, ExtraClaims::new(), TokenClass::Access)
        .unwrap();
    service.revoke(&token, TokenClass::Access).await.unwrap();
    clock.advance_ms(61_000);

    let scheduler = Arc::new(CleanupScheduler::new(service.clone(), daily()));
    let handle = scheduler
        .spawn(IntervalTicker::new(Duration::from_secs(86_400)))
        .unwrap();

    // First tick fires immediately
    for _ in 0..10 {
        if store.is_empty().await {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(store.is_empty().await);

    let sweeps = handle.shutdown().await.unwrap();
    assert!(sweeps >= 1);
}

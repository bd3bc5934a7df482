//! Wiring for the revocation sweeper process

use std::future::Future;
use std::sync::Arc;
use tracing::info;

use ag_core::errors::DomainError;
use ag_core::services::token::{
    CleanupConfig, CleanupScheduler, IntervalTicker, TokenService, TokenServiceConfig,
};
use ag_core::services::SystemClock;
use ag_shared::AppConfig;

use crate::database::{DatabasePool, MySqlRevocationStore};
use crate::InfrastructureError;

/// Run the cleanup task against MySQL until `shutdown` resolves
///
/// Returns the number of sweeps performed. With cleanup disabled the pool is
/// closed straight away and no sweep runs.
pub async fn run<F>(config: &AppConfig, shutdown: F) -> Result<u64, InfrastructureError>
where
    F: Future<Output = ()>,
{
    let token_config = TokenServiceConfig::from_shared(&config.jwt, &config.revocation)?;
    let cleanup = CleanupConfig::from(&config.revocation);

    let pool = DatabasePool::new(config.database.clone()).await?;
    let store = Arc::new(MySqlRevocationStore::new(pool.get_pool().clone()));
    store.ensure_schema().await.map_err(DomainError::from)?;

    let tokens = Arc::new(TokenService::new(
        store,
        Arc::new(SystemClock::new()),
        token_config,
    )?);
    let scheduler = Arc::new(CleanupScheduler::new(tokens, cleanup.clone()));

    let Some(handle) = scheduler.spawn(IntervalTicker::new(cleanup.interval)) else {
        pool.close().await;
        return Ok(0);
    };

    shutdown.await;
    info!("Shutdown requested; stopping revocation cleanup");

    let sweeps = handle.shutdown().await?;
    pool.close().await;
    Ok(sweeps)
}

//! Background sweep that bounds the revocation list
//!
//! A revocation record is only useful until the token it names expires;
//! after that the expiry check rejects the token on its own. The sweep
//! deletes those records on a fixed cadence.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use ag_shared::config::RevocationConfig;

use crate::errors::{DomainError, DomainResult};
use crate::repositories::RevocationStore;

use super::service::TokenService;
use super::ticker::Ticker;

/// Configuration for the cleanup scheduler
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// Time between sweeps
    pub interval: Duration,
    /// Whether to run the background task at all
    pub enabled: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(86_400), // daily
            enabled: true,
        }
    }
}

impl From<&RevocationConfig> for CleanupConfig {
    fn from(config: &RevocationConfig) -> Self {
        Self {
            interval: config.cleanup_interval(),
            enabled: config.cleanup_enabled,
        }
    }
}

/// Outcome of one sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupResult {
    /// Records removed
    pub deleted: u64,
    /// Cutoff used for the sweep
    pub swept_before: DateTime<Utc>,
}

/// Periodic sweep of expired revocation records
pub struct CleanupScheduler<R: RevocationStore + 'static> {
    token_service: Arc<TokenService<R>>,
    config: CleanupConfig,
}

impl<R: RevocationStore + 'static> CleanupScheduler<R> {
    pub fn new(token_service: Arc<TokenService<R>>, config: CleanupConfig) -> Self {
        Self {
            token_service,
            config,
        }
    }

    pub fn config(&self) -> &CleanupConfig {
        &self.config
    }

    /// Run a single sweep against the token service's current time
    pub async fn run_once(&self) -> DomainResult<CleanupResult> {
        let now = self.token_service.clock().now();

        match self.token_service.cleanup_expired(now).await {
            Ok(deleted) => {
                info!(deleted, swept_before = %now, "Revocation cleanup completed");
                Ok(CleanupResult {
                    deleted,
                    swept_before: now,
                })
            }
            Err(e) => {
                error!(error = %e, "Revocation cleanup failed");
                Err(e)
            }
        }
    }

    /// Start the sweep as a background task driven by `ticker`
    ///
    /// Returns `None` when cleanup is disabled. A failed sweep is logged and
    /// the task waits for the next tick.
    pub fn spawn<T: Ticker + 'static>(self: Arc<Self>, mut ticker: T) -> Option<CleanupHandle> {
        if !self.config.enabled {
            warn!("Revocation cleanup is disabled");
            return None;
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            info!(
                interval_secs = self.config.interval.as_secs(),
                "Revocation cleanup task started"
            );

            let mut sweeps = 0u64;
            loop {
                tokio::select! {
                    biased;

                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {
                        let _ = self.run_once().await;
                        sweeps += 1;
                    }
                }
            }

            info!(sweeps, "Revocation cleanup task stopped");
            sweeps
        });

        Some(CleanupHandle {
            shutdown: shutdown_tx,
            task,
        })
    }
}

/// Handle to a running cleanup task
#[derive(Debug)]
pub struct CleanupHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<u64>,
}

impl CleanupHandle {
    /// Signal the task to stop and wait for it; returns the number of sweeps run
    pub async fn shutdown(self) -> DomainResult<u64> {
        let _ = self.shutdown.send(true);
        self.task.await.map_err(|e| DomainError::Internal {
            message: format!("cleanup task ended abnormally: {}", e),
        })
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

//! Revocation sweeper
//!
//! Deletes revocation records whose tokens have expired, on the configured
//! cadence, until interrupted.

use tracing::{error, info};

use ag_infra::{init_tracing, sweeper};
use ag_shared::{AppConfig, Environment, LoggingConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env();
    init_tracing(&LoggingConfig::from_env(environment))?;

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Refusing to start: invalid configuration");
            std::process::exit(1);
        }
    };

    info!(
        environment = %config.environment,
        interval_secs = config.revocation.cleanup_interval_secs,
        "Starting revocation sweeper"
    );

    let sweeps = sweeper::run(&config, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
    })
    .await?;

    info!(sweeps, "Revocation sweeper stopped");
    Ok(())
}

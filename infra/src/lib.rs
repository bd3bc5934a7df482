//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborators the AuthGate core depends on.
//!
//! ## Architecture
//!
//! - **Database**: MySQL revocation store and user directory using SQLx
//! - **Crypto**: bcrypt password hashing
//! - **Telemetry**: tracing subscriber installation driven by `LoggingConfig`
//!
//! The `ag_sweeper` binary wires these together to run the revocation
//! cleanup task against the durable store.

pub mod crypto;
pub mod database;
pub mod sweeper;
pub mod telemetry;

pub use crypto::BcryptPasswordVerifier;
pub use database::{DatabasePool, MySqlRevocationStore, MySqlUserDirectory, PoolStatistics};
pub use telemetry::init_tracing;

use ag_core::errors::DomainError;
use ag_shared::ConfigError;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Startup configuration rejected by validation
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    /// Failure reported by a core service during wiring
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Tracing subscriber could not be installed
    #[error("Telemetry error: {0}")]
    Telemetry(String),
}

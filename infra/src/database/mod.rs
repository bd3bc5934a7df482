//! Database module - MySQL implementations using SQLx
//!
//! This module provides the durable side of the core's store traits:
//! - Connection pool management
//! - Revocation store and user directory implementations
//! - Idempotent schema creation

pub mod connection;
pub mod mysql;


// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{MySqlRevocationStore, MySqlUserDirectory};

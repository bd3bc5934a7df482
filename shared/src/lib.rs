//! Shared configuration and validation for AuthGate
//!
//! This crate provides functionality used across all workspace crates:
//! - Configuration types and startup validation
//! - Configuration error types
//! - Input validators

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, DatabaseConfig, Environment, JwtConfig, LogFormat, LoggingConfig,
    RateLimitConfig, RevocationConfig,
};
pub use errors::{ConfigError, ConfigResult};
pub use utils::validation;

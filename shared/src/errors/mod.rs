//! Configuration error types shared by every crate in the workspace.
//!
//! These errors are raised while validating configuration at startup. A process
//! that receives one of them must refuse to start.

use thiserror::Error;

/// Startup-fatal configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT secret must not be empty")]
    EmptySecret,

    #[error("JWT secret is too short: {actual} bytes (minimum: {minimum})")]
    WeakSecret { actual: usize, minimum: usize },

    #[error("Access token lifetime too short: {actual_ms}ms (minimum: {minimum_ms}ms)")]
    AccessLifetimeTooShort { actual_ms: i64, minimum_ms: i64 },

    #[error("Refresh token lifetime too short: {actual_ms}ms (minimum: {minimum_ms}ms)")]
    RefreshLifetimeTooShort { actual_ms: i64, minimum_ms: i64 },

    #[error("{class} token lifetime too long: {actual_ms}ms (maximum: {maximum_ms}ms)")]
    LifetimeTooLong {
        class: &'static str,
        actual_ms: i64,
        maximum_ms: i64,
    },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    /// Shorthand for an out-of-range or unparsable field
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result alias for configuration validation
pub type ConfigResult<T> = Result<T, ConfigError>;

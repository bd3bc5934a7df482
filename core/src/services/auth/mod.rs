//! Authentication service module
//!
//! This module provides the authentication flow on top of the token service:
//! - User registration and login
//! - Access token refresh, with optional refresh token rotation
//! - Logout by revoking both tokens of a session
//! - Admission control ahead of register and login

mod admission;
mod config;
mod password;
mod service;

#[cfg(test)]
mod tests;

pub use admission::{AdmissionControl, TokenBucketLimiter};
pub use config::AuthServiceConfig;
pub use password::PasswordVerifier;
pub use service::AuthService;

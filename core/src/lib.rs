//! # AuthGate Core
//!
//! Token lifecycle and revocation for AuthGate.
//! This crate contains the token and user entities, the token and
//! authentication services, the store interfaces they depend on, and the
//! error types shared across them.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    ClaimValue, Claims, ExtraClaims, Identity, Principal, RevocationRecord, Role, TokenClass,
    TokenPair, User,
};
pub use domain::value_objects::{
    AuthResponse, LogoutConfirmation, RefreshResponse, RegisterRequest, UserProfile,
};
pub use errors::{AuthError, DomainError, DomainResult, StoreError, TokenError};
pub use repositories::{
    MemoryRevocationStore, MemoryUserDirectory, RevocationStore, StoreResult, UserDirectory,
};
pub use services::{
    AdmissionControl, AuthService, AuthServiceConfig, CleanupConfig, CleanupHandle,
    CleanupResult, CleanupScheduler, Clock, IntervalTicker, ManualClock, PasswordVerifier,
    SystemClock, Ticker, TokenBucketLimiter, TokenService, TokenServiceConfig,
};

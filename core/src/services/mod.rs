//! Business services containing domain logic and use cases.

pub mod auth;
pub mod clock;
pub mod token;

// Re-export commonly used types
pub use auth::{AdmissionControl, AuthService, AuthServiceConfig, PasswordVerifier, TokenBucketLimiter};
pub use clock::{Clock, ManualClock, SystemClock};
pub use token::{
    extract_bearer_token, normalize_token, token_identity, CleanupConfig, CleanupHandle,
    CleanupResult, CleanupScheduler, IntervalTicker, Ticker, TokenService, TokenServiceConfig,
};

//! Token service module
//!
//! This module handles all token-related operations including:
//! - HMAC signing and compact claim encoding
//! - Issuance, validation and revocation of access and refresh tokens
//! - Background cleanup of expired revocation records

mod bearer;
mod cleanup;
mod codec;
mod config;
mod service;
mod signer;
mod ticker;

#[cfg(test)]
mod tests;

pub use bearer::{extract_bearer_token, normalize_token};
pub use cleanup::{CleanupConfig, CleanupHandle, CleanupResult, CleanupScheduler};
pub use codec::ClaimCodec;
pub use config::TokenServiceConfig;
pub use service::{token_identity, TokenService};
pub use signer::Signer;
pub use ticker::{manual_ticker, IntervalTicker, ManualTicker, ManualTrigger, Ticker};

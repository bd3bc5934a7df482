//! Value objects representing immutable domain concepts.

pub mod auth_response;
pub mod register_request;

// Re-export commonly used types
pub use auth_response::{AuthResponse, LogoutConfirmation, RefreshResponse, UserProfile};
pub use register_request::RegisterRequest;

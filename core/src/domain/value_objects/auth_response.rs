//! Authentication flow responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::{Role, User};

/// Public view of a user, safe to hand back to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub roles: BTreeSet<Role>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub last_active: Option<DateTime<Utc>>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            roles: user.roles.clone(),
            active: user.active,
            created_at: user.created_at,
            last_active: user.last_active,
        }
    }
}

/// Result of a successful register or login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    /// Bearer token for API authentication
    pub access_token: String,

    /// Token for obtaining new access tokens
    pub refresh_token: String,

    pub profile: UserProfile,
}

impl AuthResponse {
    pub fn new(tokens: TokenPair, user: &User) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            profile: UserProfile::from(user),
        }
    }
}

/// Result of a successful refresh
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshResponse {
    pub access_token: String,

    /// Same as the presented token unless rotation is enabled
    pub refresh_token: String,
}

/// Result of a successful logout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogoutConfirmation {
    pub message: String,
}

impl Default for LogoutConfirmation {
    fn default() -> Self {
        Self {
            message: "Logout successful".to_string(),
        }
    }
}

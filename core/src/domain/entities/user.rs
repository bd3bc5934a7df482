//! User entity and the closed set of roles a user can hold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Role granted to a user; reflected into every token issued for them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Administrator,
    Display,
    Editor,
    ContentManager,
    BasicUser,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Administrator,
        Role::Display,
        Role::Editor,
        Role::ContentManager,
        Role::BasicUser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::Display => "display",
            Role::Editor => "editor",
            Role::ContentManager => "content-manager",
            Role::BasicUser => "basic-user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown role: {}", s))
    }
}

/// User entity as held by the user directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    pub username: String,

    /// Login identifier and token subject
    pub email: String,

    /// Adaptive hash of the password, never the plaintext
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub roles: BTreeSet<Role>,

    /// Inactive accounts cannot log in or refresh
    pub active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Timestamp of the user's last successful login
    pub last_active: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new active user
    pub fn new(
        username: String,
        email: String,
        password_hash: String,
        roles: BTreeSet<Role>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            roles,
            active: true,
            created_at: now,
            updated_at: now,
            last_active: None,
        }
    }

    /// Stamp a successful login
    pub fn record_activity(&mut self, now: DateTime<Utc>) {
        self.last_active = Some(now);
        self.updated_at = now;
    }

    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.active = false;
        self.updated_at = now;
    }

    /// Replace the user's roles; outstanding tokens keep the old set
    pub fn set_roles(&mut self, roles: BTreeSet<Role>, now: DateTime<Utc>) {
        self.roles = roles;
        self.updated_at = now;
    }
}

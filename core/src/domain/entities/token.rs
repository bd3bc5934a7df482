//! Token entities: claim set, token class and revocation record.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::user::Role;

/// Claim names owned by the token format itself; never accepted as extras
pub const RESERVED_CLAIMS: [&str; 6] = ["sub", "iat", "exp", "jti", "token_type", "roles"];

/// Class of a bearer token. Each class is revoked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenClass {
    Access,
    Refresh,
}

impl TokenClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenClass::Access => "access",
            TokenClass::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TokenClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access" => Ok(TokenClass::Access),
            "refresh" => Ok(TokenClass::Refresh),
            other => Err(format!("unknown token class: {}", other)),
        }
    }
}

/// Scalar value of a free-form extra claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ClaimValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::Text(value.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::Text(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Integer(value)
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Bool(value)
    }
}

impl From<f64> for ClaimValue {
    fn from(value: f64) -> Self {
        ClaimValue::Float(value)
    }
}

/// Extra claims keyed by name
pub type ExtraClaims = BTreeMap<String, ClaimValue>;

/// Claims carried in the token payload
///
/// Timestamps are whole seconds since the Unix epoch, as in a standard JWT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the user's email)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// JWT ID, unique per issued token
    pub jti: String,

    /// Which class this token was minted for
    pub token_type: TokenClass,

    /// Roles at issuance time
    #[serde(default)]
    pub roles: BTreeSet<Role>,

    /// Free-form scalar claims
    #[serde(flatten)]
    pub extra: ExtraClaims,
}

impl Claims {
    pub fn issued_at(&self) -> DateTime<Utc> {
        seconds_to_instant(self.iat)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        seconds_to_instant(self.exp)
    }

    /// Expired once `now` reaches `exp`; the boundary instant itself is expired
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Structural invariants: non-empty subject, `exp > iat`, and extras
    /// that survive serialization unchanged
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.sub.trim().is_empty() {
            return Err("subject is empty".to_string());
        }
        if self.exp <= self.iat {
            return Err(format!("exp {} is not after iat {}", self.exp, self.iat));
        }
        for (name, value) in &self.extra {
            if RESERVED_CLAIMS.contains(&name.as_str()) {
                return Err(format!("extra claim '{}' is reserved", name));
            }
            if let ClaimValue::Float(f) = value {
                if !f.is_finite() {
                    return Err(format!("extra claim '{}' is not a finite number", name));
                }
            }
        }
        Ok(())
    }

    pub fn extra_str(&self, name: &str) -> Option<&str> {
        self.extra.get(name).and_then(ClaimValue::as_str)
    }
}

fn seconds_to_instant(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Persisted denylist entry. Created on revoke, never mutated, and removed
/// only by the cleanup sweep after `expires_at` has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationRecord {
    /// Lowercase hex SHA-256 of the normalized token string
    pub token_identity: String,

    pub token_class: TokenClass,

    pub subject: String,

    pub revoked_at: DateTime<Utc>,

    /// Copied from the token's own `exp` claim
    pub expires_at: DateTime<Utc>,
}

impl RevocationRecord {
    pub fn new(
        token_identity: String,
        token_class: TokenClass,
        subject: String,
        revoked_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token_identity,
            token_class,
            subject,
            revoked_at,
            expires_at,
        }
    }

    /// Short identity prefix safe to put in log lines
    pub fn identity_prefix(&self) -> &str {
        identity_prefix(&self.token_identity)
    }
}

/// First 12 characters of a token identity hash
pub fn identity_prefix(identity: &str) -> &str {
    identity.get(..12).unwrap_or(identity)
}

/// Access/refresh token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,

    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }
}

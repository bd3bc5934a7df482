//! Authenticated principal and the identity capability consumed by role checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::token::{Claims, ExtraClaims, TokenClass};
use super::user::{Role, User};

/// What role-consuming code needs to know about a caller
pub trait Identity {
    fn subject(&self) -> &str;

    fn roles(&self) -> &BTreeSet<Role>;

    fn has_role(&self, role: Role) -> bool {
        self.roles().contains(&role)
    }

    fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }
}

/// Caller resolved from a validated token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub subject: String,
    pub roles: BTreeSet<Role>,
    pub token_class: TokenClass,
    pub expires_at: DateTime<Utc>,
    pub extra: ExtraClaims,
}

impl Principal {
    pub fn username(&self) -> Option<&str> {
        self.extra.get("username").and_then(|v| v.as_str())
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        let expires_at = claims.expires_at();
        Self {
            subject: claims.sub,
            roles: claims.roles,
            token_class: claims.token_type,
            expires_at,
            extra: claims.extra,
        }
    }
}

impl Identity for Principal {
    fn subject(&self) -> &str {
        &self.subject
    }

    fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }
}

impl Identity for User {
    fn subject(&self) -> &str {
        &self.email
    }

    fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_claims() -> Claims {
        let mut extra = ExtraClaims::new();
        extra.insert("username".to_string(), "ed".into());
        Claims {
            sub: "ed@example.com".to_string(),
            iat: 1_000,
            exp: 1_900,
            jti: "j".to_string(),
            token_type: TokenClass::Access,
            roles: BTreeSet::from([Role::Editor, Role::BasicUser]),
            extra,
        }
    }

    #[test]
    fn test_principal_from_claims() {
        let principal = Principal::from(editor_claims());
        assert_eq!(principal.subject(), "ed@example.com");
        assert_eq!(principal.username(), Some("ed"));
        assert_eq!(principal.expires_at.timestamp(), 1_900);
        assert!(principal.has_role(Role::Editor));
        assert!(!principal.has_role(Role::Administrator));
        assert!(principal.has_any_role(&[Role::Administrator, Role::BasicUser]));
        assert!(!principal.has_any_role(&[]));
    }

    #[test]
    fn test_user_identity() {
        let user = User::new(
            "admin".to_string(),
            "admin@example.com".to_string(),
            String::new(),
            BTreeSet::from([Role::Administrator]),
            Utc::now(),
        );
        assert_eq!(Identity::subject(&user), "admin@example.com");
        assert!(user.has_role(Role::Administrator));
    }
}

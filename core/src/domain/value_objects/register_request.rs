//! Registration input

use ag_shared::validation::{validators, Validate, ValidationErrors};
use std::collections::BTreeSet;
use std::fmt;

use crate::domain::entities::user::Role;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;

/// New account details
#[derive(Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Roles granted at creation; `basic-user` unless stated otherwise
    pub roles: BTreeSet<Role>,
}

impl RegisterRequest {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            roles: BTreeSet::from([Role::BasicUser]),
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !validators::length_between(self.username.trim(), USERNAME_MIN_LEN, USERNAME_MAX_LEN) {
            errors.add_error(
                "username",
                format!(
                    "must be between {} and {} characters",
                    USERNAME_MIN_LEN, USERNAME_MAX_LEN
                ),
            );
        }
        if !validators::is_valid_email(&self.email) {
            errors.add_error("email", "is not a valid email address");
        }
        if !validators::not_empty(&self.password) {
            errors.add_error("password", "must not be empty");
        }
        if self.roles.is_empty() {
            errors.add_error("roles", "at least one role is required");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("roles", &self.roles)
            .finish()
    }
}

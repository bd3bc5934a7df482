//! User directory trait: the lookup and persistence surface the
//! authentication flow needs from wherever users are stored.

use async_trait::async_trait;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by email (the token subject)
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with this email
    /// * `Err(DomainError)` - Lookup failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError>;

    /// Insert a new user or update an existing one (matched by id)
    ///
    /// # Returns
    /// * `Ok(User)` - The stored user
    /// * `Err(DomainError::Auth(DuplicateEmail | DuplicateUsername))` - Another
    ///   user already holds the email or username
    async fn save(&self, user: User) -> Result<User, DomainError>;
}

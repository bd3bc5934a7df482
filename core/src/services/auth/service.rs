//! Main authentication service implementation

use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use ag_shared::validation::Validate;

use crate::domain::entities::token::{ExtraClaims, TokenClass, TokenPair};
use crate::domain::entities::user::User;
use crate::domain::value_objects::{
    AuthResponse, LogoutConfirmation, RefreshResponse, RegisterRequest,
};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{RevocationStore, UserDirectory};
use crate::services::token::{normalize_token, TokenService};

use super::admission::AdmissionControl;
use super::config::AuthServiceConfig;
use super::password::PasswordVerifier;

/// Register, login, refresh and logout on top of the token service
///
/// Owns no token state; every mint and revoke goes through [`TokenService`].
pub struct AuthService<U, P, R>
where
    U: UserDirectory,
    P: PasswordVerifier,
    R: RevocationStore,
{
    /// User directory for lookups and persistence
    users: Arc<U>,
    /// Password hashing and verification
    passwords: Arc<P>,
    /// Token service for minting and revoking tokens
    token_service: Arc<TokenService<R>>,
    /// Optional admission check ahead of register and login
    admission: Option<Arc<dyn AdmissionControl>>,
    /// Service configuration
    config: AuthServiceConfig,
    /// Hash checked against when the email is unknown, so both login
    /// failures cost one password comparison
    decoy_hash: OnceCell<String>,
}

impl<U, P, R> AuthService<U, P, R>
where
    U: UserDirectory,
    P: PasswordVerifier,
    R: RevocationStore,
{
    /// Create a new authentication service
    pub fn new(
        users: Arc<U>,
        passwords: Arc<P>,
        token_service: Arc<TokenService<R>>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            users,
            passwords,
            token_service,
            admission: None,
            config,
            decoy_hash: OnceCell::new(),
        }
    }

    /// Put an admission check in front of register and login
    pub fn with_admission(mut self, admission: Arc<dyn AdmissionControl>) -> Self {
        self.admission = Some(admission);
        self
    }

    pub fn token_service(&self) -> &Arc<TokenService<R>> {
        &self.token_service
    }

    /// Create an account and sign it in
    ///
    /// # Errors
    /// * `AuthError::RateLimitExceeded` - admission denied for this email
    /// * `DomainError::Validation` - username, email or password rejected
    /// * `AuthError::DuplicateEmail` / `AuthError::DuplicateUsername`
    pub async fn register(&self, request: RegisterRequest) -> DomainResult<AuthResponse> {
        self.admit(&request.email)?;

        request
            .validate()
            .map_err(|errors| DomainError::Validation {
                message: errors.summary(),
            })?;

        let username = request.username.trim().to_string();
        if self.users.exists_by_email(&request.email).await? {
            return Err(AuthError::DuplicateEmail {
                email: request.email,
            }
            .into());
        }
        if self.users.exists_by_username(&username).await? {
            return Err(AuthError::DuplicateUsername { username }.into());
        }

        let password_hash = self.passwords.hash(&request.password).await?;
        let user = User::new(
            username,
            request.email,
            password_hash,
            request.roles,
            self.token_service.clock().now(),
        );
        let user = self.users.save(user).await?;

        info!(user_id = %user.id, username = %user.username, "User registered");

        let tokens = self.issue_tokens(&user)?;
        Ok(AuthResponse::new(tokens, &user))
    }

    /// Exchange credentials for a token pair
    ///
    /// Unknown email and wrong password fail identically. A disabled account
    /// is only reported once the password has matched.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResponse> {
        self.admit(email)?;

        let Some(mut user) = self.users.find_by_email(email).await? else {
            self.match_decoy(password).await?;
            warn!("Login failed: invalid credentials");
            return Err(AuthError::InvalidCredentials.into());
        };

        if !self.passwords.matches(password, &user.password_hash).await? {
            warn!(user_id = %user.id, "Login failed: invalid credentials");
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.active {
            warn!(user_id = %user.id, "Login refused: account disabled");
            return Err(AuthError::AccountDisabled.into());
        }

        user.record_activity(self.token_service.clock().now());
        let user = self.users.save(user).await?;

        info!(user_id = %user.id, "User logged in");

        let tokens = self.issue_tokens(&user)?;
        Ok(AuthResponse::new(tokens, &user))
    }

    /// Mint a new access token from a refresh token
    ///
    /// The user is re-read so role changes reach the new access token. With
    /// rotation enabled the presented refresh token is revoked and replaced.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<RefreshResponse> {
        let claims = self
            .token_service
            .validate(refresh_token, TokenClass::Refresh)
            .await
            .map_err(|e| AuthError::InvalidRefreshToken {
                message: e.to_string(),
            })?;

        let user = match self.users.find_by_email(&claims.sub).await? {
            Some(user) if user.active => user,
            _ => {
                warn!(subject = %claims.sub, "Refresh refused: unknown or disabled account");
                return Err(AuthError::InvalidRefreshToken {
                    message: "account is unknown or disabled".to_string(),
                }
                .into());
            }
        };

        let refresh_token = if self.config.rotate_refresh_tokens {
            // Only the caller whose revoke stored the record may rotate
            let revoked_here = self
                .token_service
                .revoke(refresh_token, TokenClass::Refresh)
                .await?;
            if !revoked_here {
                warn!(subject = %claims.sub, "Refresh refused: token already rotated");
                return Err(AuthError::InvalidRefreshToken {
                    message: TokenError::Revoked.to_string(),
                }
                .into());
            }
            self.token_service.issue(
                &user.email,
                &user.roles,
                ExtraClaims::new(),
                TokenClass::Refresh,
            )?
        } else {
            normalize_token(refresh_token).to_string()
        };

        let access_token = self.token_service.issue(
            &user.email,
            &user.roles,
            access_claims(&user),
            TokenClass::Access,
        )?;

        info!(user_id = %user.id, rotated = self.config.rotate_refresh_tokens, "Tokens refreshed");

        Ok(RefreshResponse {
            access_token,
            refresh_token,
        })
    }

    /// Revoke both tokens of a session
    ///
    /// Both revocations are attempted even when the first fails; any failure
    /// is reported as `LogoutFailed` carrying the first cause.
    pub async fn logout(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> DomainResult<LogoutConfirmation> {
        let access_result = self.revoke_for_logout(access_token, TokenClass::Access).await;
        let refresh_result = self.revoke_for_logout(refresh_token, TokenClass::Refresh).await;

        let failure = match (access_result, refresh_result) {
            (Ok(()), Ok(())) => {
                info!("User logged out");
                return Ok(LogoutConfirmation::default());
            }
            (Err(access_err), Ok(())) => access_err,
            (Ok(()), Err(refresh_err)) => refresh_err,
            (Err(access_err), Err(refresh_err)) => {
                warn!(error = %refresh_err, "Refresh token revocation also failed during logout");
                access_err
            }
        };

        warn!(error = %failure, "Logout failed");
        Err(AuthError::LogoutFailed {
            source: Box::new(failure),
        }
        .into())
    }

    async fn revoke_for_logout(&self, token: &str, class: TokenClass) -> DomainResult<()> {
        if normalize_token(token).is_empty() {
            return Err(TokenError::malformed(format!("{} token is blank", class)).into());
        }
        self.token_service.revoke(token, class).await.map(|_| ())
    }

    async fn match_decoy(&self, password: &str) -> DomainResult<()> {
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| self.passwords.hash("decoy-password-for-unknown-accounts"))
            .await?;
        self.passwords.matches(password, decoy).await?;
        Ok(())
    }

    fn admit(&self, key: &str) -> DomainResult<()> {
        if let Some(admission) = &self.admission {
            if !admission.try_admit(key) {
                warn!("Request refused by admission control");
                return Err(AuthError::RateLimitExceeded.into());
            }
        }
        Ok(())
    }

    fn issue_tokens(&self, user: &User) -> DomainResult<TokenPair> {
        self.token_service
            .issue_pair(&user.email, &user.roles, access_claims(user))
    }
}

/// Extra claims carried by every access token
fn access_claims(user: &User) -> ExtraClaims {
    let mut extra = ExtraClaims::new();
    extra.insert("username".to_string(), user.username.clone().into());
    extra
}

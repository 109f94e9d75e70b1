use std::sync::Arc;

use chrono::Duration;

use super::{hash_password, verify_password, AuthError, Claims, TokenKeys, DUMMY_PASSWORD_HASH};
use crate::config::AuthConfig;
use crate::models::user::User;
use crate::repository::{StoreError, UserRepository};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Registration, login and token lifecycle on top of a user store.
///
/// Holds no per-request state; one instance is shared by all handlers.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    keys: TokenKeys,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, config: &AuthConfig) -> Self {
        Self {
            users,
            keys: TokenKeys::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        if self.users.exists_by_email(email).await? {
            return Err(AuthError::EmailExists);
        }

        let user = User::new(email, hash_password(password)?);

        // Lost a race with a concurrent registration.
        self.users.create(&user).await.map_err(|e| match e {
            StoreError::Duplicate => AuthError::EmailExists,
            other => AuthError::Store(other),
        })?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<(TokenPair, User), AuthError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            // Same Argon2 work as a wrong password.
            verify_password(password, DUMMY_PASSWORD_HASH);
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.issue_tokens(&user)?;
        tracing::debug!(user_id = %user.id, "User logged in");
        Ok((tokens, user))
    }

    /// Access and refresh tokens for a user who is already authenticated.
    pub fn issue_tokens(&self, user: &User) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.keys.issue(user.id, &user.email, self.access_ttl)?,
            refresh_token: self.keys.issue(user.id, &user.email, self.refresh_ttl)?,
        })
    }

    /// Exchange a valid refresh token for a new access token.
    ///
    /// The refresh token itself stays valid until it expires.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self.validate_token(refresh_token)?;
        let user = self.current_user(&claims).await?;

        self.keys.issue(user.id, &user.email, self.access_ttl)
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.keys.validate(token)
    }

    /// The user named by validated claims. A deleted user invalidates the token.
    pub async fn current_user(&self, claims: &Claims) -> Result<User, AuthError> {
        self.users
            .find_by_id(claims.user_id)
            .await?
            .ok_or(AuthError::InvalidToken)
    }
}

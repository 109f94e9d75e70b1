use thiserror::Error;

use crate::repository::StoreError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password must be at least {min} characters long", min = super::service::MIN_PASSWORD_LEN)]
    WeakPassword,

    #[error("email is already registered")]
    EmailExists,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("password hashing failed: {0}")]
    Hashing(#[from] argon2::password_hash::Error),

    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

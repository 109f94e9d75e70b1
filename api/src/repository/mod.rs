//! Persistence for user records.

pub mod user;

use thiserror::Error;

pub use user::{SqliteUserRepository, UserRepository};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("record already exists")]
    Duplicate,

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(inner: sqlx::Error) -> Self {
        if let Some(db_err) = inner.as_database_error() {
            if db_err.is_unique_violation() {
                return StoreError::Duplicate;
            }
        }
        StoreError::Database(inner)
    }
}

//! Credential and token handling.

pub mod errors;
pub mod password;
pub mod service;
pub mod token;

pub use errors::AuthError;
pub use password::{hash_password, verify_password, DUMMY_PASSWORD_HASH};
pub use service::{AuthService, TokenPair};
pub use token::{Claims, TokenKeys};

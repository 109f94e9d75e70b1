//! HS256 token issuance and validation.
//!
//! Access and refresh tokens have the same claim shape and differ only in the
//! lifetime they are issued with.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthError;

pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub email: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Not valid before (Unix seconds)
    pub nbf: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            user_id,
            email: email.into(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

/// Signing and verification keys derived from one shared secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `user_id` valid from now until `now + ttl`.
    pub fn issue(&self, user_id: Uuid, email: &str, ttl: Duration) -> Result<String, AuthError> {
        self.sign(&Claims::new(user_id, email, Utc::now(), ttl))
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(SIGNING_ALGORITHM), claims, &self.encoding).map_err(AuthError::Signing)
    }

    /// Verify signature, algorithm and time window, then return the claims.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AuthError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-must-be-at-least-32-chars-long!";

    fn keys() -> TokenKeys {
        TokenKeys::from_secret(SECRET)
    }

    #[test]
    fn issued_token_validates() {
        let keys = keys();
        let user_id = Uuid::new_v4();

        let token = keys.issue(user_id, "a@b.com", Duration::minutes(15)).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = keys.validate(&token).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.iat, claims.nbf);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = keys();
        let issued = Utc::now() - Duration::hours(2);
        let token = keys
            .sign(&Claims::new(Uuid::new_v4(), "a@b.com", issued, Duration::hours(1)))
            .unwrap();

        assert!(matches!(keys.validate(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn token_is_rejected_before_not_before() {
        let keys = keys();
        let issued = Utc::now() + Duration::hours(1);
        let token = keys
            .sign(&Claims::new(Uuid::new_v4(), "a@b.com", issued, Duration::hours(1)))
            .unwrap();

        assert!(matches!(keys.validate(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = TokenKeys::from_secret(b"another-secret-that-is-also-long-enough")
            .issue(Uuid::new_v4(), "a@b.com", Duration::minutes(5))
            .unwrap();

        assert!(matches!(keys().validate(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn other_algorithm_is_rejected() {
        let claims = Claims::new(Uuid::new_v4(), "a@b.com", Utc::now(), Duration::minutes(5));
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(keys().validate(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let keys = keys();
        let token = keys
            .issue(Uuid::new_v4(), "a@b.com", Duration::minutes(5))
            .unwrap();
        let other = keys
            .issue(Uuid::new_v4(), "evil@b.com", Duration::minutes(5))
            .unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert!(matches!(keys.validate(&forged), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(keys().validate("not.a.token"), Err(AuthError::InvalidToken)));
        assert!(matches!(keys().validate(""), Err(AuthError::InvalidToken)));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A fresh record with a new id, stamped with the current time.
    pub fn new(email: impl Into<String>, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Password strength is the auth service's rule; here it only has to be present.
/// Whitespace counts as content.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(email(message = "email is not a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(email(message = "email is not a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshPayload {
    #[validate(length(min = 1, message = "refreshToken is required"))]
    pub refresh_token: String,
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User::new("a@b.com", "$argon2id$secret".to_string());
        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("argon2id"));
        assert_eq!(json["email"], "a@b.com");
    }

    fn create(email: &str, password: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn ordinary_addresses_validate() {
        assert!(create("a@b.com", "password123").validate().is_ok());
        assert!(create("user+tag@example.co.uk", "password123").validate().is_ok());
    }

    #[test]
    fn malformed_addresses_fail_validation() {
        for bad in ["", "plain", "@b.com", "a b@c.com"] {
            assert!(create(bad, "password123").validate().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn blank_password_is_still_a_password() {
        assert!(create("a@b.com", "        ").validate().is_ok());
        assert!(create("a@b.com", "").validate().is_err());
    }

    #[test]
    fn empty_refresh_token_fails_validation() {
        let payload = RefreshPayload {
            refresh_token: String::new(),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn public_view_uses_camel_case() {
        let user = User::new("a@b.com", String::new());
        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();

        assert_eq!(json["id"], user.id.to_string());
        assert!(json.get("createdAt").is_some());
    }
}

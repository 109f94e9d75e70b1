use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use validator::ValidationErrors;

use crate::auth::AuthError;

pub const CODE_UNAUTHORIZED: &str = "ERR_AUTH_001";
pub const CODE_EMAIL_EXISTS: &str = "ERR_AUTH_002";
pub const CODE_WEAK_PASSWORD: &str = "ERR_AUTH_003";
pub const CODE_VALIDATION: &str = "ERR_VAL_001";
pub const CODE_INTERNAL: &str = "ERR_INTERNAL_001";

#[derive(Debug)]
pub enum AppError {
    Auth(AuthError),
    Validation(String),
    MissingToken(&'static str),
}

impl From<AuthError> for AppError {
    fn from(inner: AuthError) -> Self {
        AppError::Auth(inner)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, CODE_VALIDATION, msg.clone()),
            AppError::MissingToken(msg) => (StatusCode::UNAUTHORIZED, CODE_UNAUTHORIZED, msg.to_string()),
            AppError::Auth(err) => match err {
                AuthError::WeakPassword => (StatusCode::BAD_REQUEST, CODE_WEAK_PASSWORD, err.to_string()),
                AuthError::EmailExists => (StatusCode::CONFLICT, CODE_EMAIL_EXISTS, err.to_string()),
                AuthError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, CODE_UNAUTHORIZED, "Invalid email or password".to_string())
                }
                AuthError::InvalidToken => {
                    (StatusCode::UNAUTHORIZED, CODE_UNAUTHORIZED, "Invalid or expired token".to_string())
                }
                AuthError::Store(_) | AuthError::Hashing(_) | AuthError::Signing(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    CODE_INTERNAL,
                    "Internal server error".to_string(),
                ),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {} {}", code, message);
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

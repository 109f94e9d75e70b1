//! Bearer-token gate for protected routes.
//!
//! On success the validated [`Claims`] are stored in the request extensions,
//! so handlers can take them with `Extension<Claims>`.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{auth::Claims, error::AppError, AppState};

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims: Claims = {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                tracing::warn!("Missing Authorization header");
                AppError::MissingToken("Missing bearer token")
            })?;

        let token = bearer_token(header).ok_or_else(|| {
            tracing::warn!("Malformed Authorization header");
            AppError::MissingToken("Malformed Authorization header")
        })?;

        state.auth.validate_token(token)?
    };

    tracing::debug!(user_id = %claims.user_id, "Authenticated request");
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// `Bearer <token>`, exactly two space-separated parts.
fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::bearer_token;

    #[test]
    fn parses_bearer_header() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
    }

    #[test]
    fn rejects_other_shapes() {
        assert_eq!(bearer_token("abc.def.ghi"), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("bearer abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer a b"), None);
    }
}

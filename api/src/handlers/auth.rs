use axum::{extract::State, http::StatusCode, Extension, Json};

use super::ValidJson;
use crate::{
    auth::Claims,
    error::AppError,
    models::user::{
        AccessTokenResponse, AuthResponse, CreateUser, LoginPayload, MessageResponse,
        RefreshPayload, UserResponse,
    },
    AppState,
};

/// Create an account and log it in straight away.
pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateUser>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let user = state.auth.register(&payload.email, &payload.password).await?;
    let tokens = state.auth.issue_tokens(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            user: UserResponse::from(&user),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    let (tokens, user) = state.auth.login(&payload.email, &payload.password).await?;

    Ok(Json(AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        user: UserResponse::from(&user),
    }))
}

pub async fn refresh(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RefreshPayload>,
) -> Result<Json<AccessTokenResponse>, AppError> {
    let access_token = state.auth.refresh_token(&payload.refresh_token).await?;

    Ok(Json(AccessTokenResponse { access_token }))
}

/// Tokens are stateless; the client drops them.
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Logged out".to_string(),
    })
}

pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.auth.current_user(&claims).await?;
    Ok(Json(UserResponse::from(&user)))
}

//! Authentication routes: register, login, refresh, logout, profile.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::notification::Notification;
use crate::models::profile::{ProfileResponse, RegisterProfile};
use crate::services::auth as auth_service;
use crate::services::auth::TokenPair;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct Registered {
    pub profile: ProfileResponse,
    pub tokens: TokenPair,
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterProfile>,
) -> Result<Json<ApiResponse<Registered>>, AppError> {
    let (profile, tokens) =
        auth_service::register(state.store.as_ref(), &body, &state.config).await?;

    Ok(ApiResponse::notify(
        Registered {
            profile: ProfileResponse::from(profile),
            tokens,
        },
        Notification::success("Account created successfully!"),
    ))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<TokenPair>>, AppError> {
    let tokens = auth_service::login(
        state.store.as_ref(),
        &body.email,
        &body.password,
        &state.config,
    )
    .await?;

    Ok(ApiResponse::success(tokens))
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenPair>>, AppError> {
    let tokens =
        auth_service::refresh_token(state.store.as_ref(), &body.refresh_token, &state.config)
            .await?;

    Ok(ApiResponse::success(tokens))
}

/// POST /api/v1/auth/logout. Stateless JWT, the client discards its tokens.
pub async fn logout() -> Json<ApiResponse<&'static str>> {
    ApiResponse::success("Logged out successfully")
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<ProfileResponse>>, AppError> {
    let profile = auth_service::find_profile_by_id(state.store.as_ref(), current_user.id).await?;
    Ok(ApiResponse::success(ProfileResponse::from(profile)))
}

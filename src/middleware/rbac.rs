//! Role-based access control extractors. Roles are disjoint, so each
//! extractor admits exactly one role.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::profile::UserRole;
use crate::AppState;

async fn require(
    parts: &mut Parts,
    state: &AppState,
    role: UserRole,
    message: &str,
) -> Result<CurrentUser, AppError> {
    let user = CurrentUser::from_request_parts(parts, state).await?;
    if user.role != role {
        tracing::debug!(profile_id = %user.id, role = user.role.as_str(), "Role check failed");
        return Err(AppError::Forbidden(message.to_string()));
    }
    Ok(user)
}

/// Extractor that requires the donor role.
#[derive(Debug, Clone)]
pub struct RequireDonor(pub CurrentUser);

impl FromRequestParts<AppState> for RequireDonor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, UserRole::Donor, "Donor access required")
            .await
            .map(RequireDonor)
    }
}

/// Extractor that requires the NGO role.
#[derive(Debug, Clone)]
pub struct RequireNgo(pub CurrentUser);

impl FromRequestParts<AppState> for RequireNgo {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, UserRole::Ngo, "NGO access required")
            .await
            .map(RequireNgo)
    }
}

/// Extractor that requires the admin role.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, UserRole::Admin, "Admin access required")
            .await
            .map(RequireAdmin)
    }
}

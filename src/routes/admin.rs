//! Admin user overview.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::rbac::RequireAdmin;
use crate::services::reports::{self, AdminUsers};
use crate::AppState;

/// GET /api/v1/admin/users
pub async fn users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<AdminUsers>>, AppError> {
    let overview = reports::admin_users(state.store.as_ref()).await?;
    Ok(ApiResponse::success(overview))
}

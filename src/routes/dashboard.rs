//! Role dashboards.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::rbac::{RequireAdmin, RequireDonor, RequireNgo};
use crate::services::reports::{self, AdminDashboard, DonorDashboard, NgoDashboard};
use crate::AppState;

/// Optional calendar year narrowing monthly series. Absent means all years
/// share the twelve month buckets.
#[derive(Debug, Default, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

/// GET /api/v1/dashboard/donor
pub async fn donor(
    State(state): State<AppState>,
    RequireDonor(user): RequireDonor,
) -> Result<Json<ApiResponse<DonorDashboard>>, AppError> {
    let dashboard = reports::donor_dashboard(state.store.as_ref(), user.id).await?;
    Ok(ApiResponse::success(dashboard))
}

/// GET /api/v1/dashboard/ngo
pub async fn ngo(
    State(state): State<AppState>,
    RequireNgo(_ngo): RequireNgo,
) -> Result<Json<ApiResponse<NgoDashboard>>, AppError> {
    let dashboard = reports::ngo_dashboard(state.store.as_ref()).await?;
    Ok(ApiResponse::success(dashboard))
}

/// GET /api/v1/dashboard/admin?year=
pub async fn admin(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<YearQuery>,
) -> Result<Json<ApiResponse<AdminDashboard>>, AppError> {
    let dashboard = reports::admin_dashboard(state.store.as_ref(), query.year).await?;
    Ok(ApiResponse::success(dashboard))
}

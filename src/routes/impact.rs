//! Impact reports and the single-donation preview.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::{RequireAdmin, RequireDonor, RequireNgo};
use crate::routes::dashboard::YearQuery;
use crate::services::impact::{self, ImpactPreview};
use crate::services::reports::{self, ImpactReport};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub quantity: f64,
}

/// POST /api/v1/impact/preview
///
/// A negative quantity previews as zero impact rather than failing the form.
pub async fn preview(
    _user: CurrentUser,
    Json(body): Json<PreviewRequest>,
) -> Json<ApiResponse<ImpactPreview>> {
    ApiResponse::success(impact::preview(body.quantity))
}

/// GET /api/v1/impact/donor
pub async fn donor(
    State(state): State<AppState>,
    RequireDonor(user): RequireDonor,
) -> Result<Json<ApiResponse<ImpactReport>>, AppError> {
    let report = reports::donor_impact(state.store.as_ref(), user.id).await?;
    Ok(ApiResponse::success(report))
}

/// GET /api/v1/impact/ngo
pub async fn ngo(
    State(state): State<AppState>,
    RequireNgo(_ngo): RequireNgo,
) -> Result<Json<ApiResponse<ImpactReport>>, AppError> {
    let report = reports::ngo_impact(state.store.as_ref()).await?;
    Ok(ApiResponse::success(report))
}

/// GET /api/v1/impact/admin?year=
pub async fn admin(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<YearQuery>,
) -> Result<Json<ApiResponse<ImpactReport>>, AppError> {
    let report = reports::admin_impact(state.store.as_ref(), query.year).await?;
    Ok(ApiResponse::success(report))
}

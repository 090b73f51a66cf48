//! Donation routes: creation, role-scoped listings and acceptance.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::rbac::{RequireAdmin, RequireDonor, RequireNgo};
use crate::models::donation::{CreateDonation, Donation, DonationFilter, DonationStatus};
use crate::services::donation::{self as donation_service, DonationListing};
use crate::services::lifecycle::{self, TransitionResult};
use crate::AppState;

/// POST /api/v1/donations
pub async fn create(
    State(state): State<AppState>,
    RequireDonor(user): RequireDonor,
    Json(body): Json<CreateDonation>,
) -> Result<Json<ApiResponse<Donation>>, AppError> {
    let donation = donation_service::create(state.store.as_ref(), user.id, &body).await?;
    let notification = donation_service::created_notification(&donation);
    Ok(ApiResponse::notify(donation, notification))
}

/// GET /api/v1/donations/mine
pub async fn mine(
    State(state): State<AppState>,
    RequireDonor(user): RequireDonor,
) -> Result<Json<ApiResponse<DonationListing>>, AppError> {
    let listing =
        donation_service::listing(state.store.as_ref(), &DonationFilter::for_donor(user.id))
            .await?;
    Ok(ApiResponse::success(listing))
}

/// GET /api/v1/donations/available
pub async fn available(
    State(state): State<AppState>,
    RequireNgo(_ngo): RequireNgo,
) -> Result<Json<ApiResponse<DonationListing>>, AppError> {
    let filter = DonationFilter::with_status(DonationStatus::Available);
    let listing = donation_service::listing(state.store.as_ref(), &filter).await?;
    Ok(ApiResponse::success(listing))
}

/// GET /api/v1/donations/collected
pub async fn collected(
    State(state): State<AppState>,
    RequireNgo(_ngo): RequireNgo,
) -> Result<Json<ApiResponse<DonationListing>>, AppError> {
    let filter = DonationFilter::with_status(DonationStatus::Collected);
    let listing = donation_service::listing(state.store.as_ref(), &filter).await?;
    Ok(ApiResponse::success(listing))
}

/// POST /api/v1/donations/{id}/accept
pub async fn accept(
    State(state): State<AppState>,
    RequireNgo(ngo): RequireNgo,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TransitionResult>>, AppError> {
    let result = lifecycle::accept(state.store.as_ref(), id, &ngo.actor()).await?;
    let notification = result.notification();
    Ok(ApiResponse::notify(result, notification))
}

/// GET /api/v1/admin/donations
pub async fn all(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<DonationListing>>, AppError> {
    let listing = donation_service::listing(state.store.as_ref(), &DonationFilter::all()).await?;
    Ok(ApiResponse::success(listing))
}

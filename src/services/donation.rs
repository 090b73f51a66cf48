//! Donation service: creation and role-scoped retrieval.

use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::db::Datastore;
use crate::errors::AppError;
use crate::models::donation::{CreateDonation, Donation, DonationFilter, DonationSet, NewDonation};
use crate::models::notification::Notification;
use crate::services::aggregation::{self, StatusCounts};
use crate::services::impact::format_number;

/// A role-scoped list of donations with the counts shown beside it.
#[derive(Debug, Serialize)]
pub struct DonationListing {
    pub donations: Vec<Donation>,
    pub total_count: i64,
    pub total_quantity: f64,
    pub status_counts: StatusCounts,
    pub rejected_count: usize,
}

/// Create a donation owned by `donor_id`, snapshotting the donor's contact details.
pub async fn create(
    store: &dyn Datastore,
    donor_id: Uuid,
    input: &CreateDonation,
) -> Result<Donation, AppError> {
    input
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let donor = store
        .find_profile(donor_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Donor profile not found".to_string()))?;

    let row = store
        .insert_donation(NewDonation {
            donor_id,
            donor_name: donor.name,
            donor_phone: input.donor_phone.clone().or(donor.phone),
            food_type: input.food_type.trim().to_string(),
            quantity: input.quantity,
            pickup_time: input.pickup_time,
            pickup_address: input.pickup_address.trim().to_string(),
        })
        .await?;

    let donation = Donation::try_from(row)?;
    tracing::info!(
        donation_id = %donation.id,
        donor_id = %donor_id,
        quantity_kg = donation.quantity,
        "Donation created"
    );
    Ok(donation)
}

pub fn created_notification(donation: &Donation) -> Notification {
    Notification::success(format!(
        "Donation of {}kg {} added successfully!",
        format_number(donation.quantity),
        donation.food_type
    ))
}

/// Fetch and validate the donations inside `filter`, newest first.
pub async fn fetch(store: &dyn Datastore, filter: &DonationFilter) -> Result<DonationSet, AppError> {
    let rows = store.select_donations(filter).await?;
    let set = DonationSet::from_rows(rows);
    if set.rejected_count > 0 {
        tracing::warn!(
            rejected = set.rejected_count,
            filter = ?filter,
            "Donation rows excluded from aggregation"
        );
    }
    Ok(set)
}

/// Fetch donations inside `filter` together with their counts.
pub async fn listing(
    store: &dyn Datastore,
    filter: &DonationFilter,
) -> Result<DonationListing, AppError> {
    let set = fetch(store, filter).await?;
    Ok(DonationListing {
        total_count: set.donations.len() as i64,
        total_quantity: aggregation::total_quantity(&set.donations),
        status_counts: aggregation::status_counts(&set.donations),
        rejected_count: set.rejected_count,
        donations: set.donations,
    })
}

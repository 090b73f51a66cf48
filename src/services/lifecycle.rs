//! Donation status machine with RBAC-enforced transitions.
//!
//! A donation starts `available` and moves once to `collected`. The write is
//! conditional on the current status, so when several NGOs accept the same
//! donation concurrently exactly one of them succeeds.

use serde::Serialize;
use uuid::Uuid;

use crate::db::Datastore;
use crate::errors::AppError;
use crate::models::donation::{Donation, DonationStatus};
use crate::models::notification::Notification;
use crate::models::profile::UserRole;

/// Actor performing a transition.
#[derive(Debug, Clone)]
pub struct TransitionActor {
    pub id: Uuid,
    pub role: UserRole,
}

/// Result of a successful transition.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionResult {
    pub donation_id: Uuid,
    pub food_type: String,
    pub previous_status: DonationStatus,
    pub new_status: DonationStatus,
}

impl TransitionResult {
    pub fn notification(&self) -> Notification {
        Notification::success(format!(
            "Successfully accepted {} donation!",
            self.food_type
        ))
    }
}

/// Check whether a status transition is valid per the state machine graph.
pub fn is_valid_transition(from: &DonationStatus, to: &DonationStatus) -> bool {
    matches!(
        (from, to),
        (DonationStatus::Available, DonationStatus::Collected)
    )
}

/// Roles allowed to move a donation into a given target status.
pub fn required_roles(to: &DonationStatus) -> Vec<UserRole> {
    match to {
        DonationStatus::Collected => vec![UserRole::Ngo],
        // Initial state only; entered by insertion, never by transition.
        DonationStatus::Available => vec![],
    }
}

/// Check whether an actor's role is permitted for a transition.
pub fn has_required_role(actor_role: &UserRole, target_status: &DonationStatus) -> bool {
    required_roles(target_status).contains(actor_role)
}

/// Validate graph edge and role for a transition.
pub fn validate_transition(
    from: &DonationStatus,
    to: &DonationStatus,
    actor_role: &UserRole,
) -> Result<(), AppError> {
    if !is_valid_transition(from, to) {
        return Err(match (from, to) {
            (DonationStatus::Collected, DonationStatus::Collected) => {
                AppError::InvalidTransition("Donation has already been collected".to_string())
            }
            _ => AppError::InvalidTransition(format!("Cannot transition from {from:?} to {to:?}")),
        });
    }

    if !has_required_role(actor_role, to) {
        return Err(AppError::Forbidden(format!(
            "Role {actor_role:?} cannot transition to {to:?}"
        )));
    }

    Ok(())
}

/// Accept a donation for collection on behalf of an NGO.
///
/// Fails with `NotFound` for an unknown id and `InvalidTransition` when the
/// donation is no longer available, including when a concurrent acceptance
/// won the conditional update. Failures leave the record untouched.
pub async fn accept(
    store: &dyn Datastore,
    donation_id: Uuid,
    actor: &TransitionActor,
) -> Result<TransitionResult, AppError> {
    if !has_required_role(&actor.role, &DonationStatus::Collected) {
        return Err(AppError::Forbidden(
            "Only NGO accounts can accept donations".to_string(),
        ));
    }

    let current: Donation = store
        .find_donation(donation_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Donation not found".to_string()))?
        .try_into()?;

    validate_transition(&current.status, &DonationStatus::Collected, &actor.role)?;

    let affected = store.mark_collected(donation_id, actor.id).await?;
    if affected == 0 {
        if store.find_donation(donation_id).await?.is_none() {
            return Err(AppError::NotFound("Donation not found".to_string()));
        }
        tracing::warn!(
            donation_id = %donation_id,
            actor_id = %actor.id,
            "Donation collected by another actor before this acceptance applied"
        );
        return Err(AppError::InvalidTransition(
            "Donation has already been collected".to_string(),
        ));
    }

    tracing::info!(
        donation_id = %donation_id,
        actor_id = %actor.id,
        quantity_kg = current.quantity,
        "Donation accepted"
    );

    Ok(TransitionResult {
        donation_id,
        food_type: current.food_type,
        previous_status: current.status,
        new_status: DonationStatus::Collected,
    })
}

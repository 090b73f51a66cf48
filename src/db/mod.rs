//! Datastore query surface, connection pool and migration utilities.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::donation::{DonationFilter, DonationRow, NewDonation};
use crate::models::profile::{NewProfile, Profile};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Create a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Select/insert/update primitives the core relies on.
///
/// Donation reads return raw rows; validation happens in
/// [`crate::models::donation::DonationSet`], never inside a store.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Connectivity probe for readiness checks.
    async fn ping(&self) -> Result<(), AppError>;

    /// Insert a profile. Duplicate emails yield [`AppError::Conflict`].
    async fn insert_profile(&self, profile: NewProfile) -> Result<Profile, AppError>;

    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError>;

    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>, AppError>;

    /// All profiles, oldest first.
    async fn list_profiles(&self) -> Result<Vec<Profile>, AppError>;

    /// Insert a donation with status `available`; `created_at` is assigned here.
    async fn insert_donation(&self, donation: NewDonation) -> Result<DonationRow, AppError>;

    /// Rows inside `filter`, ordered by `created_at` descending.
    async fn select_donations(&self, filter: &DonationFilter) -> Result<Vec<DonationRow>, AppError>;

    async fn find_donation(&self, id: Uuid) -> Result<Option<DonationRow>, AppError>;

    /// Conditional `available -> collected` update. Returns the affected row count,
    /// which is zero when the record is missing or no longer available.
    async fn mark_collected(&self, id: Uuid, collector: Uuid) -> Result<u64, AppError>;
}

//! PostgreSQL-backed datastore.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::Datastore;
use crate::errors::AppError;
use crate::models::donation::{DonationFilter, DonationRow, NewDonation};
use crate::models::profile::{NewProfile, Profile};

const DONATION_COLUMNS: &str = "id, donor_id, donor_name, donor_phone, food_type, quantity, \
     pickup_time, pickup_address, status, collected_by, collected_at, created_at";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply embedded migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Migration failed: {e}")))
    }
}

#[async_trait]
impl Datastore for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_profile(&self, profile: NewProfile) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (name, email, password_hash, role, phone, address)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.password_hash)
        .bind(profile.role)
        .bind(&profile.phone)
        .bind(&profile.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Email already registered".to_string())
            }
            _ => AppError::DataAccess(e),
        })
    }

    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, AppError> {
        let profiles =
            sqlx::query_as::<_, Profile>("SELECT * FROM profiles ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(profiles)
    }

    async fn insert_donation(&self, donation: NewDonation) -> Result<DonationRow, AppError> {
        let row = sqlx::query_as::<_, DonationRow>(&format!(
            r#"
            INSERT INTO donations
                (donor_id, donor_name, donor_phone, food_type, quantity, pickup_time, pickup_address, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'available')
            RETURNING {DONATION_COLUMNS}
            "#
        ))
        .bind(donation.donor_id)
        .bind(&donation.donor_name)
        .bind(&donation.donor_phone)
        .bind(&donation.food_type)
        .bind(donation.quantity)
        .bind(donation.pickup_time)
        .bind(&donation.pickup_address)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn select_donations(&self, filter: &DonationFilter) -> Result<Vec<DonationRow>, AppError> {
        // NULL parameters disable their predicate.
        let rows = sqlx::query_as::<_, DonationRow>(&format!(
            r#"
            SELECT {DONATION_COLUMNS}
            FROM donations
            WHERE ($1::uuid IS NULL OR donor_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(filter.donor_id)
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_donation(&self, id: Uuid) -> Result<Option<DonationRow>, AppError> {
        let row = sqlx::query_as::<_, DonationRow>(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn mark_collected(&self, id: Uuid, collector: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE donations
            SET status = 'collected', collected_by = $2, collected_at = NOW()
            WHERE id = $1 AND status = 'available'
            "#,
        )
        .bind(id)
        .bind(collector)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

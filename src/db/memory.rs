//! In-process datastore used for local development and tests.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Datastore;
use crate::errors::AppError;
use crate::models::donation::{DonationFilter, DonationRow, DonationStatus, NewDonation};
use crate::models::profile::{NewProfile, Profile};

#[derive(Debug, Default)]
struct Tables {
    profiles: Vec<Profile>,
    donations: Vec<DonationRow>,
}

/// Datastore holding both tables behind one lock, so the conditional
/// status update is atomic with respect to concurrent writers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw row as-is, including rows that will fail validation.
    pub async fn insert_row(&self, row: DonationRow) {
        self.tables.write().await.donations.push(row);
    }
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn insert_profile(&self, profile: NewProfile) -> Result<Profile, AppError> {
        let mut tables = self.tables.write().await;
        if tables.profiles.iter().any(|p| p.email == profile.email) {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        let profile = Profile {
            id: Uuid::new_v4(),
            name: profile.name,
            email: profile.email,
            password_hash: profile.password_hash,
            role: profile.role,
            phone: profile.phone,
            address: profile.address,
            created_at: Utc::now(),
        };
        tables.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.iter().find(|p| p.email == email).cloned())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, AppError> {
        let mut profiles = self.tables.read().await.profiles.clone();
        profiles.sort_by_key(|p| p.created_at);
        Ok(profiles)
    }

    async fn insert_donation(&self, donation: NewDonation) -> Result<DonationRow, AppError> {
        let now = Utc::now();
        let row = DonationRow {
            id: Uuid::new_v4(),
            donor_id: donation.donor_id,
            donor_name: donation.donor_name,
            donor_phone: donation.donor_phone,
            food_type: donation.food_type,
            quantity: Some(donation.quantity),
            pickup_time: donation.pickup_time,
            pickup_address: donation.pickup_address,
            status: DonationStatus::Available.as_str().to_string(),
            collected_by: None,
            collected_at: None,
            created_at: now,
        };
        self.tables.write().await.donations.push(row.clone());
        Ok(row)
    }

    async fn select_donations(&self, filter: &DonationFilter) -> Result<Vec<DonationRow>, AppError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<DonationRow> = tables
            .donations
            .iter()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_donation(&self, id: Uuid) -> Result<Option<DonationRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.donations.iter().find(|row| row.id == id).cloned())
    }

    async fn mark_collected(&self, id: Uuid, collector: Uuid) -> Result<u64, AppError> {
        let mut tables = self.tables.write().await;
        let available = DonationStatus::Available.as_str();
        match tables
            .donations
            .iter_mut()
            .find(|row| row.id == id && row.status == available)
        {
            Some(row) => {
                row.status = DonationStatus::Collected.as_str().to_string();
                row.collected_by = Some(collector);
                row.collected_at = Some(Utc::now());
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::donation::fixtures::row;
    use crate::models::profile::UserRole;
    use chrono::{Duration, Utc};

    fn new_profile(email: &str, role: UserRole) -> NewProfile {
        NewProfile {
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role,
            phone: None,
            address: None,
        }
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store
            .insert_profile(new_profile("a@test.com", UserRole::Donor))
            .await
            .unwrap();
        let err = store
            .insert_profile(new_profile("a@test.com", UserRole::Ngo))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn select_orders_newest_first() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.insert_row(row(Some(1.0), "available", now - Duration::days(2))).await;
        store.insert_row(row(Some(2.0), "available", now)).await;
        store.insert_row(row(Some(3.0), "collected", now - Duration::days(1))).await;

        let rows = store.select_donations(&DonationFilter::all()).await.unwrap();
        let quantities: Vec<Option<f64>> = rows.iter().map(|r| r.quantity).collect();
        assert_eq!(quantities, vec![Some(2.0), Some(3.0), Some(1.0)]);
    }

    #[tokio::test]
    async fn mark_collected_only_applies_once() {
        let store = MemoryStore::new();
        let r = row(Some(5.0), "available", Utc::now());
        let id = r.id;
        store.insert_row(r).await;

        let collector = Uuid::new_v4();
        assert_eq!(store.mark_collected(id, collector).await.unwrap(), 1);
        assert_eq!(store.mark_collected(id, collector).await.unwrap(), 0);
        assert_eq!(store.mark_collected(Uuid::new_v4(), collector).await.unwrap(), 0);

        let stored = store.find_donation(id).await.unwrap().unwrap();
        assert_eq!(stored.status, "collected");
        assert_eq!(stored.collected_by, Some(collector));
        assert!(stored.collected_at.is_some());
    }
}

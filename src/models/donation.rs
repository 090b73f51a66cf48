//! Donation records and the validation boundary between raw datastore rows
//! and the typed records consumed by aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Available,
    Collected,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Collected => "collected",
        }
    }

    /// Exact match against the stored status label.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(Self::Available),
            "collected" => Some(Self::Collected),
            _ => None,
        }
    }
}

/// Donation row exactly as the datastore returns it, before validation.
#[derive(Debug, Clone, FromRow)]
pub struct DonationRow {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub donor_name: String,
    pub donor_phone: Option<String>,
    pub food_type: String,
    pub quantity: Option<f64>,
    pub pickup_time: DateTime<Utc>,
    pub pickup_address: String,
    pub status: String,
    pub collected_by: Option<Uuid>,
    pub collected_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Validated donation record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Donation {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub donor_name: String,
    pub donor_phone: Option<String>,
    pub food_type: String,
    /// Kilograms.
    pub quantity: f64,
    pub pickup_time: DateTime<Utc>,
    pub pickup_address: String,
    pub status: DonationStatus,
    pub collected_by: Option<Uuid>,
    pub collected_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DonationRow> for Donation {
    type Error = AppError;

    fn try_from(row: DonationRow) -> Result<Self, Self::Error> {
        let status = DonationStatus::parse(&row.status).ok_or_else(|| {
            AppError::Validation(format!(
                "Donation {} has unknown status '{}'",
                row.id, row.status
            ))
        })?;

        let quantity = match row.quantity {
            Some(q) if q.is_finite() && q >= 0.0 => q,
            other => {
                tracing::warn!(
                    donation_id = %row.id,
                    quantity = ?other,
                    "Malformed donation quantity, substituting zero"
                );
                0.0
            }
        };

        Ok(Self {
            id: row.id,
            donor_id: row.donor_id,
            donor_name: row.donor_name,
            donor_phone: row.donor_phone,
            food_type: row.food_type,
            quantity,
            pickup_time: row.pickup_time,
            pickup_address: row.pickup_address,
            status,
            collected_by: row.collected_by,
            collected_at: row.collected_at,
            created_at: row.created_at,
        })
    }
}

/// Validated donations plus the number of rows refused at the boundary.
#[derive(Debug, Clone, Default)]
pub struct DonationSet {
    pub donations: Vec<Donation>,
    pub rejected_count: usize,
}

impl DonationSet {
    /// Convert raw rows, keeping their order. Rejected rows are logged and counted.
    pub fn from_rows(rows: Vec<DonationRow>) -> Self {
        let mut set = Self {
            donations: Vec::with_capacity(rows.len()),
            rejected_count: 0,
        };
        for row in rows {
            match Donation::try_from(row) {
                Ok(donation) => set.donations.push(donation),
                Err(e) => {
                    tracing::warn!(error = %e, "Rejected donation row");
                    set.rejected_count += 1;
                }
            }
        }
        set
    }
}

/// Role-derived scope applied by the datastore. Results are always newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonationFilter {
    pub donor_id: Option<Uuid>,
    pub status: Option<DonationStatus>,
}

impl DonationFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_donor(donor_id: Uuid) -> Self {
        Self {
            donor_id: Some(donor_id),
            status: None,
        }
    }

    pub fn with_status(status: DonationStatus) -> Self {
        Self {
            donor_id: None,
            status: Some(status),
        }
    }

    /// Whether a raw row falls inside this scope.
    pub fn matches(&self, row: &DonationRow) -> bool {
        self.donor_id.map_or(true, |id| row.donor_id == id)
            && self.status.map_or(true, |s| row.status == s.as_str())
    }
}

/// Donor request body for a new donation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDonation {
    #[validate(length(min = 1, max = 100, message = "Food type must be 1-100 characters"))]
    pub food_type: String,
    #[validate(range(exclusive_min = 0.0, message = "Quantity must be greater than zero"))]
    pub quantity: f64,
    pub pickup_time: DateTime<Utc>,
    #[validate(length(min = 1, max = 256, message = "Pickup address must be 1-256 characters"))]
    pub pickup_address: String,
    #[validate(length(min = 1, max = 32, message = "Phone must be 1-32 characters"))]
    pub donor_phone: Option<String>,
}

/// Fields handed to the datastore; status always starts as available.
#[derive(Debug, Clone)]
pub struct NewDonation {
    pub donor_id: Uuid,
    pub donor_name: String,
    pub donor_phone: Option<String>,
    pub food_type: String,
    pub quantity: f64,
    pub pickup_time: DateTime<Utc>,
    pub pickup_address: String,
}


#[cfg(test)]
mod tests {
    use super::fixtures::row;
    use super::*;

    #[test]
    fn status_parse_is_exact() {
        assert_eq!(DonationStatus::parse("available"), Some(DonationStatus::Available));
        assert_eq!(DonationStatus::parse("collected"), Some(DonationStatus::Collected));
        assert_eq!(DonationStatus::parse("Collected"), None);
        assert_eq!(DonationStatus::parse("expired"), None);
    }

    #[test]
    fn unknown_status_row_rejected() {
        let err = Donation::try_from(row(Some(5.0), "expired", Utc::now())).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn missing_or_negative_quantity_becomes_zero() {
        let missing = Donation::try_from(row(None, "available", Utc::now())).unwrap();
        assert_eq!(missing.quantity, 0.0);

        let negative = Donation::try_from(row(Some(-4.0), "available", Utc::now())).unwrap();
        assert_eq!(negative.quantity, 0.0);

        let nan = Donation::try_from(row(Some(f64::NAN), "collected", Utc::now())).unwrap();
        assert_eq!(nan.quantity, 0.0);
    }

    #[test]
    fn donation_set_counts_rejections_and_keeps_order() {
        let now = Utc::now();
        let rows = vec![
            row(Some(1.0), "available", now),
            row(Some(2.0), "pending", now),
            row(Some(3.0), "collected", now),
        ];
        let set = DonationSet::from_rows(rows);
        assert_eq!(set.rejected_count, 1);
        let quantities: Vec<f64> = set.donations.iter().map(|d| d.quantity).collect();
        assert_eq!(quantities, vec![1.0, 3.0]);
    }

    #[test]
    fn filter_matches_scope() {
        let r = row(Some(1.0), "available", Utc::now());
        assert!(DonationFilter::all().matches(&r));
        assert!(DonationFilter::for_donor(r.donor_id).matches(&r));
        assert!(!DonationFilter::for_donor(Uuid::new_v4()).matches(&r));
        assert!(DonationFilter::with_status(DonationStatus::Available).matches(&r));
        assert!(!DonationFilter::with_status(DonationStatus::Collected).matches(&r));
    }

    #[test]
    fn create_donation_rejects_zero_quantity() {
        let body = CreateDonation {
            food_type: "Bread".to_string(),
            quantity: 0.0,
            pickup_time: Utc::now(),
            pickup_address: "1 Baker St".to_string(),
            donor_phone: None,
        };
        let errors = body.validate().unwrap_err().to_string();
        assert!(errors.contains("Quantity must be greater than zero"));
    }
}

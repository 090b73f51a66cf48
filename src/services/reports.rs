//! Role dashboards and impact reports.
//!
//! Each report is one role-scoped fetch followed by the shared aggregator.

use serde::Serialize;
use uuid::Uuid;

use crate::db::Datastore;
use crate::errors::AppError;
use crate::models::donation::{Donation, DonationFilter, DonationStatus};
use crate::models::profile::{ProfileResponse, UserRole};
use crate::services::aggregation::{self, DonationSummary, MonthlyPoint, SeriesMetric, StatusCounts};
use crate::services::donation as donation_service;
use crate::services::impact::{self, format_number};

/// Number of records shown in "recent" panels.
pub const RECENT_LIMIT: usize = 3;

#[derive(Debug, Serialize)]
pub struct DonorDashboard {
    pub summary: DonationSummary,
    pub recent: Vec<Donation>,
}

#[derive(Debug, Serialize)]
pub struct NgoDashboard {
    pub total_food_collected: f64,
    pub co2_reduced: f64,
    pub methane_reduced: f64,
    pub available_count: i64,
    pub collected_count: i64,
    pub recent_available: Vec<Donation>,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub total_donors: i64,
    pub total_ngos: i64,
    pub total_donations: i64,
    pub total_food_saved: f64,
    pub status_counts: StatusCounts,
    pub monthly_donations: Vec<MonthlyPoint>,
    pub monthly_food_saved: Vec<MonthlyPoint>,
}

#[derive(Debug, Serialize)]
pub struct ImpactReport {
    pub headline: String,
    pub total_donations: i64,
    pub total_food_kg: f64,
    pub co2_reduced: f64,
    pub methane_reduced: f64,
    pub estimated_meals: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trees_equivalent: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub people_served: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_co2: Option<Vec<MonthlyPoint>>,
}

impl ImpactReport {
    fn from_summary(headline: String, summary: &DonationSummary) -> Self {
        Self {
            headline,
            total_donations: summary.total_count,
            total_food_kg: summary.total_quantity,
            co2_reduced: summary.co2_reduced,
            methane_reduced: summary.methane_reduced,
            estimated_meals: summary.estimated_meals,
            trees_equivalent: None,
            people_served: None,
            monthly_co2: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserOverview {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    pub donation_count: i64,
}

#[derive(Debug, Serialize)]
pub struct AdminUsers {
    pub users: Vec<UserOverview>,
    pub total_users: i64,
    pub donor_count: i64,
    pub ngo_count: i64,
}

/// Totals and most recent donations for one donor.
pub async fn donor_dashboard(
    store: &dyn Datastore,
    donor_id: Uuid,
) -> Result<DonorDashboard, AppError> {
    let set = donation_service::fetch(store, &DonationFilter::for_donor(donor_id)).await?;
    Ok(DonorDashboard {
        summary: aggregation::summarize(&set.donations),
        recent: aggregation::recent(&set.donations, RECENT_LIMIT).to_vec(),
    })
}

/// Collected totals and the newest available donations across all donors.
pub async fn ngo_dashboard(store: &dyn Datastore) -> Result<NgoDashboard, AppError> {
    let set = donation_service::fetch(store, &DonationFilter::all()).await?;
    let (available, collected): (Vec<Donation>, Vec<Donation>) = set
        .donations
        .into_iter()
        .partition(|d| d.status == DonationStatus::Available);

    let collected_summary = aggregation::summarize(&collected);

    Ok(NgoDashboard {
        total_food_collected: collected_summary.total_quantity,
        co2_reduced: collected_summary.co2_reduced,
        methane_reduced: collected_summary.methane_reduced,
        available_count: available.len() as i64,
        collected_count: collected.len() as i64,
        recent_available: aggregation::recent(&available, RECENT_LIMIT).to_vec(),
    })
}

/// Platform-wide overview. `year` narrows the monthly series only.
pub async fn admin_dashboard(
    store: &dyn Datastore,
    year: Option<i32>,
) -> Result<AdminDashboard, AppError> {
    let filter = DonationFilter::all();
    let (set, profiles) = tokio::try_join!(
        donation_service::fetch(store, &filter),
        store.list_profiles(),
    )?;

    let summary = aggregation::summarize(&set.donations);
    let total_ngos = profiles.iter().filter(|p| p.role == UserRole::Ngo).count() as i64;

    Ok(AdminDashboard {
        total_donors: summary.unique_donor_count,
        total_ngos,
        total_donations: summary.total_count,
        total_food_saved: summary.total_quantity,
        status_counts: summary.status_counts,
        monthly_donations: aggregation::monthly_series(&set.donations, SeriesMetric::Count, year),
        monthly_food_saved: aggregation::monthly_series(
            &set.donations,
            SeriesMetric::Quantity,
            year,
        ),
    })
}

pub async fn donor_impact(store: &dyn Datastore, donor_id: Uuid) -> Result<ImpactReport, AppError> {
    let set = donation_service::fetch(store, &DonationFilter::for_donor(donor_id)).await?;
    let summary = aggregation::summarize(&set.donations);

    let headline = format!(
        "Through your {} donations totaling {} kg of food, you've made a meaningful environmental contribution.",
        summary.total_count,
        format_number(summary.total_quantity)
    );
    Ok(ImpactReport {
        trees_equivalent: Some(impact::trees_equivalent(summary.co2_reduced)),
        ..ImpactReport::from_summary(headline, &summary)
    })
}

/// Impact of every collected donation.
pub async fn ngo_impact(store: &dyn Datastore) -> Result<ImpactReport, AppError> {
    let set = donation_service::fetch(
        store,
        &DonationFilter::with_status(DonationStatus::Collected),
    )
    .await?;
    let summary = aggregation::summarize(&set.donations);

    let headline = format!(
        "Your organization has collected {} kg of food, helping feed families while protecting the environment.",
        format_number(summary.total_quantity)
    );
    Ok(ImpactReport {
        people_served: Some(impact::people_served(summary.estimated_meals)),
        ..ImpactReport::from_summary(headline, &summary)
    })
}

/// Global impact with a monthly CO₂ series.
pub async fn admin_impact(store: &dyn Datastore, year: Option<i32>) -> Result<ImpactReport, AppError> {
    let set = donation_service::fetch(store, &DonationFilter::all()).await?;
    let summary = aggregation::summarize(&set.donations);

    let headline = format!(
        "Together, our community has saved {} kg of food, preventing significant greenhouse gas emissions.",
        format_number(summary.total_quantity)
    );
    Ok(ImpactReport {
        monthly_co2: Some(aggregation::monthly_series(
            &set.donations,
            SeriesMetric::Co2,
            year,
        )),
        ..ImpactReport::from_summary(headline, &summary)
    })
}

/// Every profile with its donation count.
pub async fn admin_users(store: &dyn Datastore) -> Result<AdminUsers, AppError> {
    let filter = DonationFilter::all();
    let (profiles, set) = tokio::try_join!(
        store.list_profiles(),
        donation_service::fetch(store, &filter),
    )?;

    let count_role = |role: UserRole| profiles.iter().filter(|p| p.role == role).count() as i64;
    let total_users = profiles.len() as i64;
    let donor_count = count_role(UserRole::Donor);
    let ngo_count = count_role(UserRole::Ngo);

    let users = profiles
        .into_iter()
        .map(|p| {
            let donation_count =
                set.donations.iter().filter(|d| d.donor_id == p.id).count() as i64;
            UserOverview {
                profile: ProfileResponse::from(p),
                donation_count,
            }
        })
        .collect();

    Ok(AdminUsers {
        users,
        total_users,
        donor_count,
        ngo_count,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::db::MemoryStore;
    use crate::models::donation::fixtures::row;
    use crate::models::profile::NewProfile;

    async fn profile(store: &MemoryStore, role: UserRole) -> Uuid {
        store
            .insert_profile(NewProfile {
                name: format!("{role:?}"),
                email: format!("{}@test.com", Uuid::new_v4()),
                password_hash: "hash".to_string(),
                role,
                phone: None,
                address: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn add(store: &MemoryStore, donor: Uuid, quantity: f64, status: &str, month: u32) {
        let created = Utc.with_ymd_and_hms(2024, month, 10, 9, 0, 0).unwrap();
        let mut r = row(Some(quantity), status, created);
        r.donor_id = donor;
        store.insert_row(r).await;
    }

    async fn seeded() -> (MemoryStore, Uuid, Uuid) {
        let store = MemoryStore::new();
        let alice = profile(&store, UserRole::Donor).await;
        let bob = profile(&store, UserRole::Donor).await;
        profile(&store, UserRole::Ngo).await;
        profile(&store, UserRole::Ngo).await;
        profile(&store, UserRole::Admin).await;

        add(&store, alice, 25.0, "available", 1).await;
        add(&store, alice, 15.0, "collected", 2).await;
        add(&store, alice, 10.0, "available", 3).await;
        add(&store, alice, 8.0, "available", 4).await;
        add(&store, bob, 20.0, "collected", 2).await;
        (store, alice, bob)
    }

    #[tokio::test]
    async fn donor_dashboard_scoped_to_owner() {
        let (store, alice, _) = seeded().await;
        let dashboard = donor_dashboard(&store, alice).await.unwrap();
        assert_eq!(dashboard.summary.total_count, 4);
        assert_eq!(dashboard.summary.total_quantity, 58.0);
        assert_eq!(dashboard.summary.co2_reduced, 145.0);
        assert_eq!(dashboard.summary.methane_reduced, 29.0);
        assert_eq!(dashboard.recent.len(), RECENT_LIMIT);
        // newest first: April, March, February
        assert_eq!(dashboard.recent[0].quantity, 8.0);
    }

    #[tokio::test]
    async fn ngo_dashboard_totals_collected_only() {
        let (store, _, _) = seeded().await;
        let dashboard = ngo_dashboard(&store).await.unwrap();
        assert_eq!(dashboard.total_food_collected, 35.0);
        assert_eq!(dashboard.co2_reduced, 87.5);
        assert_eq!(dashboard.methane_reduced, 17.5);
        assert_eq!(dashboard.available_count, 3);
        assert_eq!(dashboard.collected_count, 2);
        assert!(dashboard
            .recent_available
            .iter()
            .all(|d| d.status == DonationStatus::Available));
    }

    #[tokio::test]
    async fn admin_dashboard_counts_real_ngos() {
        let (store, _, _) = seeded().await;
        let dashboard = admin_dashboard(&store, None).await.unwrap();
        assert_eq!(dashboard.total_donors, 2);
        assert_eq!(dashboard.total_ngos, 2);
        assert_eq!(dashboard.total_donations, 5);
        assert_eq!(dashboard.total_food_saved, 78.0);
        assert_eq!(dashboard.status_counts.available, 3);
        assert_eq!(dashboard.status_counts.collected, 2);
        assert_eq!(dashboard.monthly_donations[1].value, 2.0);
        assert_eq!(dashboard.monthly_food_saved[0].value, 25.0);
        assert_eq!(dashboard.monthly_food_saved[1].value, 35.0);

        let other_year = admin_dashboard(&store, Some(2023)).await.unwrap();
        assert!(other_year.monthly_donations.iter().all(|p| p.value == 0.0));
    }

    #[tokio::test]
    async fn impact_reports_per_role() {
        let (store, alice, _) = seeded().await;

        let donor = donor_impact(&store, alice).await.unwrap();
        assert_eq!(donor.estimated_meals, 174);
        assert_eq!(donor.trees_equivalent, Some(7));
        assert!(donor.headline.contains("4 donations totaling 58 kg"));

        let ngo = ngo_impact(&store).await.unwrap();
        assert_eq!(ngo.total_food_kg, 35.0);
        assert_eq!(ngo.estimated_meals, 105);
        assert_eq!(ngo.people_served, Some(35));

        let admin = admin_impact(&store, Some(2024)).await.unwrap();
        let series = admin.monthly_co2.unwrap();
        assert_eq!(series[1].month, "Feb");
        assert_eq!(series[1].value, 87.5);
        assert_eq!(admin.co2_reduced, 195.0);
    }

    #[tokio::test]
    async fn admin_users_counts_donations_per_profile() {
        let (store, alice, bob) = seeded().await;
        let overview = admin_users(&store).await.unwrap();
        assert_eq!(overview.total_users, 5);
        assert_eq!(overview.donor_count, 2);
        assert_eq!(overview.ngo_count, 2);

        let count_for = |id: Uuid| {
            overview
                .users
                .iter()
                .find(|u| u.profile.id == id)
                .map(|u| u.donation_count)
        };
        assert_eq!(count_for(alice), Some(4));
        assert_eq!(count_for(bob), Some(1));
    }
}

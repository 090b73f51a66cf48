//! Seed script for development. Populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` and `JWT_SECRET` environment variables (reads .env).

use chrono::{Duration, Utc};
use foodshare::config::AppConfig;
use foodshare::db::{self, Datastore, PgStore};
use foodshare::models::donation::CreateDonation;
use foodshare::models::profile::{Profile, RegisterProfile, UserRole};
use foodshare::services::{auth, donation, lifecycle};

const SEED_PASSWORD: &str = "Test123!";

/// (food type, kg, days ago, collected)
const SAMPLE_DONATIONS: &[(&str, f64, i64, bool)] = &[
    ("Fresh Vegetables", 25.0, 3, false),
    ("Bread & Bakery", 12.5, 10, true),
    ("Dairy Products", 8.0, 40, false),
    ("Cooked Meals", 30.0, 75, true),
    ("Fruits", 18.0, 120, true),
    ("Canned Goods", 45.0, 200, false),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let db_url = config
        .database_url
        .clone()
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let pool = db::create_pool(&db_url, 5).await?;
    let store = PgStore::new(pool);

    store.migrate().await?;

    println!("=== FoodShare Seed Script ===");

    let donor = seed_profile(
        &store,
        &config,
        "Green Grocery",
        "donor@foodshare.local",
        UserRole::Donor,
    )
    .await?;
    let ngo = seed_profile(
        &store,
        &config,
        "City Food Bank",
        "ngo@foodshare.local",
        UserRole::Ngo,
    )
    .await?;
    seed_profile(
        &store,
        &config,
        "Platform Admin",
        "admin@foodshare.local",
        UserRole::Admin,
    )
    .await?;

    seed_donations(&store, &donor, &ngo).await?;

    println!("\n=== Seed complete! ===");
    println!("Logins (password {SEED_PASSWORD}): donor@, ngo@, admin@foodshare.local");

    Ok(())
}

async fn seed_profile(
    store: &PgStore,
    config: &AppConfig,
    name: &str,
    email: &str,
    role: UserRole,
) -> anyhow::Result<Profile> {
    if let Some(existing) = store.find_profile_by_email(email).await? {
        println!("[skip] {email} already exists");
        return Ok(existing);
    }

    let (profile, _) = auth::register(
        store,
        &RegisterProfile {
            name: name.to_string(),
            email: email.to_string(),
            password: SEED_PASSWORD.to_string(),
            role,
            phone: Some("555-0100".to_string()),
            address: Some("12 Market Street".to_string()),
        },
        config,
    )
    .await?;

    println!("[done] Created {} profile {email}", role.as_str());
    Ok(profile)
}

async fn seed_donations(store: &PgStore, donor: &Profile, ngo: &Profile) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM donations WHERE donor_id = $1")
        .bind(donor.id)
        .fetch_one(store.pool())
        .await?;
    if count > 0 {
        println!("[skip] Donations already seeded ({count} rows)");
        return Ok(());
    }

    let actor = lifecycle::TransitionActor {
        id: ngo.id,
        role: ngo.role,
    };
    let now = Utc::now();

    for &(food_type, quantity, days_ago, collected) in SAMPLE_DONATIONS {
        let created_at = now - Duration::days(days_ago);
        let created = donation::create(
            store,
            donor.id,
            &CreateDonation {
                food_type: food_type.to_string(),
                quantity,
                pickup_time: created_at + Duration::hours(4),
                pickup_address: "12 Market Street".to_string(),
                donor_phone: None,
            },
        )
        .await?;

        // Spread records across months so the monthly series has shape.
        sqlx::query("UPDATE donations SET created_at = $2 WHERE id = $1")
            .bind(created.id)
            .bind(created_at)
            .execute(store.pool())
            .await?;

        if collected {
            lifecycle::accept(store, created.id, &actor).await?;
        }
    }

    println!("[done] Created {} donations", SAMPLE_DONATIONS.len());
    Ok(())
}

use std::net::SocketAddr;
use std::sync::Arc;

use foodshare::config::AppConfig;
use foodshare::db::{self, Datastore, MemoryStore, PgStore};
use foodshare::{routes, AppState};
use mimalloc::MiMalloc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foodshare=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration (JWT_SECRET): {e}"))?;

    let store: Arc<dyn Datastore> = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url, config.database_max_connections).await?;
            let store = PgStore::new(pool);
            store.migrate().await?;
            tracing::info!("Connected to PostgreSQL, migrations applied");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory datastore; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tracing::info!(host = %addr, "Starting FoodShare API server");

    let app = routes::router(AppState::new(store, config));

    axum::serve(listener, app).await?;

    Ok(())
}

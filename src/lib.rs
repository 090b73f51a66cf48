pub mod config;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use db::Datastore;

/// Shared application state passed to all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Datastore>,
    pub config: config::AppConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn Datastore>, config: config::AppConfig) -> Self {
        Self { store, config }
    }
}

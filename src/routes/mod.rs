//! Route definitions for the FoodShare API.

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod donations;
pub mod health;
pub mod impact;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// JSON bodies on this API are small.
const MAX_BODY_BYTES: usize = 64 * 1024;

fn cors(frontend_url: &str) -> CorsLayer {
    let origin = match frontend_url.parse::<HeaderValue>() {
        Ok(value) => AllowOrigin::exact(value),
        Err(e) => {
            tracing::warn!(frontend_url, error = %e, "Invalid FRONTEND_URL, allowing any origin");
            AllowOrigin::any()
        }
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me));

    let donation_routes = Router::new()
        .route("/donations", post(donations::create))
        .route("/donations/mine", get(donations::mine))
        .route("/donations/available", get(donations::available))
        .route("/donations/collected", get(donations::collected))
        .route("/donations/{id}/accept", post(donations::accept));

    let report_routes = Router::new()
        .route("/dashboard/donor", get(dashboard::donor))
        .route("/dashboard/ngo", get(dashboard::ngo))
        .route("/dashboard/admin", get(dashboard::admin))
        .route("/impact/preview", post(impact::preview))
        .route("/impact/donor", get(impact::donor))
        .route("/impact/ngo", get(impact::ngo))
        .route("/impact/admin", get(impact::admin));

    let admin_routes = Router::new()
        .route("/admin/users", get(admin::users))
        .route("/admin/donations", get(donations::all));

    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors(&state.config.frontend_url));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest(
            "/api/v1",
            auth_routes
                .merge(donation_routes)
                .merge(report_routes)
                .merge(admin_routes),
        )
        .layer(layers)
        .with_state(state)
}

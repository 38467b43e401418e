//! HTTP API for subtally
//!
//! Thin routing layer over [`subtally_core`]: CRUD endpoints for
//! subscription records plus the analytics report endpoint. All domain
//! logic lives in the core crate; handlers translate store results into
//! status codes and JSON.

use std::sync::Arc;

use axum::routing::{get, patch};
use axum::Router;
use subtally_core::Database;

pub mod routes;

/// Shared state for all handlers.
pub struct AppState {
    /// Record store. Reads are snapshot reads; the analytics endpoint
    /// performs exactly one per request.
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Arc<Self> {
        Arc::new(Self { db })
    }
}

/// Build the API router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route(
            "/api/subscriptions",
            get(routes::subscriptions::list).post(routes::subscriptions::create),
        )
        .route(
            "/api/subscriptions/:id",
            get(routes::subscriptions::fetch)
                .put(routes::subscriptions::update)
                .delete(routes::subscriptions::remove),
        )
        .route(
            "/api/subscriptions/:id/status",
            patch(routes::subscriptions::set_status),
        )
        .route("/api/analytics/summary", get(routes::analytics::summary))
        .with_state(state)
}

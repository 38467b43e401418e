//! Analytics report handler

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use subtally_core::analytics;

use super::store_error;
use crate::AppState;

/// GET /api/analytics/summary
///
/// One snapshot read, then a full recomputation of the report. No caching:
/// staleness is bounded only by the read itself.
pub async fn summary(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = match state.db.list_subscriptions() {
        Ok(records) => records,
        Err(e) => return store_error(e),
    };

    Json(analytics::build_report(&snapshot)).into_response()
}

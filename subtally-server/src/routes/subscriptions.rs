//! CRUD handlers for subscription records

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use subtally_core::types::{NewSubscription, SubscriptionPatch, SubscriptionStatus};

use super::{not_found, store_error, unprocessable};
use crate::AppState;

/// Status-only update payload.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: SubscriptionStatus,
}

/// Reject payloads that violate the record invariants.
fn validate(name: Option<&str>, price: Option<f64>) -> Result<(), Response> {
    if let Some(name) = name {
        if name.is_empty() {
            return Err(unprocessable("name must be non-empty"));
        }
    }
    if let Some(price) = price {
        if !price.is_finite() || price < 0.0 {
            return Err(unprocessable("price must be non-negative"));
        }
    }
    Ok(())
}

/// GET /api/subscriptions
pub async fn list(State(state): State<Arc<AppState>>) -> Response {
    match state.db.list_subscriptions() {
        Ok(records) => Json(records).into_response(),
        Err(e) => store_error(e),
    }
}

/// POST /api/subscriptions
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewSubscription>,
) -> Response {
    if let Err(rejection) = validate(Some(payload.name.as_str()), Some(payload.price)) {
        return rejection;
    }

    match state.db.insert_subscription(&payload) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => store_error(e),
    }
}

/// GET /api/subscriptions/{id}
pub async fn fetch(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    match state.db.get_subscription(id) {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => not_found(),
        Err(e) => store_error(e),
    }
}

/// PUT /api/subscriptions/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(patch): Json<SubscriptionPatch>,
) -> Response {
    if let Err(rejection) = validate(patch.name.as_deref(), patch.price) {
        return rejection;
    }

    match state.db.update_subscription(id, &patch) {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => not_found(),
        Err(e) => store_error(e),
    }
}

/// PATCH /api/subscriptions/{id}/status
pub async fn set_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusUpdate>,
) -> Response {
    match state.db.set_status(id, payload.status) {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => not_found(),
        Err(e) => store_error(e),
    }
}

/// DELETE /api/subscriptions/{id}
pub async fn remove(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    match state.db.delete_subscription(id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found(),
        Err(e) => store_error(e),
    }
}

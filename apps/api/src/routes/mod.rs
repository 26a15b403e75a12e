//! # HTTP Routes
//!
//! The public surface:
//! ```text
//! GET  /api/health                              liveness + DB reachability
//! GET  /api/products?establishment_id=N         active menu for one tenant
//! POST /api/order                               order submission pipeline
//! GET  /api/admin/orders/:establishment_id      recent orders with items
//! POST /api/admin/update-order                  status + tracking updates
//! ```

pub mod admin;
pub mod orders;
pub mod products;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/products", get(products::list_products))
        .route("/api/order", post(orders::create_order))
        .route(
            "/api/admin/orders/:establishment_id",
            get(admin::list_orders),
        )
        .route("/api/admin/update-order", post(admin::update_order))
        .with_state(state)
}

/// Liveness check that also proves the database answers queries.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "status": "degraded" })),
        )
    }
}

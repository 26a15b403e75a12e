//! # Admin Panel Endpoints
//!
//! Operator-facing: recent order listing and status/tracking updates.
//! Status strings are parsed at this boundary and the transition is
//! checked against the order's current state before anything is written.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use comanda_core::{notice, OrderStatus};
use comanda_db::{DbError, OrderWithLines};

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/admin/orders/:establishment_id`
///
/// The tenant's most recent orders, newest first, each with its items.
pub async fn list_orders(
    State(state): State<AppState>,
    Path(establishment_id): Path<i64>,
) -> Result<Json<Vec<OrderWithLines>>, ApiError> {
    let orders = state
        .db
        .orders()
        .list_recent(establishment_id, state.config.admin_orders_limit)
        .await?;

    Ok(Json(orders))
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub order_id: Option<String>,
    pub status: Option<String>,
    pub tracking_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateOrderResponse {
    pub ok: bool,
}

/// `POST /api/admin/update-order`
///
/// Applies a status change (and optional tracking link) to an order,
/// then notifies the customer when the new status warrants it.
pub async fn update_order(
    State(state): State<AppState>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<UpdateOrderResponse>, ApiError> {
    let order_id = request.order_id.as_deref().ok_or(ApiError::MissingData)?;
    let raw_status = request.status.as_deref().ok_or(ApiError::MissingData)?;

    let next: OrderStatus = raw_status.parse().map_err(ApiError::from)?;

    // Read, validate, then compare-and-set against the status we read.
    // If another operator changed the order in between, the write matches
    // nothing and we go around with fresh data, so a transition validated
    // against a stale status can never land.
    let mut attempt = 1;
    let order = loop {
        let order = state
            .db
            .orders()
            .get_by_id(order_id)
            .await?
            .ok_or(ApiError::OrderNotFound)?;

        order.status.transition_to(next)?;

        match state
            .db
            .orders()
            .update_status(order_id, order.status, next, request.tracking_url.as_deref())
            .await
        {
            Ok(()) => break order,
            Err(DbError::StatusConflict { .. }) if attempt < 3 => {
                attempt += 1;
            }
            Err(err) => return Err(err.into()),
        }
    };

    info!(
        establishment_id = order.establishment_id,
        friendly_id = order.friendly_id,
        from = %order.status,
        to = %next,
        "Order status updated"
    );

    // Customer notification, best effort, only for statuses that speak
    // to the customer.
    if let Some(chat_id) = order.telegram_user_id {
        let establishment = state
            .db
            .establishments()
            .get_by_id(order.establishment_id)
            .await?;

        if let Some(token) = establishment.and_then(|e| e.bot_token) {
            if let Some(text) = notice::customer_status_update(
                next,
                order.friendly_id,
                request.tracking_url.as_deref(),
            ) {
                state
                    .notifier
                    .dispatch(order.establishment_id, token, chat_id, text);
            }
        }
    }

    Ok(Json(UpdateOrderResponse { ok: true }))
}

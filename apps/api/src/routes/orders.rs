//! # Order Submission Endpoint
//!
//! The whole pipeline in one handler:
//! ```text
//! validate ids ──► load tenant ──► resolve catalog ──► price ──► persist
//!                                                                   │
//!                              respond {ok, order_id, global_id} ◄──┤
//!                                                                   │
//!                              owner notification (fire-and-forget) ┘
//! ```
//! Every figure in the response and in the database comes from the
//! server-side pricing pass; the client's numbers are input, never truth.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use comanda_core::notice;
use comanda_core::pricing::RequestedLine;
use comanda_core::{price_order, requested_product_ids, CustomerInfo, DEFAULT_ESTABLISHMENT_ID};

use crate::error::ApiError;
use crate::state::AppState;

/// Chat identity forwarded by the storefront webview.
#[derive(Debug, Deserialize)]
pub struct TelegramUser {
    pub id: Option<i64>,
}

/// The untrusted submission body.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub establishment_id: Option<i64>,
    #[serde(default)]
    pub items: Vec<RequestedLine>,
    pub telegram_user: Option<TelegramUser>,
    #[serde(default)]
    pub customer: CustomerInfo,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub ok: bool,
    /// The establishment-scoped number shown to the customer.
    pub order_id: i64,
    /// The opaque UUID, for diagnostics and admin operations.
    pub global_id: String,
}

/// `POST /api/order`
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    let establishment_id = request
        .establishment_id
        .unwrap_or(DEFAULT_ESTABLISHMENT_ID);

    // Cart shape checks come before tenant lookup, so an empty cart is
    // empty_order even for an unknown establishment.
    let ids = requested_product_ids(&request.items)?;

    let establishment = state
        .db
        .establishments()
        .get_by_id(establishment_id)
        .await?
        .ok_or(ApiError::StoreNotFound)?;

    // One batched snapshot; every line is validated against the same
    // catalog state.
    let catalog = state.db.products().resolve(establishment_id, &ids).await?;
    let priced = price_order(&request.items, &catalog)?;

    let telegram_user_id = request.telegram_user.as_ref().and_then(|u| u.id);

    let created = state
        .db
        .orders()
        .create_order(establishment_id, &request.customer, telegram_user_id, &priced)
        .await?;

    info!(
        establishment_id,
        friendly_id = created.friendly_id,
        total_cents = priced.total.cents(),
        "Order accepted"
    );

    // Owner alert only after the commit; its outcome cannot affect the
    // response.
    if let (Some(token), Some(owner_chat)) =
        (establishment.bot_token.clone(), establishment.owner_telegram_id)
    {
        let text = notice::owner_new_order(
            &establishment.name,
            created.friendly_id,
            &request.customer,
            &priced.lines,
            priced.total,
        );
        state
            .notifier
            .dispatch(establishment_id, token, owner_chat, text);
    }

    Ok(Json(CreateOrderResponse {
        ok: true,
        order_id: created.friendly_id,
        global_id: created.order_id,
    }))
}

//! # API Error Types
//!
//! Maps every failure in the request pipeline to a stable wire shape:
//! `{"error": "<kind>"}` with an HTTP status, plus `product_id` for
//! availability refusals.
//!
//! ## Status Mapping
//! ```text
//! 400  empty_order | invalid_items | product_unavailable
//!      missing_data | invalid_status | invalid_transition
//! 404  store_not_found | order_not_found
//! 500  internal_error
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use comanda_core::{RejectionReason, StatusError};
use comanda_db::DbError;

/// Everything a request handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Cart is empty")]
    EmptyOrder,

    #[error("No usable item in cart")]
    InvalidItems,

    #[error("Product {product_id} is unavailable")]
    ProductUnavailable { product_id: i64 },

    #[error("Establishment not found")]
    StoreNotFound,

    #[error("Order not found")]
    OrderNotFound,

    #[error("Required field missing")]
    MissingData,

    #[error("Unknown status: {0}")]
    InvalidStatus(String),

    #[error("Illegal status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Internal error")]
    Internal,
}

impl ApiError {
    /// The machine-readable `error` field on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::EmptyOrder => "empty_order",
            ApiError::InvalidItems => "invalid_items",
            ApiError::ProductUnavailable { .. } => "product_unavailable",
            ApiError::StoreNotFound => "store_not_found",
            ApiError::OrderNotFound => "order_not_found",
            ApiError::MissingData => "missing_data",
            ApiError::InvalidStatus(_) => "invalid_status",
            ApiError::InvalidTransition { .. } => "invalid_transition",
            ApiError::Internal => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyOrder
            | ApiError::InvalidItems
            | ApiError::ProductUnavailable { .. }
            | ApiError::MissingData
            | ApiError::InvalidStatus(_)
            | ApiError::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
            ApiError::StoreNotFound | ApiError::OrderNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::ProductUnavailable { product_id } => {
                json!({ "error": self.kind(), "product_id": product_id })
            }
            _ => json!({ "error": self.kind() }),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<RejectionReason> for ApiError {
    fn from(reason: RejectionReason) -> Self {
        match reason {
            RejectionReason::EmptyOrder => ApiError::EmptyOrder,
            RejectionReason::InvalidItems => ApiError::InvalidItems,
            RejectionReason::ProductUnavailable { product_id } => {
                ApiError::ProductUnavailable { product_id }
            }
        }
    }
}

impl From<StatusError> for ApiError {
    fn from(err: StatusError) -> Self {
        match err {
            StatusError::UnknownStatus(raw) => ApiError::InvalidStatus(raw),
            StatusError::IllegalTransition { from, to } => ApiError::InvalidTransition { from, to },
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::OrderNotFound,
            other => {
                error!(error = %other, "Database operation failed");
                ApiError::Internal
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::EmptyOrder.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::StoreNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::OrderNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_kinds_stable() {
        assert_eq!(
            ApiError::ProductUnavailable { product_id: 999 }.kind(),
            "product_unavailable"
        );
        assert_eq!(ApiError::MissingData.kind(), "missing_data");
        assert_eq!(
            ApiError::InvalidTransition {
                from: "completed".into(),
                to: "preparing".into()
            }
            .kind(),
            "invalid_transition"
        );
    }

    #[test]
    fn test_domain_conversions() {
        let api: ApiError = RejectionReason::ProductUnavailable { product_id: 7 }.into();
        assert!(matches!(
            api,
            ApiError::ProductUnavailable { product_id: 7 }
        ));

        let api: ApiError = StatusError::UnknownStatus("shipped".into()).into();
        assert!(matches!(api, ApiError::InvalidStatus(_)));

        let api: ApiError = DbError::not_found("Order", "abc").into();
        assert!(matches!(api, ApiError::OrderNotFound));
    }
}

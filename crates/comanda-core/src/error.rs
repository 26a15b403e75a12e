//! # Error Types
//!
//! Domain-specific error types for comanda-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  comanda-core errors (this file)                                        │
//! │  ├── RejectionReason  - Why an order submission was refused             │
//! │  └── StatusError      - Bad status values / illegal transitions         │
//! │                                                                         │
//! │  comanda-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  API errors (in app)                                                    │
//! │  └── ApiError         - What the client sees (HTTP status + kind)       │
//! │                                                                         │
//! │  Flow: RejectionReason/StatusError → ApiError → JSON response           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, status names)
//! 3. Errors are enum variants, never String
//! 4. Each variant maps to exactly one wire error kind

use thiserror::Error;

// =============================================================================
// Rejection Reason
// =============================================================================

/// Why an untrusted order submission was rejected by the pricing validator.
///
/// Any single bad line fails the entire submission - partial orders are
/// never created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    /// The submitted item list was empty.
    #[error("order contains no items")]
    EmptyOrder,

    /// No submitted item carried a usable product id.
    ///
    /// ## When This Occurs
    /// - Every product_id is missing, non-numeric, zero or negative
    /// - The item list exceeds the maximum allowed size
    #[error("order items are malformed")]
    InvalidItems,

    /// A referenced product does not exist for this establishment, belongs
    /// to another tenant, or is inactive.
    ///
    /// ## Order Workflow
    /// ```text
    /// Submit [{product_id: 10}, {product_id: 999}]
    ///      │
    ///      ▼
    /// Catalog resolves {10 → Burger}; 999 is silently omitted
    ///      │
    ///      ▼
    /// ProductUnavailable { product_id: 999 } → whole order refused
    /// ```
    #[error("product {product_id} is unavailable")]
    ProductUnavailable { product_id: i64 },
}

impl RejectionReason {
    /// Wire error kind, as returned in `{ok: false, error: <kind>}`.
    pub const fn kind(&self) -> &'static str {
        match self {
            RejectionReason::EmptyOrder => "empty_order",
            RejectionReason::InvalidItems => "invalid_items",
            RejectionReason::ProductUnavailable { .. } => "product_unavailable",
        }
    }
}

// =============================================================================
// Status Error
// =============================================================================

/// Errors raised by the status transition handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    /// The submitted status string is not a known status value.
    ///
    /// Free-form strings are rejected at the boundary instead of being
    /// written to the database and silently producing no notification.
    #[error("unknown order status: {0}")]
    UnknownStatus(String),

    /// The requested transition is not allowed by the state machine
    /// (the order is already in a terminal state).
    #[error("cannot move order from {from} to {to}")]
    IllegalTransition { from: String, to: String },
}

impl StatusError {
    /// Wire error kind, as returned in `{ok: false, error: <kind>}`.
    pub const fn kind(&self) -> &'static str {
        match self {
            StatusError::UnknownStatus(_) => "invalid_status",
            StatusError::IllegalTransition { .. } => "invalid_transition",
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
    fn test_rejection_messages() {
        assert_eq!(
            RejectionReason::ProductUnavailable { product_id: 999 }.to_string(),
            "product 999 is unavailable"
        );
        assert_eq!(RejectionReason::EmptyOrder.to_string(), "order contains no items");
    }

    #[test]
    fn test_rejection_kinds() {
        assert_eq!(RejectionReason::EmptyOrder.kind(), "empty_order");
        assert_eq!(RejectionReason::InvalidItems.kind(), "invalid_items");
        assert_eq!(
            RejectionReason::ProductUnavailable { product_id: 1 }.kind(),
            "product_unavailable"
        );
    }

    #[test]
    fn test_status_error_kinds() {
        assert_eq!(
            StatusError::UnknownStatus("shipped".into()).kind(),
            "invalid_status"
        );
        assert_eq!(
            StatusError::IllegalTransition {
                from: "completed".into(),
                to: "preparing".into()
            }
            .kind(),
            "invalid_transition"
        );
    }
}

//! # Domain Types
//!
//! Core domain types used throughout Comanda.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ Establishment   │   │     Product     │   │      Order      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id (UUID)      │       │
//! │  │  name           │   │  establishment  │   │  friendly_id    │       │
//! │  │  bot_token      │   │  name           │   │  status         │       │
//! │  │  owner chat id  │   │  price_cents    │   │  total_cents    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Establishment 1──* Product      Establishment 1──* Order               │
//! │  Order 1──* OrderLine (price and name frozen at order time)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Orders carry two identifiers:
//! - `id`: UUID v4 - opaque, globally unique, used for relations and admin ops
//! - `friendly_id`: small integer, unique *per establishment*, shown to humans

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StatusError;
use crate::money::Money;

// =============================================================================
// Establishment
// =============================================================================

/// A tenant: an independent storefront with its own catalog, orders and
/// messaging credential.
///
/// Created by operator tooling; the order pipeline only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Establishment {
    /// Tenant identifier.
    pub id: i64,

    /// Display name, shown in owner notifications.
    pub name: String,

    /// Opaque messaging credential (Telegram bot token) for this tenant.
    ///
    /// Every message concerning this establishment is sent with THIS token
    /// and no other - the multi-tenant isolation boundary.
    pub bot_token: Option<String>,

    /// Chat id of the owner, target of new-order alerts.
    pub owner_telegram_id: Option<i64>,

    /// Whether the storefront is live.
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog item belonging to exactly one establishment.
///
/// Owned by catalog management; the order pipeline only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Product identifier (tenant-agnostic integer, positive).
    pub id: i64,

    /// Tenant this product belongs to.
    pub establishment_id: i64,

    /// Display name shown in the menu and on order lines.
    pub name: String,

    /// Unit price in cents (smallest currency unit). Never floating point.
    pub price_cents: i64,

    /// Whether product is orderable (soft delete).
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The fulfillment status of an order.
///
/// ## State Machine
/// ```text
/// received ──► preparing ──► delivering ──► completed (terminal)
///     │            │              │
///     └────────────┴──────────────┴──────► canceled (terminal)
/// ```
///
/// The transition table is deliberately permissive: an operator may move
/// an order between any two non-terminal states (including backwards, to
/// correct mistakes). Terminal states accept no further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order submitted, not yet acknowledged by the kitchen.
    Received,
    /// Food is being made.
    Preparing,
    /// Courier is on the way.
    Delivering,
    /// Order delivered and closed.
    Completed,
    /// Order canceled by the establishment.
    Canceled,
}

impl OrderStatus {
    /// Terminal states accept no further transitions.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Canceled)
    }

    /// Checks whether a transition from `self` to `next` is allowed.
    ///
    /// Permissive by design: any non-terminal state may move anywhere,
    /// terminal states are frozen.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return *self == next;
        }
        let _ = next;
        true
    }

    /// Validates a transition, returning a typed error when illegal.
    pub fn transition_to(&self, next: OrderStatus) -> Result<OrderStatus, StatusError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(StatusError::IllegalTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            })
        }
    }

    /// Wire/database representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Received => "received",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Completed => "completed",
            OrderStatus::Canceled => "canceled",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Received
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse at the boundary so free-form strings never reach the database.
impl FromStr for OrderStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "received" => Ok(OrderStatus::Received),
            "preparing" => Ok(OrderStatus::Preparing),
            "delivering" => Ok(OrderStatus::Delivering),
            "completed" => Ok(OrderStatus::Completed),
            "canceled" => Ok(OrderStatus::Canceled),
            other => Err(StatusError::UnknownStatus(other.to_string())),
        }
    }
}

// =============================================================================
// Customer Info
// =============================================================================

/// Contact fields supplied by the customer at checkout.
///
/// All fields are optional on the wire; notification text substitutes
/// placeholders for missing values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
}

// =============================================================================
// Order
// =============================================================================

/// A persisted order header belonging to exactly one establishment.
///
/// Invariant: `total_cents == Σ line.unit_price_cents * line.quantity`.
/// The sum is fixed at creation from catalog data and never recomputed -
/// price protection for both parties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    /// Opaque global identity (UUID v4), never reused.
    pub id: String,

    /// Tenant this order belongs to.
    pub establishment_id: i64,

    /// Establishment-scoped order number, starts at 1, unique per tenant.
    pub friendly_id: i64,

    /// Chat identity of the customer, target of status notifications.
    pub telegram_user_id: Option<i64>,

    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub customer_note: Option<String>,

    /// Authoritative total in cents, computed server-side.
    pub total_cents: i64,

    pub status: OrderStatus,

    /// Optional delivery tracking reference set by the operator.
    pub tracking_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the authoritative total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// A line item in an order.
/// Uses the snapshot pattern to freeze product data at order time:
/// later catalog edits must not alter historical orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub product_id: i64,
    /// Product name at order time (frozen).
    pub name_snapshot: String,
    /// Unit price in cents at order time (frozen).
    pub unit_price_cents: i64,
    /// Quantity ordered (positive).
    pub quantity: i64,
    /// Line total (unit_price × quantity), frozen at order time.
    pub line_total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Received);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "preparing".parse::<OrderStatus>().unwrap(),
            OrderStatus::Preparing
        );
        assert_eq!(
            " Delivering ".parse::<OrderStatus>().unwrap(),
            OrderStatus::Delivering
        );
        assert!(matches!(
            "shipped".parse::<OrderStatus>(),
            Err(StatusError::UnknownStatus(_))
        ));
    }

    #[test]
    fn test_status_transitions() {
        // Non-terminal states may move anywhere, including backwards.
        assert!(OrderStatus::Received.can_transition_to(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Received));
        assert!(OrderStatus::Delivering.can_transition_to(OrderStatus::Canceled));

        // Terminal states are frozen.
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Preparing));
        assert!(!OrderStatus::Canceled.can_transition_to(OrderStatus::Received));
        assert!(matches!(
            OrderStatus::Completed.transition_to(OrderStatus::Canceled),
            Err(StatusError::IllegalTransition { .. })
        ));

        // Re-applying the current terminal status is a no-op, not an error.
        assert!(OrderStatus::Completed.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn test_status_roundtrip_str() {
        for status in [
            OrderStatus::Received,
            OrderStatus::Preparing,
            OrderStatus::Delivering,
            OrderStatus::Completed,
            OrderStatus::Canceled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }
}

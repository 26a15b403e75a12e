//! # comanda-core: Pure Business Logic for Comanda
//!
//! This crate is the **heart** of Comanda. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Comanda Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Chat Mini-App (per store)                       │   │
//! │  │    Menu UI ──► Cart UI ──► Checkout ──► Confirmation           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP (JSON)                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    API Server (axum)                            │   │
//! │  │    list_products, create_order, list_orders, update_order      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ comanda-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │  notice   │  │   │
//! │  │   │   Order   │  │   Money   │  │ validator │  │ messages  │  │   │
//! │  │   │  Status   │  │  (cents)  │  │ coercion  │  │ (text)    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  comanda-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Establishment, Product, Order, OrderLine)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Server-side price revalidation of untrusted carts
//! - [`notice`] - Human-readable notification message builders
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Never trust the client**: pricing is recomputed from catalog data only
//!
//! ## Example Usage
//!
//! ```rust
//! use comanda_core::money::Money;
//!
//! // Create money from cents (never from floats!)
//! let price = Money::from_cents(500); // $5.00
//! let line_total = price * 2;
//! assert_eq!(line_total.cents(), 1000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod notice;
pub mod pricing;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use comanda_core::Money` instead of
// `use comanda_core::money::Money`

pub use error::{RejectionReason, StatusError};
pub use money::Money;
pub use pricing::{price_order, requested_product_ids, CatalogEntry, PricedLine, PricedOrder};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default establishment ID used when a submission omits the tenant selector.
///
/// ## Why a constant?
/// Single-store deployments embed the mini-app without a tenant parameter.
/// The schema is fully multi-tenant; this is only the fallback selector.
pub const DEFAULT_ESTABLISHMENT_ID: i64 = 1;

/// Maximum line items allowed in a single order submission.
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable order sizes.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

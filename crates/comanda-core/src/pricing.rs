//! # Pricing Validator
//!
//! Server-side revalidation of an untrusted, client-built cart.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Never Trust The Client's Numbers                           │
//! │                                                                         │
//! │  Client submits: [{product_id: 10, qty: 2}]  (+ whatever total it       │
//! │  claims - ignored entirely)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  requested_product_ids() ← coerce ids, reject empty/garbage carts       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Catalog Reader resolves ALL ids in ONE batched lookup                  │
//! │  (one snapshot - every line validated against the same catalog state)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  price_order() ← per-line availability check + integer total            │
//! │       │                                                                 │
//! │       ├── any line unknown/inactive? → whole order refused              │
//! │       │                                                                 │
//! │       └── OK → PricedOrder { total, lines } is what gets persisted,     │
//! │               never the client payload                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use std::collections::HashMap;
//! use comanda_core::pricing::{price_order, CatalogEntry, RequestedLine};
//!
//! let items: Vec<RequestedLine> =
//!     serde_json::from_str(r#"[{"product_id": 10, "qty": 2}]"#).unwrap();
//!
//! let mut catalog = HashMap::new();
//! catalog.insert(10, CatalogEntry { name: "Burger".into(), unit_price_cents: 500, active: true });
//!
//! let priced = price_order(&items, &catalog).unwrap();
//! assert_eq!(priced.total.cents(), 1000);
//! ```

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::RejectionReason;
use crate::money::Money;
use crate::{MAX_LINE_QUANTITY, MAX_ORDER_LINES};

// =============================================================================
// Input / Output Types
// =============================================================================

/// One `(product_id, qty)` pair exactly as submitted by the client.
///
/// Fields are kept as raw JSON values because the client is untrusted:
/// ids and quantities arrive as numbers, numeric strings, fractions,
/// negatives or garbage, and coercion rules decide what they mean.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestedLine {
    #[serde(default)]
    pub product_id: Value,
    #[serde(default)]
    pub qty: Value,
}

/// Authoritative catalog data for one product, as resolved by the
/// Catalog Reader for a single establishment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub unit_price_cents: i64,
    pub active: bool,
}

/// A validated line with name and price captured from the catalog.
/// This, not the client payload, is what gets persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: i64,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
}

impl PricedLine {
    /// Line total (unit price × quantity), integer arithmetic only.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The authoritative pricing result for a whole submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    /// Σ unit_price × quantity over all lines, in cents.
    pub total: Money,
    /// Resolved lines in submission order.
    pub lines: Vec<PricedLine>,
}

// =============================================================================
// Coercion
// =============================================================================

/// Coerces a client-submitted product id to a positive integer.
///
/// Accepts integral JSON numbers and strings of digits; everything else
/// (fractions, zero, negatives, booleans, null) is unusable.
pub fn coerce_product_id(raw: &Value) -> Option<i64> {
    let id = match raw {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };

    (id > 0).then_some(id)
}

/// Coerces a client-submitted quantity to a positive integer.
///
/// ## Rules
/// - Missing / non-numeric → defaults to 1
/// - Fractional values are truncated toward zero
/// - Anything below 1 after truncation → 1 (guards against negative or
///   zero quantities that would corrupt the total)
/// - Capped at [`MAX_LINE_QUANTITY`]
///
/// The coerced value is used consistently for BOTH the computed total and
/// the persisted line, so the stored invariant always holds.
pub fn coerce_quantity(raw: &Value) -> i64 {
    let qty = match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(1),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .or_else(|_| s.trim().parse::<f64>().map(|f| f.trunc() as i64))
            .unwrap_or(1),
        _ => 1,
    };

    qty.clamp(1, MAX_LINE_QUANTITY)
}

// =============================================================================
// Validation
// =============================================================================

/// Extracts the distinct usable product ids from a submission, in first-seen
/// order, for the batched catalog lookup.
///
/// ## Rejections
/// - Empty item list → [`RejectionReason::EmptyOrder`]
/// - Oversized item list, or no id parses to a positive integer →
///   [`RejectionReason::InvalidItems`]
pub fn requested_product_ids(lines: &[RequestedLine]) -> Result<Vec<i64>, RejectionReason> {
    if lines.is_empty() {
        return Err(RejectionReason::EmptyOrder);
    }

    if lines.len() > MAX_ORDER_LINES {
        return Err(RejectionReason::InvalidItems);
    }

    let mut ids: Vec<i64> = Vec::with_capacity(lines.len());
    for line in lines {
        if let Some(id) = coerce_product_id(&line.product_id) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }

    if ids.is_empty() {
        return Err(RejectionReason::InvalidItems);
    }

    Ok(ids)
}

/// Validates every requested line against one catalog snapshot and computes
/// the authoritative total.
///
/// ## Algorithm
/// 1. Coerce each line's id; a line whose id is unusable or absent from the
///    snapshot, or whose product is inactive, refuses the WHOLE order with
///    [`RejectionReason::ProductUnavailable`] - partial orders are not
///    allowed.
/// 2. Coerce each quantity (see [`coerce_quantity`]).
/// 3. Accumulate `total += unit_price × quantity` using integer cents only.
///
/// The caller must resolve `catalog` with a single batched lookup so all
/// lines see the same catalog state.
pub fn price_order(
    lines: &[RequestedLine],
    catalog: &HashMap<i64, CatalogEntry>,
) -> Result<PricedOrder, RejectionReason> {
    if lines.is_empty() {
        return Err(RejectionReason::EmptyOrder);
    }

    let mut total = Money::zero();
    let mut priced: Vec<PricedLine> = Vec::with_capacity(lines.len());

    for line in lines {
        let product_id = coerce_product_id(&line.product_id).unwrap_or(0);

        let entry = match catalog.get(&product_id) {
            Some(entry) if entry.active => entry,
            _ => return Err(RejectionReason::ProductUnavailable { product_id }),
        };

        let quantity = coerce_quantity(&line.qty);
        let unit_price = Money::from_cents(entry.unit_price_cents);

        total += unit_price.multiply_quantity(quantity);
        priced.push(PricedLine {
            product_id,
            name: entry.name.clone(),
            unit_price,
            quantity,
        });
    }

    Ok(PricedOrder {
        total,
        lines: priced,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

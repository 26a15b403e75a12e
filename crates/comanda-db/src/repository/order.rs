//! # Order Repository (Order Writer + Friendly-ID Allocator)
//!
//! Atomic persistence for orders and their line items.
//!
//! ## Order Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 create_order(): one transaction                         │
//! │                                                                         │
//! │  BEGIN IMMEDIATE ── takes the write lock up front, so the MAX read      │
//! │    │                below always sees the latest committed order        │
//! │    │                                                                    │
//! │    ├── SELECT MAX(friendly_id) WHERE establishment_id = ?               │
//! │    │        └── next = max + 1 (1 for the tenant's first order)         │
//! │    │                                                                    │
//! │    ├── INSERT order header (friendly_id, authoritative total)           │
//! │    │                                                                    │
//! │    ├── INSERT one row per resolved line (snapshot name + price)         │
//! │    │                                                                    │
//! │  COMMIT ── all steps succeed or none do; no reader ever sees a          │
//! │            header without lines or lines without a header               │
//! │                                                                         │
//! │  Two backstops, both retried by the outer loop:                         │
//! │  - SQLITE_BUSY when writers collide on the lock (transient)             │
//! │  - UNIQUE (establishment_id, friendly_id) if a duplicate number ever    │
//! │    reaches the insert                                                   │
//! │  Duplicate numbers can never commit; gaps from aborted transactions     │
//! │  are acceptable.                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use comanda_core::{CustomerInfo, Order, OrderLine, OrderStatus, PricedOrder};

/// How many times a contended order creation is retried before giving up.
/// Covers both a busy write lock and a friendly-id collision; each retry
/// re-reads MAX inside a fresh transaction.
const CREATE_ORDER_RETRY_ATTEMPTS: u32 = 5;

/// Result of a successful order creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedOrder {
    /// Opaque global identity (UUID). Diagnostics only - never shown to
    /// the customer as their order number.
    pub order_id: String,
    /// The establishment-scoped number shown to humans.
    pub friendly_id: i64,
}

/// An order header with its line items, for the admin listing.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithLines {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderLine>,
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Persists an order and its lines as a single atomic unit, assigning
    /// the next friendly id for the establishment.
    ///
    /// ## Arguments
    /// * `establishment_id` - Tenant the order belongs to
    /// * `customer` - Contact fields as submitted
    /// * `telegram_user_id` - Chat identity for follow-up notifications
    /// * `priced` - The pricing validator's output. ONLY these figures are
    ///   persisted; the client payload never reaches this function.
    ///
    /// ## Concurrency
    /// Safe under concurrent submissions for the same establishment: the
    /// transaction opens with `BEGIN IMMEDIATE` so writers serialize before
    /// the MAX read, and the unique `(establishment_id, friendly_id)`
    /// constraint plus bounded retry (on busy locks as well as collisions)
    /// guarantees distinct, increasing friendly ids per tenant. A losing
    /// submission is retried, never surfaced as an error.
    pub async fn create_order(
        &self,
        establishment_id: i64,
        customer: &CustomerInfo,
        telegram_user_id: Option<i64>,
        priced: &PricedOrder,
    ) -> DbResult<CreatedOrder> {
        let mut attempt = 1;
        loop {
            match self
                .try_create_order(establishment_id, customer, telegram_user_id, priced)
                .await
            {
                Ok(created) => {
                    debug!(
                        establishment_id,
                        order_id = %created.order_id,
                        friendly_id = created.friendly_id,
                        "Order persisted"
                    );
                    return Ok(created);
                }
                Err(err)
                    if (err.is_friendly_id_conflict() || err.is_busy())
                        && attempt < CREATE_ORDER_RETRY_ATTEMPTS =>
                {
                    warn!(
                        establishment_id,
                        attempt,
                        error = %err,
                        "Order creation contended, retrying"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One allocation + insert attempt inside a single transaction.
    ///
    /// The transaction opens with `BEGIN IMMEDIATE`: the write lock is
    /// taken before the MAX read, so concurrent writers wait on the busy
    /// timeout here instead of failing a lock upgrade mid-transaction on a
    /// stale snapshot.
    async fn try_create_order(
        &self,
        establishment_id: i64,
        customer: &CustomerInfo,
        telegram_user_id: Option<i64>,
        priced: &PricedOrder,
    ) -> DbResult<CreatedOrder> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

        match Self::insert_order(&mut conn, establishment_id, customer, telegram_user_id, priced)
            .await
        {
            Ok(created) => {
                sqlx::query("COMMIT").execute(&mut *conn).await?;
                Ok(created)
            }
            Err(err) => {
                // The connection returns to the pool; never with an open
                // transaction
                let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                Err(err)
            }
        }
    }

    /// The allocation + inserts, run inside the caller's open transaction.
    async fn insert_order(
        conn: &mut sqlx::SqliteConnection,
        establishment_id: i64,
        customer: &CustomerInfo,
        telegram_user_id: Option<i64>,
        priced: &PricedOrder,
    ) -> DbResult<CreatedOrder> {
        // Friendly-ID Allocator: tenant-scoped MAX+1, starting at 1.
        let current_max: Option<i64> = sqlx::query_scalar(
            "SELECT MAX(friendly_id) FROM orders WHERE establishment_id = ?1",
        )
        .bind(establishment_id)
        .fetch_one(&mut *conn)
        .await?;
        let friendly_id = current_max.unwrap_or(0) + 1;

        let order_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, establishment_id, friendly_id, telegram_user_id,
                customer_name, customer_phone, customer_address, customer_note,
                total_cents, status, tracking_url,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8,
                ?9, ?10, ?11,
                ?12, ?13
            )
            "#,
        )
        .bind(&order_id)
        .bind(establishment_id)
        .bind(friendly_id)
        .bind(telegram_user_id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.note)
        .bind(priced.total.cents())
        .bind(OrderStatus::Received)
        .bind(Option::<String>::None)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        for line in &priced.lines {
            sqlx::query(
                r#"
                INSERT INTO order_lines (
                    id, order_id, product_id,
                    name_snapshot, unit_price_cents, quantity, line_total_cents,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&order_id)
            .bind(line.product_id)
            .bind(&line.name)
            .bind(line.unit_price.cents())
            .bind(line.quantity)
            .bind(line.line_total().cents())
            .bind(now)
            .execute(&mut *conn)
            .await?;
        }

        Ok(CreatedOrder {
            order_id,
            friendly_id,
        })
    }

    /// Gets an order header by its opaque id.
    pub async fn get_by_id(&self, order_id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, establishment_id, friendly_id, telegram_user_id,
                   customer_name, customer_phone, customer_address, customer_note,
                   total_cents, status, tracking_url, created_at, updated_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets all line items for an order, in insertion order.
    pub async fn get_lines(&self, order_id: &str) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT id, order_id, product_id, name_snapshot, unit_price_cents,
                   quantity, line_total_cents, created_at
            FROM order_lines
            WHERE order_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Lists an establishment's most recent orders, newest first, each with
    /// its line items. Operator-facing.
    pub async fn list_recent(
        &self,
        establishment_id: i64,
        limit: u32,
    ) -> DbResult<Vec<OrderWithLines>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, establishment_id, friendly_id, telegram_user_id,
                   customer_name, customer_phone, customer_address, customer_note,
                   total_cents, status, tracking_url, created_at, updated_at
            FROM orders
            WHERE establishment_id = ?1
            ORDER BY created_at DESC, friendly_id DESC
            LIMIT ?2
            "#,
        )
        .bind(establishment_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.get_lines(&order.id).await?;
            result.push(OrderWithLines { order, items });
        }

        Ok(result)
    }

    /// Applies a status change and optional tracking reference to an order,
    /// guarded by the status the caller validated against.
    ///
    /// Compare-and-set: the UPDATE only matches while the order still holds
    /// `expected`, so a transition validated against a stale read can never
    /// be written (e.g. re-opening an order another operator just
    /// completed). Only the status/tracking fields and the modification
    /// timestamp ever change; header totals and lines are immutable after
    /// creation.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Unknown order id
    /// * `Err(DbError::StatusConflict)` - Status changed since the caller
    ///   read it; re-read and re-validate
    pub async fn update_status(
        &self,
        order_id: &str,
        expected: OrderStatus,
        status: OrderStatus,
        tracking_url: Option<&str>,
    ) -> DbResult<()> {
        debug!(order_id, from = %expected, to = %status, "Updating order status");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = ?3,
                tracking_url = ?4,
                updated_at = ?5
            WHERE id = ?1 AND status = ?2
            "#,
        )
        .bind(order_id)
        .bind(expected)
        .bind(status)
        .bind(tracking_url)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_by_id(order_id).await? {
                None => Err(DbError::not_found("Order", order_id)),
                Some(_) => Err(DbError::StatusConflict {
                    id: order_id.to_string(),
                }),
            };
        }

        Ok(())
    }
}

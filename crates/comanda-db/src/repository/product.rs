//! # Product Repository (Catalog Reader)
//!
//! Read-only lookup of catalog data for a given establishment. This is the
//! authoritative source of product name, price and availability - whatever
//! the client claims about its cart is revalidated against this.
//!
//! ## Batched Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How resolve() Works                                  │
//! │                                                                         │
//! │  Submission references products [10, 11, 999]                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ONE query: WHERE establishment_id = ? AND id IN (10, 11, 999)          │
//! │  (single catalog snapshot - no N+1, no torn reads across lines)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                            │
//! │  │ 10 → Burger  $5.00  active              │                            │
//! │  │ 11 → Fries   $2.50  active              │                            │
//! │  │ 999 → (not in map: unknown, inactive    │                            │
//! │  │        or another tenant's product)     │                            │
//! │  └─────────────────────────────────────────┘                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Pricing validator treats omission as "unavailable"                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use sqlx::{QueryBuilder, Row, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use comanda_core::{CatalogEntry, Product};

/// Repository for catalog lookups.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists active products for an establishment, newest first.
    ///
    /// This is the menu the mini-app renders.
    pub async fn list_active(&self, establishment_id: i64) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, establishment_id, name, price_cents, is_active,
                   created_at, updated_at
            FROM products
            WHERE establishment_id = ?1 AND is_active = 1
            ORDER BY id DESC
            "#,
        )
        .bind(establishment_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            establishment_id,
            count = products.len(),
            "Listed active products"
        );
        Ok(products)
    }

    /// Resolves a set of product ids against one establishment's catalog
    /// in a single batched query.
    ///
    /// ## Contract
    /// - Returns entries only for products that exist AND belong to the
    ///   given establishment; everything else is silently omitted (the
    ///   caller treats omission as "unavailable")
    /// - Inactive products ARE returned, with `active: false`, so the
    ///   validator can report them precisely
    /// - An empty id set returns an empty map without touching the database
    /// - No side effects
    pub async fn resolve(
        &self,
        establishment_id: i64,
        product_ids: &[i64],
    ) -> DbResult<HashMap<i64, CatalogEntry>> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query = QueryBuilder::new(
            "SELECT id, name, price_cents, is_active FROM products WHERE establishment_id = ",
        );
        query.push_bind(establishment_id);
        query.push(" AND id IN (");
        let mut ids = query.separated(", ");
        for id in product_ids {
            ids.push_bind(*id);
        }
        query.push(")");

        let rows = query.build().fetch_all(&self.pool).await?;

        let mut resolved = HashMap::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.try_get("id")?;
            resolved.insert(
                id,
                CatalogEntry {
                    name: row.try_get("name")?,
                    unit_price_cents: row.try_get("price_cents")?,
                    active: row.try_get("is_active")?,
                },
            );
        }

        debug!(
            establishment_id,
            requested = product_ids.len(),
            resolved = resolved.len(),
            "Resolved catalog snapshot"
        );
        Ok(resolved)
    }

    /// Inserts a product. Catalog management tooling only - the order
    /// pipeline never writes the catalog.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, establishment_id, name, price_cents, is_active,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(product.id)
        .bind(product.establishment_id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a product's price. Catalog tooling only; used by tests to
    /// prove order history is immune to later price edits.
    pub async fn update_price(&self, id: i64, price_cents: i64) -> DbResult<()> {
        let now = chrono::Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET price_cents = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(price_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(crate::error::DbError::not_found("Product", id.to_string()));
        }

        Ok(())
    }
}

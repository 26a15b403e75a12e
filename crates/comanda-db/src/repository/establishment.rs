//! # Establishment Repository
//!
//! Read access to tenant records. Establishments are created by operator
//! tooling (the seed binary); the order pipeline only reads them to check
//! that a storefront exists and to fetch its messaging credential.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use comanda_core::Establishment;

/// Repository for establishment (tenant) lookups.
#[derive(Debug, Clone)]
pub struct EstablishmentRepository {
    pool: SqlitePool,
}

impl EstablishmentRepository {
    /// Creates a new EstablishmentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EstablishmentRepository { pool }
    }

    /// Gets an establishment by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Establishment))` - Tenant found
    /// * `Ok(None)` - Unknown tenant (caller maps to `store_not_found`)
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Establishment>> {
        let establishment = sqlx::query_as::<_, Establishment>(
            r#"
            SELECT id, name, bot_token, owner_telegram_id, is_active, created_at
            FROM establishments
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(establishment)
    }

    /// Inserts a tenant record. Operator tooling only - the order pipeline
    /// never writes this table.
    pub async fn insert(&self, establishment: &Establishment) -> DbResult<()> {
        debug!(id = establishment.id, name = %establishment.name, "Inserting establishment");

        sqlx::query(
            r#"
            INSERT INTO establishments (
                id, name, bot_token, owner_telegram_id, is_active, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(establishment.id)
        .bind(&establishment.name)
        .bind(&establishment.bot_token)
        .bind(establishment.owner_telegram_id)
        .bind(establishment.is_active)
        .bind(establishment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

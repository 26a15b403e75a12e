//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in the API server) ← HTTP status + generic wire kind         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Client sees {ok: false, error: "internal_error"} - specifics stay      │
//! │  in the logs, never on the wire                                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and retry decisions.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - Unknown establishment id on order submission
    /// - Unknown order id on a status update
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Two concurrent submissions computed the same friendly id for one
    ///   establishment (the allocator retries on this)
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Optimistic status update lost a race.
    ///
    /// ## When This Occurs
    /// - The order's status changed between the handler's read and its
    ///   compare-and-set write (two operators editing the same order)
    #[error("Order {id} was modified concurrently")]
    StatusConflict { id: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Order line referencing a missing order header (never happens inside
    ///   the creation transaction; indicates a bug)
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed to begin or commit.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// SQLite write contention (SQLITE_BUSY / SQLITE_LOCKED).
    ///
    /// ## When This Occurs
    /// - Two connections race for the write lock under WAL; the loser's
    ///   statement fails with "database is locked" instead of reaching any
    ///   constraint. Transient: the order writer retries on it.
    #[error("Database busy: {0}")]
    Busy(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// True when this error is a friendly-id collision between concurrent
    /// submissions for the same establishment. The order writer retries
    /// the whole transaction on it.
    pub fn is_friendly_id_conflict(&self) -> bool {
        matches!(self, DbError::UniqueViolation { field, .. } if field.contains("friendly_id"))
    }

    /// True when this error is transient write contention worth retrying.
    pub fn is_busy(&self) -> bool {
        matches!(self, DbError::Busy(_))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message: constraint or busy
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite error messages:
                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>, ..."
                // FK constraint: "FOREIGN KEY constraint failed"
                // SQLITE_BUSY / SQLITE_BUSY_SNAPSHOT: "database is locked"
                // SQLITE_LOCKED: "database table is locked"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("database is locked")
                    || msg.contains("database table is locked")
                {
                    DbError::Busy(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_friendly_id_conflict_detection() {
        let conflict = DbError::UniqueViolation {
            field: "orders.establishment_id, orders.friendly_id".to_string(),
            value: "unknown".to_string(),
        };
        assert!(conflict.is_friendly_id_conflict());

        let other = DbError::UniqueViolation {
            field: "products.id".to_string(),
            value: "unknown".to_string(),
        };
        assert!(!other.is_friendly_id_conflict());

        assert!(!DbError::PoolExhausted.is_friendly_id_conflict());
    }

    #[test]
    fn test_busy_classification() {
        let busy = DbError::Busy("database is locked".to_string());
        assert!(busy.is_busy());
        assert!(!busy.is_friendly_id_conflict());

        assert!(!DbError::QueryFailed("syntax error".to_string()).is_busy());
        assert!(!DbError::PoolExhausted.is_busy());
    }
}

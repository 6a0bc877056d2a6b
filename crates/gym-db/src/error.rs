//! # Database Error Types
//!
//! Error types for database operations and the sale engine.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)          Rule violation (CoreError)        │
//! │       │                                     │                           │
//! │       ▼                                     │                           │
//! │  DbError ← Adds context and categorization  │                           │
//! │       │                                     │                           │
//! │       └──────────────┬──────────────────────┘                           │
//! │                      ▼                                                  │
//! │  EngineError ← What SaleEngine returns; kind() for the HTTP layer      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use gym_core::{CoreError, ErrorKind, ValidationError};
use thiserror::Error;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    /// - ID doesn't exist
    /// - A conditional update matched nothing
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A stock adjustment would take stock below zero.
    ///
    /// Raised by the conditional stock update when a concurrent sale got
    /// there first.
    #[error("Stock underflow for {product_id}: available {available}, delta {delta}")]
    StockUnderflow {
        product_id: String,
        available: i64,
        delta: i64,
    },

    /// A catalog row failed field validation before it was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - A second void row for the same original sale
    /// - Any UNIQUE index violation
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Referencing non-existent product_id
    /// - Referencing non-existent sale_id or payment_method_id
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed (CHECK constraints land here too).
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed to begin or commit.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

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
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
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

                // SQLite constraint messages:
                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                // FK constraint: "FOREIGN KEY constraint failed"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
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

// =============================================================================
// Engine Error
// =============================================================================

/// Errors returned by [`crate::SaleEngine`].
///
/// Rule violations keep their [`CoreError`] so the caller can match on the
/// exact kind. Anything that went wrong in storage after validation passed
/// surfaces as `Db`, and the transaction has been rolled back.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(DbError),
}

impl EngineError {
    /// Machine-readable error code.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Core(err) => err.kind(),
            EngineError::Db(_) => ErrorKind::Storage,
        }
    }
}

impl From<DbError> for EngineError {
    /// Lifts the storage errors that are really rule violations back into
    /// [`CoreError`].
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                EngineError::Core(CoreError::NotFound { entity, id })
            }
            DbError::StockUnderflow {
                product_id,
                available,
                delta,
            } => EngineError::Core(CoreError::InsufficientStock {
                product_id,
                available,
                requested: -delta,
            }),
            DbError::Validation(err) => EngineError::Core(err.into()),
            other => EngineError::Db(other),
        }
    }
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        DbError::from(err).into()
    }
}

/// Result type for sale engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_underflow_becomes_insufficient_stock() {
        let err: EngineError = DbError::StockUnderflow {
            product_id: "p-1".to_string(),
            available: 2,
            delta: -5,
        }
        .into();

        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        assert!(matches!(
            err,
            EngineError::Core(CoreError::InsufficientStock {
                available: 2,
                requested: 5,
                ..
            })
        ));
    }

    #[test]
    fn test_storage_errors_keep_storage_kind() {
        let err: EngineError = DbError::PoolExhausted.into();
        assert_eq!(err.kind(), ErrorKind::Storage);

        let err: EngineError = DbError::not_found("Sale", "s-1").into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Sale not found: s-1");
    }
}

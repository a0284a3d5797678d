//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)        Domain rule (CoreError)             │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliError (in the app) ← Error code + operator message                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Menu reports it and carries on                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Categories
//! ```text
//! Validation          → bad input, nothing was written
//! NotFound            → referenced id does not exist
//! InsufficientStock   → sale quantity exceeds stock, nothing was written
//! ReferentialIntegrity→ delete blocked by dependent sales
//! everything else     → storage failure (see DbError::is_storage)
//! ```

use bookstore_core::{CoreError, ValidationError};
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `get_by_id` returned nothing for an id the operation requires
    /// - Update/delete of an id that no longer exists
    /// - A book or customer referenced by a new sale is missing
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: i64 },

    /// Input failed validation before any write.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Sale quantity exceeds current stock.
    #[error("Insufficient stock for '{title}': available {available}, requested {requested}")]
    InsufficientStock {
        book_id: i64,
        title: String,
        available: i64,
        requested: i64,
    },

    /// Delete refused because other records still depend on this one.
    ///
    /// ## When This Occurs
    /// - Deleting a book that has sales
    /// - Deleting a customer that has sales
    /// - Deleting an author whose books have sales
    #[error("Cannot delete {entity} {id}: referenced by {dependents} sale(s)")]
    ReferentialIntegrity {
        entity: String,
        id: i64,
        dependents: i64,
    },

    /// Foreign key constraint violation raised by SQLite.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK / NOT NULL constraint violation raised by SQLite.
    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

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

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
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
    pub fn not_found(entity: impl Into<String>, id: i64) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id,
        }
    }

    /// True for persistence-layer failures (connectivity, constraints, SQL).
    ///
    /// Everything else is a recoverable input or rule problem.
    pub fn is_storage(&self) -> bool {
        !matches!(
            self,
            DbError::NotFound { .. }
                | DbError::Validation(_)
                | DbError::InsufficientStock { .. }
                | DbError::ReferentialIntegrity { .. }
        )
    }
}

impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, id } => DbError::not_found(entity, id),
            CoreError::InsufficientStock {
                book_id,
                title,
                available,
                requested,
            } => DbError::InsufficientStock {
                book_id,
                title,
                available,
                requested,
            },
            CoreError::Validation(e) => DbError::Validation(e),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::QueryFailed (callers use fetch_optional)
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::QueryFailed("expected row was not returned".to_string()),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // "FOREIGN KEY constraint failed"
                // "CHECK constraint failed: stock >= 0"
                // "NOT NULL constraint failed: books.title"
                if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("CHECK constraint failed")
                    || msg.contains("NOT NULL constraint failed")
                {
                    DbError::ConstraintViolation {
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

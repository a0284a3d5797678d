//! # CLI Error Type
//!
//! Unified error type for every command and menu action.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the CLI                                │
//! │                                                                         │
//! │  Command / menu action                                                  │
//! │  Result<T, CliError>                                                    │
//! │         │                                                               │
//! │         ├── DbError::NotFound ────────────► NOT_FOUND                  │
//! │         ├── DbError::Validation ──────────► VALIDATION_ERROR           │
//! │         ├── DbError::InsufficientStock ───► INSUFFICIENT_STOCK         │
//! │         ├── DbError::ReferentialIntegrity ► REFERENTIAL_INTEGRITY      │
//! │         ├── DbError::(storage) ───────────► STORAGE_ERROR (logged)     │
//! │         ├── ConfigError ──────────────────► CONFIG_ERROR               │
//! │         └── io / csv / json ──────────────► IO_ERROR                   │
//! │                                                                         │
//! │  subcommand mode:  "Error [NOT_FOUND]: Book not found: 7", exit 1      │
//! │  menu mode:        same line, then back to the menu                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage failures are logged with their detail and shown to the operator
//! with a generic message.

use serde::Serialize;
use std::fmt;

use bookstore_core::{CoreError, ValidationError};
use bookstore_db::DbError;

use crate::config::ConfigError;

/// Error returned by commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes, printed in brackets before the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    InsufficientStock,
    ReferentialIntegrity,
    StorageError,
    ConfigError,
    IoError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorCode::ReferentialIntegrity => "REFERENTIAL_INTEGRITY",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::IoError => "IO_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str, id: i64) -> Self {
        CliError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error [{}]: {}", self.code, self.message)
    }
}

impl std::error::Error for CliError {}

/// Converts database errors to CLI errors.
impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CliError::not_found(&entity, id),
            DbError::Validation(e) => CliError::validation(e.to_string()),
            e @ DbError::InsufficientStock { .. } => {
                CliError::new(ErrorCode::InsufficientStock, e.to_string())
            }
            e @ DbError::ReferentialIntegrity { .. } => {
                CliError::new(ErrorCode::ReferentialIntegrity, e.to_string())
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                CliError::new(ErrorCode::ReferentialIntegrity, "Invalid reference")
            }
            DbError::ConstraintViolation { message } => CliError::validation(message),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                CliError::new(ErrorCode::StorageError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                CliError::new(ErrorCode::StorageError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                CliError::new(ErrorCode::StorageError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                CliError::new(ErrorCode::StorageError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                CliError::new(ErrorCode::StorageError, "Database is busy, try again")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                CliError::new(ErrorCode::StorageError, "Database operation failed")
            }
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::from(DbError::from(err))
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::new(ErrorCode::IoError, err.to_string())
    }
}

impl From<csv::Error> for CliError {
    fn from(err: csv::Error) -> Self {
        CliError::new(ErrorCode::IoError, format!("CSV write failed: {}", err))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::new(ErrorCode::IoError, format!("JSON output failed: {}", err))
    }
}

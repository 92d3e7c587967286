//! # Store Error Types
//!
//! Error types for every `ProductStore` operation, whatever the backend.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError / CoreError (catalog-core)                            │
//! │  std::io::Error (flat file)        sqlx::Error (SQLite)                │
//! │       │                                  │                              │
//! │       └──────────────┬───────────────────┘                              │
//! │                      ▼                                                  │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │  ErrorKind (five-way taxonomy shared by both backends)                 │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │  CLI prints "Error: ..." and keeps looping                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::path::PathBuf;

use catalog_core::{CoreError, ValidationError};
use thiserror::Error;

/// The five failure classes callers may rely on, regardless of backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Precondition violated; raised before any I/O.
    InvalidArgument,
    /// A record the operation requires does not exist.
    NotFound,
    /// A basket asks for more units than recorded.
    InsufficientStock,
    /// The medium failed (I/O, connection, query, corrupt record).
    StorageFailure,
    /// A multi-step operation was rolled back part way through.
    ConsistencyFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::NotFound => "not found",
            ErrorKind::InsufficientStock => "insufficient stock",
            ErrorKind::StorageFailure => "storage failure",
            ErrorKind::ConsistencyFailure => "consistency failure",
        };
        f.write_str(name)
    }
}

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input failed a field rule.
    #[error("Invalid argument: {0}")]
    Validation(#[from] ValidationError),

    /// Entity not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Basket line exceeds recorded stock.
    #[error(
        "Insufficient stock for {product} in store {store_id}: available {available}, requested {requested}"
    )]
    InsufficientStock {
        product: String,
        store_id: i64,
        available: i64,
        requested: i64,
    },

    /// A multi-step operation was abandoned and every change undone.
    ///
    /// ## When This Occurs
    /// - A basket line names a product the store does not carry
    /// - A basket total overflows
    #[error("Transaction rolled back: {0}")]
    TransactionRolledBack(String),

    /// File system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A flat-file line could not be parsed.
    #[error("Corrupt record in {} at line {line}: {reason}", path.display())]
    CorruptRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created or opened
    /// - Invalid connection string
    /// - Pool closed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Maps the error onto the shared taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Validation(_) => ErrorKind::InvalidArgument,
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            StoreError::TransactionRolledBack(_) => ErrorKind::ConsistencyFailure,
            StoreError::Io(_)
            | StoreError::CorruptRecord { .. }
            | StoreError::ConnectionFailed(_)
            | StoreError::MigrationFailed(_)
            | StoreError::QueryFailed(_) => ErrorKind::StorageFailure,
        }
    }
}

/// Convert domain errors raised by basket math.
///
/// ```text
/// CoreError::Validation         → StoreError::Validation
/// CoreError::InsufficientStock  → StoreError::InsufficientStock
/// CoreError::ProductNotInStore  → StoreError::TransactionRolledBack
/// CoreError::TotalOverflow      → StoreError::TransactionRolledBack
/// ```
impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => StoreError::Validation(e),
            CoreError::InsufficientStock {
                product,
                store_id,
                available,
                requested,
            } => StoreError::InsufficientStock {
                product,
                store_id,
                available,
                requested,
            },
            other @ (CoreError::ProductNotInStore { .. } | CoreError::TotalOverflow { .. }) => {
                StoreError::TransactionRolledBack(other.to_string())
            }
        }
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → StoreError::NotFound
/// sqlx::Error::Database       → StoreError::QueryFailed
/// sqlx::Error::PoolTimedOut   → StoreError::ConnectionFailed
/// sqlx::Error::PoolClosed     → StoreError::ConnectionFailed
/// sqlx::Error::Io             → StoreError::ConnectionFailed
/// Other                       → StoreError::QueryFailed
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => StoreError::QueryFailed(db_err.message().to_string()),

            sqlx::Error::PoolTimedOut => {
                StoreError::ConnectionFailed("Timed out waiting for a connection".to_string())
            }

            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(io_err) => StoreError::ConnectionFailed(io_err.to_string()),

            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

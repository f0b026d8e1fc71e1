//! # Store and Ledger Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                │
//! │                                                                     │
//! │  SQLite Error (sqlx::Error)                                        │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  StoreError (this module) ← categorized persistence failure        │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  LedgerError ← what every coordinator operation returns:           │
//! │       │         NotFound | Validation | Store                      │
//! │       ▼                                                             │
//! │  Caller (UI / assistant) surfaces the message; no retry in core    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `Store` error means the transaction was rolled back and the whole
//! operation is treated as not-happened.

use thiserror::Error;

use esnaf_core::ValidationError;

// =============================================================================
// Store Error
// =============================================================================

/// Persistence failures from the underlying SQLite store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint violation.
    #[error("Duplicate {field}: already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
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

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → StoreError::PoolExhausted
/// Other                       → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // "UNIQUE constraint failed: <table>.<column>"
                // "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    StoreError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    StoreError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    StoreError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,

            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),

            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for raw store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Ledger Error
// =============================================================================

/// The error surface of every coordinator operation.
///
/// The three kinds map 1:1 to the system's failure modes:
/// - `NotFound`: a referenced entity does not exist; whole operation
///   aborted, no partial write (note: deletes of already-missing entities
///   are a successful no-op instead, by design)
/// - `Validation`: malformed input, rejected before any write
/// - `Store`: the atomic batch could not be committed; the operation is
///   treated as not-happened and the caller must retry or surface it
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("persistence failure: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        LedgerError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        LedgerError::Store(StoreError::from(err))
    }
}

/// Result type for coordinator operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = LedgerError::not_found("Customer", "abc-123");
        assert_eq!(err.to_string(), "Customer not found: abc-123");
    }

    #[test]
    fn test_validation_is_transparent() {
        let err: LedgerError = ValidationError::MustBePositive {
            field: "total".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "total must be positive");
        assert!(matches!(err, LedgerError::Validation(_)));
    }
}

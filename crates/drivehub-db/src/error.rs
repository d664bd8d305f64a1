//! # Store Errors
//!
//! What can go wrong between the repositories and SQLite.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)          CoreError (status rules)          │
//! │       │                                    │                            │
//! │       ▼                                    ▼                            │
//! │  DbError (this module) ← categorized, with entity context              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (storefront) ← code + message printed for the user           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use drivehub_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// ## When This Occurs
    /// - Owner edits or deletes an unknown vehicle id
    /// - Owner cancels an unknown booking id
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (e.g. re-inserting a backend booking id).
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Recording a booking for a vehicle that is not in the catalog
    /// - Deleting a vehicle that still has bookings
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Every pooled connection stayed busy past the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A stored row could not be turned back into a domain value.
    #[error("Corrupt {entity} row {id}: {reason}")]
    Corrupt {
        entity: String,
        id: String,
        reason: String,
    },

    /// A rental rule refused the change (e.g. cancelling a paid booking).
    #[error(transparent)]
    Rule(#[from] CoreError),

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// `DbError::not_found("Vehicle", id)`
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn corrupt(
        entity: impl Into<String>,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        DbError::Corrupt {
            entity: entity.into(),
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// SQLite reports constraint failures only as message text.
fn from_constraint_message(msg: &str) -> DbError {
    if let Some(column) = msg.strip_prefix("UNIQUE constraint failed: ") {
        // "bookings.id" → "id"
        let field = column.rsplit('.').next().unwrap_or(column);
        return DbError::duplicate(field, "existing row");
    }
    if msg.starts_with("FOREIGN KEY constraint failed") {
        return DbError::ForeignKeyViolation {
            message: msg.to_string(),
        };
    }
    DbError::QueryFailed(msg.to_string())
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "unknown"),
            sqlx::Error::Database(db_err) => from_constraint_message(db_err.message()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("store is closed".to_string()),
            sqlx::Error::ColumnDecode { index, source } => {
                DbError::corrupt("column", index, source.to_string())
            }
            other => DbError::Internal(other.to_string()),
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
    use drivehub_core::BookingStatus;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[test]
    fn test_constraint_messages() {
        let err = from_constraint_message("UNIQUE constraint failed: bookings.id");
        assert_eq!(err.to_string(), "Duplicate id: 'existing row' already exists");

        let err = from_constraint_message("FOREIGN KEY constraint failed");
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        let err = from_constraint_message("no such table: cars");
        assert!(matches!(err, DbError::QueryFailed(_)));
    }

    #[test]
    fn test_rule_errors_keep_their_message() {
        let err: DbError = CoreError::InvalidStatusTransition {
            booking_id: "bk-9".to_string(),
            from: BookingStatus::Confirmed,
            to: BookingStatus::Cancelled,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Booking bk-9 cannot move from confirmed to cancelled"
        );
    }
}

//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in DriveHub                               │
//! │                                                                         │
//! │  drivehub owner cancel-booking bk-1                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function -> Result<T, ApiError>                         │  │
//! │  │         │                                                        │  │
//! │  │  Not an owner? ──────── ApiError::forbidden ─────────────┐      │  │
//! │  │         │                                                 │      │  │
//! │  │  Database Error? ────── DbError::Rule(InvalidStatus...) ──┤      │  │
//! │  │         │                                                 ▼      │  │
//! │  │  Backend Error? ─────── ClientError::Backend ────────── ApiError│  │
//! │  │         │                                                        │  │
//! │  │  Success ───────────────────────────────────────────────► stdout│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: error: [BusinessLogic] Booking bk-1 cannot move from ...      │
//! │  --json: {"code":"BUSINESS_LOGIC","message":"Booking bk-1 ..."}        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal failures are logged with their detail and shown to the user
//! with a generic message.

use drivehub_client::ClientError;
use drivehub_core::{CoreError, ValidationError};
use drivehub_db::DbError;
use serde::Serialize;

/// Error returned from storefront commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Vehicle not found: car-42"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// A rental rule refused the action
    BusinessLogic,

    /// No one is signed in
    Unauthenticated,

    /// Signed in, but not allowed (owner-only command)
    Forbidden,

    /// The booking backend refused or could not be reached
    BackendError,

    /// Payment declined or failed
    PaymentError,

    /// Internal error
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn business(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BusinessLogic, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Forbidden, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::Rule(core) => ApiError::from(core),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(
                    ErrorCode::DatabaseError,
                    "The record changed while it was being updated, please retry",
                )
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Corrupt { entity, id, reason } => {
                tracing::error!(entity = %entity, id = %id, "Corrupt row: {}", reason);
                ApiError::new(ErrorCode::DatabaseError, "Stored data could not be read")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::VehicleNotFound(id) => ApiError::not_found("Vehicle", &id),
            CoreError::BookingNotFound(id) => ApiError::not_found("Booking", &id),
            e @ CoreError::InvalidStatusTransition { .. } => ApiError::business(e.to_string()),
            e @ CoreError::InvalidFlowTransition { .. } => ApiError::business(e.to_string()),
            e @ CoreError::NotPayable { .. } => ApiError::business(e.to_string()),
            e @ CoreError::PriceNotComputable => ApiError::validation(e.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts client errors to API errors.
impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Core(core) => ApiError::from(core),
            ClientError::NotAuthenticated => {
                ApiError::new(ErrorCode::Unauthenticated, "Please log in first")
            }
            ClientError::Backend { message } => ApiError::new(ErrorCode::BackendError, message),
            ClientError::Payment { message } => ApiError::new(ErrorCode::PaymentError, message),
            e @ (ClientError::ConnectionFailed(_) | ClientError::Timeout) => {
                tracing::error!("Backend unreachable: {}", e);
                ApiError::new(
                    ErrorCode::BackendError,
                    "Could not reach the booking service, please try again",
                )
            }
            e @ (ClientError::Http { .. } | ClientError::UnexpectedResponse(_)) => {
                tracing::error!("Backend call failed: {}", e);
                ApiError::new(ErrorCode::BackendError, "The booking service returned an error")
            }
            e @ (ClientError::InvalidConfig(_)
            | ClientError::InvalidUrl(_)
            | ClientError::ConfigLoadFailed(_)) => ApiError::validation(e.to_string()),
            ClientError::SessionStorage(e) => {
                tracing::error!("Session storage failed: {}", e);
                ApiError::internal("Could not access the saved session")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use drivehub_core::BookingStatus;

    #[test]
    fn test_db_rule_becomes_business_logic() {
        let err: ApiError = DbError::Rule(CoreError::InvalidStatusTransition {
            booking_id: "bk-1".to_string(),
            from: BookingStatus::Confirmed,
            to: BookingStatus::Cancelled,
        })
        .into();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(err.message, "Booking bk-1 cannot move from confirmed to cancelled");
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err: ApiError = DbError::QueryFailed("near \"SELEC\": syntax error".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("SELEC"));
    }

    #[test]
    fn test_client_errors() {
        let err: ApiError = ClientError::NotAuthenticated.into();
        assert_eq!(err.code, ErrorCode::Unauthenticated);

        let err: ApiError = ClientError::Backend {
            message: "Car is already booked".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::BackendError);
        assert_eq!(err.message, "Car is already booked");

        let err: ApiError = ClientError::Core(CoreError::Validation(ValidationError::MissingDates)).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_display_and_json() {
        let err = ApiError::not_found("Vehicle", "car-42");
        assert_eq!(err.to_string(), "[NotFound] Vehicle not found: car-42");

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
    }
}

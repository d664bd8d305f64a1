//! # Error Types
//!
//! Domain-specific error types for drivehub-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  drivehub-core errors (this file)                                      │
//! │  ├── CoreError        - Rental rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  drivehub-db errors          drivehub-client errors                    │
//! │  └── DbError                 └── ClientError                           │
//! │                                                                         │
//! │  Storefront errors (in app)                                            │
//! │  └── ApiError         - What the user sees (code + message)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError/ClientError → ApiError    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation errors never reach the network: the booking flow checks dates
//! locally before anything is submitted.

use thiserror::Error;

use crate::types::BookingStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core rental logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Vehicle cannot be found in the catalog.
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),

    /// Booking cannot be found.
    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    /// Requested booking status change is not allowed.
    ///
    /// ## When This Occurs
    /// - Cancelling a booking that is already confirmed or paid
    /// - Moving a paid booking back to pending
    /// - Any change to a cancelled booking
    ///
    /// ## User Workflow
    /// ```text
    /// Owner clicks "Cancel" on booking (status: confirmed)
    ///      │
    ///      ▼
    /// BookingStatus::Confirmed.can_transition_to(Cancelled) → false
    ///      │
    ///      ▼
    /// InvalidStatusTransition { from: Confirmed, to: Cancelled }
    /// ```
    #[error("Booking {booking_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        booking_id: String,
        from: BookingStatus,
        to: BookingStatus,
    },

    /// Payment was requested for a booking that is not confirmed, or the
    /// backend echoed a new booking in a status that cannot be paid.
    #[error("Booking {booking_id} is {status} and cannot be paid")]
    NotPayable {
        booking_id: String,
        status: BookingStatus,
    },

    /// Booking flow received an event that does not apply to its state.
    #[error("Cannot {action} while booking flow is {state}")]
    InvalidFlowTransition { action: String, state: String },

    /// Price could not be computed (missing dates or non-positive duration).
    #[error("Price is not computable for the selected dates")]
    PriceNotComputable,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Amount above the accepted ceiling.
    #[error("{field} must be at most {max}")]
    AboveMaximum { field: String, max: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., unparseable date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Pickup/return pair is not a valid rental period.
    #[error("{reason}")]
    InvalidDateRange { reason: DateRangeProblem },

    /// One or both booking dates are missing.
    #[error("Please select both pickup and return dates")]
    MissingDates,
}

/// Why a pickup/return pair was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangeProblem {
    /// Pickup date is before today.
    PickupInPast,
    /// Return date is on or before the pickup date.
    ReturnNotAfterPickup,
}

impl std::fmt::Display for DateRangeProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateRangeProblem::PickupInPast => write!(f, "Pickup date cannot be in the past"),
            DateRangeProblem::ReturnNotAfterPickup => {
                write!(f, "Return date must be after pickup date")
            }
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidStatusTransition {
            booking_id: "bk-1".to_string(),
            from: BookingStatus::Paid,
            to: BookingStatus::Pending,
        };
        assert_eq!(err.to_string(), "Booking bk-1 cannot move from paid to pending");

        let err = CoreError::NotPayable {
            booking_id: "bk-2".to_string(),
            status: BookingStatus::Cancelled,
        };
        assert_eq!(err.to_string(), "Booking bk-2 is cancelled and cannot be paid");
    }

    #[test]
    fn test_date_range_messages() {
        let err = ValidationError::InvalidDateRange {
            reason: DateRangeProblem::PickupInPast,
        };
        assert_eq!(err.to_string(), "Pickup date cannot be in the past");

        let err = ValidationError::InvalidDateRange {
            reason: DateRangeProblem::ReturnNotAfterPickup,
        };
        assert_eq!(err.to_string(), "Return date must be after pickup date");

        assert_eq!(
            ValidationError::MissingDates.to_string(),
            "Please select both pickup and return dates"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "brand".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

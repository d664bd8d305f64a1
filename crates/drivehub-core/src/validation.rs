//! # Validation Module
//!
//! Input validation for bookings and owner listings.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI parsing (clap)                                           │
//! │  ├── Dates parse as YYYY-MM-DD                                         │
//! │  └── Numbers parse as numbers                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Booking date range (pickup >= today, return > pickup)             │
//! │  └── Add-car form rules (required fields, year range, price > 0)       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here reads the clock: "today" and the current year come from the
//! caller.
//!
//! ## Usage
//! ```rust
//! use chrono::NaiveDate;
//! use drivehub_core::validation::validate_date_range;
//!
//! let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let pickup = NaiveDate::from_ymd_opt(2025, 1, 2);
//! let ret = NaiveDate::from_ymd_opt(2025, 1, 5);
//!
//! assert!(validate_date_range(pickup, ret, today).is_ok());
//! assert!(validate_date_range(ret, pickup, today).is_err());
//! ```

use chrono::NaiveDate;

use crate::error::{DateRangeProblem, ValidationError};
use crate::money::Money;
use crate::types::{NewVehicle, VehicleUpdate};
use crate::MIN_VEHICLE_YEAR;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest free-text search accepted.
const MAX_QUERY_LEN: usize = 100;

/// Longest brand/model/location accepted.
const MAX_NAME_LEN: usize = 100;

/// Highest daily rate an owner may list. Keeps rental totals far from
/// the `i64` cent range.
pub const MAX_DAILY_RATE: Money = Money::from_major(100_000);

// =============================================================================
// Booking Dates
// =============================================================================

/// Validates a pickup/return pair for a new booking.
///
/// ## Rules
/// - Both dates must be present
/// - Pickup must not precede `today`
/// - Return must strictly follow pickup
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Booking form: "Book Now"                                               │
/// │                                                                         │
/// │  validate_date_range(pickup, return, today) ← THIS FUNCTION            │
/// │       │                                                                 │
/// │       ├── missing?        → "Please select both pickup and return dates"│
/// │       ├── pickup < today? → "Pickup date cannot be in the past"         │
/// │       ├── return <= pickup? → "Return date must be after pickup date"   │
/// │       │                                                                 │
/// │       └── OK → (pickup, return) handed to the booking flow              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_date_range(
    pickup: Option<NaiveDate>,
    return_date: Option<NaiveDate>,
    today: NaiveDate,
) -> ValidationResult<(NaiveDate, NaiveDate)> {
    let (pickup, return_date) = match (pickup, return_date) {
        (Some(p), Some(r)) => (p, r),
        _ => return Err(ValidationError::MissingDates),
    };

    if pickup < today {
        return Err(ValidationError::InvalidDateRange {
            reason: DateRangeProblem::PickupInPast,
        });
    }

    if return_date <= pickup {
        return Err(ValidationError::InvalidDateRange {
            reason: DateRangeProblem::ReturnNotAfterPickup,
        });
    }

    Ok((pickup, return_date))
}

/// Parses a `YYYY-MM-DD` date typed by the user.
pub fn parse_booking_date(field: &str, input: &str) -> ValidationResult<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected YYYY-MM-DD".to_string(),
    })
}

// =============================================================================
// Vehicle Listings
// =============================================================================

fn require_text(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if value.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

fn validate_year(year: i32, current_year: i32) -> ValidationResult<()> {
    if year < MIN_VEHICLE_YEAR || year > current_year {
        return Err(ValidationError::OutOfRange {
            field: "year".to_string(),
            min: MIN_VEHICLE_YEAR as i64,
            max: current_year as i64,
        });
    }
    Ok(())
}

fn validate_features(features: &[String]) -> ValidationResult<()> {
    if !features.iter().any(|f| !f.trim().is_empty()) {
        return Err(ValidationError::Required {
            field: "features".to_string(),
        });
    }
    Ok(())
}

fn validate_daily_rate(rate: Money) -> ValidationResult<()> {
    if !rate.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }
    if rate > MAX_DAILY_RATE {
        return Err(ValidationError::AboveMaximum {
            field: "price".to_string(),
            max: MAX_DAILY_RATE.to_string(),
        });
    }
    Ok(())
}

/// Validates the owner's add-car form.
///
/// ## Rules
/// - Brand, model, location and description are required
/// - At least one feature
/// - Year between [`MIN_VEHICLE_YEAR`] and `current_year`
/// - Daily rate positive and at most [`MAX_DAILY_RATE`]
/// - Seating capacity must be positive
pub fn validate_new_vehicle(vehicle: &NewVehicle, current_year: i32) -> ValidationResult<()> {
    require_text("brand", &vehicle.brand)?;
    require_text("model", &vehicle.model)?;
    require_text("location", &vehicle.location)?;

    if vehicle.description.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    validate_year(vehicle.year, current_year)?;

    validate_daily_rate(vehicle.daily_rate)?;

    if vehicle.seating_capacity == 0 {
        return Err(ValidationError::MustBePositive {
            field: "seating_capacity".to_string(),
        });
    }

    validate_features(&vehicle.features)
}

/// Validates an owner edit. Only the fields being changed are checked.
pub fn validate_vehicle_update(update: &VehicleUpdate, current_year: i32) -> ValidationResult<()> {
    if let Some(brand) = &update.brand {
        require_text("brand", brand)?;
    }
    if let Some(model) = &update.model {
        require_text("model", model)?;
    }
    if let Some(location) = &update.location {
        require_text("location", location)?;
    }
    if let Some(year) = update.year {
        validate_year(year, current_year)?;
    }
    if let Some(rate) = update.daily_rate {
        validate_daily_rate(rate)?;
    }
    if update.seating_capacity == Some(0) {
        return Err(ValidationError::MustBePositive {
            field: "seating_capacity".to_string(),
        });
    }
    if let Some(features) = &update.features {
        validate_features(features)?;
    }
    Ok(())
}

// =============================================================================
// Search
// =============================================================================

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (matches everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FuelType, Transmission, VehicleCategory};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn form() -> NewVehicle {
        NewVehicle {
            brand: "BMW".to_string(),
            model: "X5".to_string(),
            year: 2022,
            category: VehicleCategory::Suv,
            daily_rate: Money::from_major(300),
            seating_capacity: 5,
            fuel_type: FuelType::Diesel,
            transmission: Transmission::Automatic,
            location: "New York".to_string(),
            description: "Luxury SUV".to_string(),
            image: None,
            features: vec!["GPS".to_string()],
        }
    }

    #[test]
    fn test_date_range_accepts_today_pickup() {
        let today = date(2025, 1, 1);
        let result = validate_date_range(Some(today), Some(date(2025, 1, 2)), today);
        assert_eq!(result.unwrap(), (today, date(2025, 1, 2)));
    }

    #[test]
    fn test_date_range_rejects_past_pickup() {
        let today = date(2025, 1, 10);
        let err = validate_date_range(Some(date(2025, 1, 9)), Some(date(2025, 1, 12)), today)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidDateRange {
                reason: DateRangeProblem::PickupInPast
            }
        );
    }

    #[test]
    fn test_date_range_rejects_same_day_return() {
        let today = date(2025, 1, 1);
        let err = validate_date_range(Some(date(2025, 1, 3)), Some(date(2025, 1, 3)), today)
            .unwrap_err();
        assert_eq!(err.to_string(), "Return date must be after pickup date");

        let err = validate_date_range(Some(date(2025, 1, 3)), Some(date(2025, 1, 2)), today)
            .unwrap_err();
        assert_eq!(err.to_string(), "Return date must be after pickup date");
    }

    #[test]
    fn test_date_range_missing() {
        let today = date(2025, 1, 1);
        assert_eq!(
            validate_date_range(None, Some(today), today).unwrap_err(),
            ValidationError::MissingDates
        );
        assert_eq!(
            validate_date_range(Some(today), None, today).unwrap_err(),
            ValidationError::MissingDates
        );
    }

    #[test]
    fn test_parse_booking_date() {
        assert_eq!(parse_booking_date("pickup", "2025-03-07").unwrap(), date(2025, 3, 7));
        assert!(matches!(
            parse_booking_date("pickup", "07/03/2025"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_booking_date("pickup", "  "),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_new_vehicle_valid() {
        assert!(validate_new_vehicle(&form(), 2025).is_ok());
    }

    #[test]
    fn test_new_vehicle_requires_a_feature() {
        let mut v = form();
        v.features.clear();
        assert_eq!(
            validate_new_vehicle(&v, 2025).unwrap_err(),
            ValidationError::Required {
                field: "features".to_string()
            }
        );

        v.features = vec!["  ".to_string()];
        assert!(validate_new_vehicle(&v, 2025).is_err());
    }

    #[test]
    fn test_new_vehicle_year_bounds() {
        let mut v = form();
        v.year = 1899;
        assert!(matches!(
            validate_new_vehicle(&v, 2025),
            Err(ValidationError::OutOfRange { .. })
        ));
        v.year = 2026;
        assert!(validate_new_vehicle(&v, 2025).is_err());
        v.year = 1900;
        assert!(validate_new_vehicle(&v, 2025).is_ok());
    }

    #[test]
    fn test_new_vehicle_price_and_seats() {
        let mut v = form();
        v.daily_rate = Money::zero();
        assert!(matches!(
            validate_new_vehicle(&v, 2025),
            Err(ValidationError::MustBePositive { .. })
        ));

        let mut v = form();
        v.seating_capacity = 0;
        assert!(validate_new_vehicle(&v, 2025).is_err());
    }

    #[test]
    fn test_daily_rate_ceiling() {
        let mut v = form();
        v.daily_rate = MAX_DAILY_RATE;
        assert!(validate_new_vehicle(&v, 2025).is_ok());

        v.daily_rate = Money::from_cents(MAX_DAILY_RATE.cents() + 1);
        assert_eq!(
            validate_new_vehicle(&v, 2025).unwrap_err().to_string(),
            "price must be at most $100000.00"
        );

        let update = VehicleUpdate {
            daily_rate: Money::from_wire_amount(1e16),
            ..Default::default()
        };
        assert!(matches!(
            validate_vehicle_update(&update, 2025),
            Err(ValidationError::AboveMaximum { .. })
        ));
    }

    #[test]
    fn test_new_vehicle_required_text() {
        let mut v = form();
        v.brand = "   ".to_string();
        assert_eq!(
            validate_new_vehicle(&v, 2025).unwrap_err(),
            ValidationError::Required {
                field: "brand".to_string()
            }
        );
    }

    #[test]
    fn test_vehicle_update_checks_only_set_fields() {
        assert!(validate_vehicle_update(&VehicleUpdate::default(), 2025).is_ok());

        let update = VehicleUpdate {
            daily_rate: Some(Money::from_cents(-1)),
            ..Default::default()
        };
        assert!(validate_vehicle_update(&update, 2025).is_err());

        let update = VehicleUpdate {
            features: Some(vec![]),
            ..Default::default()
        };
        assert!(validate_vehicle_update(&update, 2025).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  bmw ").unwrap(), "bmw");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"a".repeat(101)).is_err());
    }
}

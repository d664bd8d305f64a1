//! # Booking Calculator
//!
//! Turns a pickup/return pair and a daily rate into a [`Quote`].
//!
//! ```text
//!   pickup ─┐
//!           ├──► rental_days() = ceil((return - pickup) / 24h)
//!   return ─┘            │
//!                        ├── days <= 0, a date missing or an overflowing
//!                        │   total ──► Quote::NotComputable
//!                        │
//!                        └── days > 0 ──► Quote::Priced { days, total = rate × days }
//! ```
//!
//! Pure and cheap: the storefront calls it every time a date changes.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

const SECONDS_PER_DAY: i64 = 86_400;

/// Result of pricing a rental period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Quote {
    /// A date is missing, the period is not positive, or the total does
    /// not fit in cents.
    ///
    /// Displayed as a zero total, but it is NOT a free booking.
    NotComputable,

    /// A bookable period.
    Priced { days: i64, total: Money },
}

impl Quote {
    /// Number of rental days, if computable.
    pub fn days(&self) -> Option<i64> {
        match self {
            Quote::Priced { days, .. } => Some(*days),
            Quote::NotComputable => None,
        }
    }

    /// Total price, if computable.
    pub fn total(&self) -> Option<Money> {
        match self {
            Quote::Priced { total, .. } => Some(*total),
            Quote::NotComputable => None,
        }
    }

    /// Total for display: zero when not computable.
    pub fn total_or_zero(&self) -> Money {
        self.total().unwrap_or_default()
    }

    pub fn is_computable(&self) -> bool {
        matches!(self, Quote::Priced { .. })
    }

    /// Days and total, or [`CoreError::PriceNotComputable`].
    pub fn require(&self) -> CoreResult<(i64, Money)> {
        match self {
            Quote::Priced { days, total } => Ok((*days, *total)),
            Quote::NotComputable => Err(CoreError::PriceNotComputable),
        }
    }
}

/// Whole rental days in a signed duration, rounded up.
///
/// A partial day counts as a full day. Zero or negative durations come back
/// as-is (truncated), so callers can reject them.
///
/// ## Example
/// ```rust
/// use chrono::Duration;
/// use drivehub_core::pricing::rental_days;
///
/// assert_eq!(rental_days(Duration::days(3)), 3);
/// assert_eq!(rental_days(Duration::hours(25)), 2);
/// assert_eq!(rental_days(Duration::zero()), 0);
/// ```
pub fn rental_days(duration: Duration) -> i64 {
    let secs = duration.num_seconds();
    if secs > 0 {
        (secs + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
    } else {
        secs / SECONDS_PER_DAY
    }
}

/// Prices a booking from calendar dates.
///
/// ## User Workflow
/// ```text
/// Vehicle: Toyota Corolla $50.00/day
/// Pickup 2025-01-01, Return 2025-01-04
///      │
///      ▼
/// quote(...) ← THIS FUNCTION
///      │
///      ▼
/// Quote::Priced { days: 3, total: $150.00 }
/// ```
pub fn quote(pickup: Option<NaiveDate>, return_date: Option<NaiveDate>, daily_rate: Money) -> Quote {
    match (pickup, return_date) {
        (Some(p), Some(r)) => price_days(rental_days(r.signed_duration_since(p)), daily_rate),
        _ => Quote::NotComputable,
    }
}

fn price_days(days: i64, daily_rate: Money) -> Quote {
    if days <= 0 {
        return Quote::NotComputable;
    }
    match daily_rate.multiply_days(days) {
        Some(total) => Quote::Priced { days, total },
        None => Quote::NotComputable,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

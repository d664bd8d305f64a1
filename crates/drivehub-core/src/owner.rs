//! # Owner Views
//!
//! Filtering, sorting and the dashboard summary for the owner panel.
//!
//! ```text
//!   vehicles ──► VehicleFilter { search, category } ──► VehicleSort ──► table
//!   bookings ──► BookingFilter { search, status }   ─────────────────► table
//!   vehicles + bookings ──► DashboardSummary::compute ──────────────► cards
//! ```
//!
//! Search is a case-insensitive substring match on brand or model, ANDed
//! with the selector. A `None` selector means "all".

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Booking, BookingStatus, Vehicle, VehicleCategory};

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn normalize(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

// =============================================================================
// Vehicle Filter & Sort
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleFilter {
    pub search: Option<String>,
    pub category: Option<VehicleCategory>,
}

impl VehicleFilter {
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        let search_ok = match normalize(&self.search) {
            Some(needle) => {
                contains_ci(&vehicle.brand, &needle) || contains_ci(&vehicle.model, &needle)
            }
            None => true,
        };
        let category_ok = self.category.map_or(true, |c| vehicle.category == c);
        search_ok && category_ok
    }

    /// Returns the matching vehicles in input order.
    pub fn apply<'a>(&self, vehicles: &'a [Vehicle]) -> Vec<&'a Vehicle> {
        vehicles.iter().filter(|v| self.matches(v)).collect()
    }
}

/// Catalog sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum VehicleSort {
    PriceAsc,
    PriceDesc,
    YearAsc,
    YearDesc,
}

impl VehicleSort {
    /// Stable sort: vehicles that tie keep their relative order.
    pub fn sort(&self, vehicles: &mut [&Vehicle]) {
        match self {
            VehicleSort::PriceAsc => vehicles.sort_by_key(|v| v.daily_rate),
            VehicleSort::PriceDesc => vehicles.sort_by(|a, b| b.daily_rate.cmp(&a.daily_rate)),
            VehicleSort::YearAsc => vehicles.sort_by_key(|v| v.year),
            VehicleSort::YearDesc => vehicles.sort_by(|a, b| b.year.cmp(&a.year)),
        }
    }
}

impl FromStr for VehicleSort {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price-asc" => Ok(VehicleSort::PriceAsc),
            "price-desc" => Ok(VehicleSort::PriceDesc),
            "year-asc" => Ok(VehicleSort::YearAsc),
            "year-desc" => Ok(VehicleSort::YearDesc),
            _ => Err(ValidationError::NotAllowed {
                field: "sort".to_string(),
                allowed: ["price-asc", "price-desc", "year-asc", "year-desc"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            }),
        }
    }
}

/// Filters then (optionally) sorts the owner's catalog table.
pub fn owner_vehicle_view<'a>(
    vehicles: &'a [Vehicle],
    filter: &VehicleFilter,
    sort: Option<VehicleSort>,
) -> Vec<&'a Vehicle> {
    let mut rows = filter.apply(vehicles);
    if let Some(sort) = sort {
        sort.sort(&mut rows);
    }
    rows
}

// =============================================================================
// Booking Filter
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingFilter {
    pub search: Option<String>,
    pub status: Option<BookingStatus>,
}

impl BookingFilter {
    /// Search runs on the booked car's brand/model.
    pub fn matches(&self, booking: &Booking) -> bool {
        let search_ok = match normalize(&self.search) {
            Some(needle) => {
                contains_ci(&booking.vehicle_brand, &needle)
                    || contains_ci(&booking.vehicle_model, &needle)
            }
            None => true,
        };
        let status_ok = self.status.map_or(true, |s| booking.status == s);
        search_ok && status_ok
    }

    pub fn apply<'a>(&self, bookings: &'a [Booking]) -> Vec<&'a Booking> {
        bookings.iter().filter(|b| self.matches(b)).collect()
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// Headline numbers for the owner dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    pub total_cars: usize,
    pub available_cars: usize,
    pub total_bookings: usize,
    pub pending_bookings: usize,
    pub confirmed_bookings: usize,
    /// Sum of confirmed and paid booking totals.
    pub revenue: Money,
}

impl DashboardSummary {
    pub fn compute(vehicles: &[Vehicle], bookings: &[Booking]) -> Self {
        let count = |status: BookingStatus| bookings.iter().filter(|b| b.status == status).count();

        Self {
            total_cars: vehicles.len(),
            available_cars: vehicles.iter().filter(|v| v.is_available).count(),
            total_bookings: bookings.len(),
            pending_bookings: count(BookingStatus::Pending),
            confirmed_bookings: count(BookingStatus::Confirmed),
            revenue: bookings
                .iter()
                .filter(|b| matches!(b.status, BookingStatus::Confirmed | BookingStatus::Paid))
                .map(|b| b.total_price)
                .sum(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # drivehub-core: Pure Rental Logic for DriveHub
//!
//! This crate is the **heart** of DriveHub. It contains the rental rules as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        DriveHub Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Storefront (drivehub CLI)                      │   │
//! │  │    cars ──► quote ──► book ──► pay ──► bookings / owner ...     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ drivehub-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌───────────┐ ┌─────────┐ ┌────────┐  │   │
//! │  │  │  types  │ │ pricing │ │ lifecycle │ │  owner  │ │ recom- │  │   │
//! │  │  │ Vehicle │ │  Quote  │ │BookingFlow│ │ filter  │ │ mend   │  │   │
//! │  │  │ Booking │ │  days   │ │  states   │ │  sort   │ │ rules  │  │   │
//! │  │  └─────────┘ └─────────┘ └───────────┘ └─────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO CLOCK • PURE FUNCTIONS │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                │                                   │                    │
//! │  ┌─────────────▼───────────────┐   ┌───────────────▼────────────────┐  │
//! │  │  drivehub-db (SQLite)       │   │  drivehub-client (REST)        │  │
//! │  │  catalog, booking ledger    │   │  backend, session, payment     │  │
//! │  └─────────────────────────────┘   └────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Vehicle, Booking, User, status enums)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - The booking calculator (rental days × daily rate)
//! - [`validation`] - Date range and new-vehicle validation
//! - [`lifecycle`] - Booking flow state machine
//! - [`owner`] - Owner panel filtering, sorting and dashboard summary
//! - [`catalog`] - Public catalog search
//! - [`recommend`] - Rule-based vehicle recommendations
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use drivehub_core::money::Money;
//! use drivehub_core::pricing::quote;
//!
//! let pickup = NaiveDate::from_ymd_opt(2025, 1, 1);
//! let ret = NaiveDate::from_ymd_opt(2025, 1, 4);
//!
//! let q = quote(pickup, ret, Money::from_major(50));
//! assert_eq!(q.days(), Some(3));
//! assert_eq!(q.total_or_zero(), Money::from_major(150));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod lifecycle;
pub mod money;
pub mod owner;
pub mod pricing;
pub mod recommend;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Earliest model year accepted for a listed vehicle.
///
/// ## Business Reason
/// Anything older is almost certainly a typo in the add-car form.
pub const MIN_VEHICLE_YEAR: i32 = 1900;

/// Vehicle features offered as checkboxes in the owner's add-car form.
///
/// Owners may still enter custom features; this list only seeds the form.
pub const FEATURE_OPTIONS: &[&str] = &[
    "GPS",
    "Bluetooth",
    "Air Conditioning",
    "Heated Seats",
    "Sunroof",
    "Backup Camera",
    "Cruise Control",
    "Apple CarPlay",
    "Android Auto",
    "Keyless Entry",
];

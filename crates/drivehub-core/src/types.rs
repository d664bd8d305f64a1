//! # Domain Types
//!
//! Core domain types used throughout DriveHub.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Vehicle      │   │    Booking      │   │     User        │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  vehicle_id     │   │  id             │       │
//! │  │  brand, model   │   │  pickup_date    │   │  name, email    │       │
//! │  │  category       │   │  return_date    │   │  role           │       │
//! │  │  daily_rate     │   │  total_price    │   └─────────────────┘       │
//! │  │  features       │   │  status         │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ VehicleCategory │   │ BookingStatus   │   │     Role        │       │
//! │  │  Suv, Sedan,    │   │  Pending        │   │  Renter ("user")│       │
//! │  │  Hatchback, ... │   │  Confirmed      │   │  Owner          │       │
//! │  └─────────────────┘   │  Paid           │   └─────────────────┘       │
//! │                        │  Cancelled      │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Vehicle Category
// =============================================================================

/// Body type of a vehicle. Drives owner filtering and recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum VehicleCategory {
    Suv,
    Sedan,
    Hatchback,
    Coupe,
    Convertible,
    Truck,
    Van,
}

impl VehicleCategory {
    /// All categories, in the order the owner panel lists them.
    pub const ALL: [VehicleCategory; 7] = [
        VehicleCategory::Suv,
        VehicleCategory::Sedan,
        VehicleCategory::Hatchback,
        VehicleCategory::Coupe,
        VehicleCategory::Convertible,
        VehicleCategory::Truck,
        VehicleCategory::Van,
    ];

    /// Human-readable label ("SUV", "Sedan", ...).
    pub fn label(&self) -> &'static str {
        match self {
            VehicleCategory::Suv => "SUV",
            VehicleCategory::Sedan => "Sedan",
            VehicleCategory::Hatchback => "Hatchback",
            VehicleCategory::Coupe => "Coupe",
            VehicleCategory::Convertible => "Convertible",
            VehicleCategory::Truck => "Truck",
            VehicleCategory::Van => "Van",
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VehicleCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "suv" => Ok(VehicleCategory::Suv),
            "sedan" => Ok(VehicleCategory::Sedan),
            "hatchback" => Ok(VehicleCategory::Hatchback),
            "coupe" => Ok(VehicleCategory::Coupe),
            "convertible" => Ok(VehicleCategory::Convertible),
            "truck" => Ok(VehicleCategory::Truck),
            "van" => Ok(VehicleCategory::Van),
            _ => Err(ValidationError::NotAllowed {
                field: "category".to_string(),
                allowed: VehicleCategory::ALL
                    .iter()
                    .map(|c| c.label().to_lowercase())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Fuel Type & Transmission
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FuelType::Petrol => "Petrol",
            FuelType::Diesel => "Diesel",
            FuelType::Electric => "Electric",
            FuelType::Hybrid => "Hybrid",
        };
        f.write_str(s)
    }
}

impl FromStr for FuelType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "petrol" | "gasoline" | "gas" => Ok(FuelType::Petrol),
            "diesel" => Ok(FuelType::Diesel),
            "electric" | "ev" => Ok(FuelType::Electric),
            "hybrid" => Ok(FuelType::Hybrid),
            _ => Err(ValidationError::NotAllowed {
                field: "fuel_type".to_string(),
                allowed: vec![
                    "petrol".to_string(),
                    "diesel".to_string(),
                    "electric".to_string(),
                    "hybrid".to_string(),
                ],
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Transmission {
    Automatic,
    Manual,
    SemiAutomatic,
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Transmission::Automatic => "Automatic",
            Transmission::Manual => "Manual",
            Transmission::SemiAutomatic => "Semi-Automatic",
        };
        f.write_str(s)
    }
}

impl FromStr for Transmission {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "automatic" | "auto" => Ok(Transmission::Automatic),
            "manual" => Ok(Transmission::Manual),
            "semi_automatic" | "semiautomatic" => Ok(Transmission::SemiAutomatic),
            _ => Err(ValidationError::NotAllowed {
                field: "transmission".to_string(),
                allowed: vec![
                    "automatic".to_string(),
                    "manual".to_string(),
                    "semi_automatic".to_string(),
                ],
            }),
        }
    }
}

// =============================================================================
// Vehicle
// =============================================================================

/// A vehicle listed for rent.
///
/// Immutable from the booking flow's perspective; only the owner panel
/// edits or deletes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Vehicle {
    /// Unique identifier.
    pub id: String,

    /// Owner who listed the vehicle.
    pub owner_id: Option<String>,

    pub brand: String,
    pub model: String,
    pub year: i32,
    pub category: VehicleCategory,

    /// Price per rental day.
    pub daily_rate: Money,

    pub seating_capacity: u32,
    pub fuel_type: FuelType,
    pub transmission: Transmission,

    /// Pick-up location shown to renters.
    pub location: String,
    pub description: String,

    /// Image URL or asset path.
    pub image: Option<String>,

    /// Whether the vehicle can currently be booked.
    pub is_available: bool,

    /// Features such as "GPS" or "Bluetooth".
    pub features: Vec<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// "Brand Model", as shown on cards and in booking lists.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

/// Fields an owner may change on an existing vehicle.
///
/// `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VehicleUpdate {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub category: Option<VehicleCategory>,
    pub daily_rate: Option<Money>,
    pub seating_capacity: Option<u32>,
    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_available: Option<bool>,
    pub features: Option<Vec<String>>,
}

impl VehicleUpdate {
    /// Returns true if no field would change.
    pub fn is_empty(&self) -> bool {
        *self == VehicleUpdate::default()
    }

    /// Applies the set fields to `vehicle`, leaving the rest untouched.
    pub fn apply_to(&self, vehicle: &mut Vehicle) {
        if let Some(v) = &self.brand {
            vehicle.brand = v.clone();
        }
        if let Some(v) = &self.model {
            vehicle.model = v.clone();
        }
        if let Some(v) = self.year {
            vehicle.year = v;
        }
        if let Some(v) = self.category {
            vehicle.category = v;
        }
        if let Some(v) = self.daily_rate {
            vehicle.daily_rate = v;
        }
        if let Some(v) = self.seating_capacity {
            vehicle.seating_capacity = v;
        }
        if let Some(v) = self.fuel_type {
            vehicle.fuel_type = v;
        }
        if let Some(v) = self.transmission {
            vehicle.transmission = v;
        }
        if let Some(v) = &self.location {
            vehicle.location = v.clone();
        }
        if let Some(v) = &self.description {
            vehicle.description = v.clone();
        }
        if let Some(v) = &self.image {
            vehicle.image = Some(v.clone());
        }
        if let Some(v) = self.is_available {
            vehicle.is_available = v;
        }
        if let Some(v) = &self.features {
            vehicle.features = v.clone();
        }
    }
}

/// Input for listing a new vehicle (the owner's add-car form).
///
/// Validate with [`crate::validation::validate_new_vehicle`] before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewVehicle {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub category: VehicleCategory,
    pub daily_rate: Money,
    pub seating_capacity: u32,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub location: String,
    pub description: String,
    pub image: Option<String>,
    pub features: Vec<String>,
}

impl NewVehicle {
    /// Builds the stored vehicle. New listings start out available.
    pub fn into_vehicle(
        self,
        id: String,
        owner_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Vehicle {
        Vehicle {
            id,
            owner_id,
            brand: self.brand.trim().to_string(),
            model: self.model.trim().to_string(),
            year: self.year,
            category: self.category,
            daily_rate: self.daily_rate,
            seating_capacity: self.seating_capacity,
            fuel_type: self.fuel_type,
            transmission: self.transmission,
            location: self.location.trim().to_string(),
            description: self.description.trim().to_string(),
            image: self.image,
            is_available: true,
            features: self.features,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Booking Status
// =============================================================================

/// The status of a booking.
///
/// ## Allowed Transitions
/// ```text
///   Pending ──► Confirmed ──► Paid        (terminal)
///      │
///      └──────► Cancelled                 (terminal)
/// ```
/// Status never regresses. Cancellation is only possible while pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Created, awaiting confirmation.
    Pending,
    /// Accepted; awaiting payment.
    Confirmed,
    /// Payment collaborator reported success.
    Paid,
    /// Withdrawn while still pending.
    Cancelled,
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Paid,
        BookingStatus::Cancelled,
    ];

    /// Returns true if `next` is a legal move from this status.
    ///
    /// Re-applying the current status is not a transition.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Paid)
        )
    }

    /// Paid and cancelled bookings accept no further changes.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Paid | BookingStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Paid => "paid",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "paid" => Ok(BookingStatus::Paid),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: BookingStatus::ALL
                    .iter()
                    .map(|s| s.as_str().to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Booking
// =============================================================================

/// A renter's reservation of a vehicle for a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Booking {
    pub id: String,
    pub vehicle_id: String,

    /// Renter who created the booking.
    pub user_id: Option<String>,

    /// Vehicle brand at booking time (owner search runs on it).
    pub vehicle_brand: String,

    /// Vehicle model at booking time.
    pub vehicle_model: String,

    #[ts(as = "String")]
    pub pickup_date: NaiveDate,

    #[ts(as = "String")]
    pub return_date: NaiveDate,

    pub total_price: Money,
    pub status: BookingStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Moves the booking to `next`, enforcing the status rules.
    pub fn transition_to(&mut self, next: BookingStatus) -> CoreResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidStatusTransition {
                booking_id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// "Brand Model" of the booked vehicle.
    pub fn vehicle_name(&self) -> String {
        format!("{} {}", self.vehicle_brand, self.vehicle_model)
    }
}

// =============================================================================
// User
// =============================================================================

/// What a signed-in user may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Role {
    /// Books vehicles. The backend calls this role "user".
    #[serde(rename = "user", alias = "renter")]
    Renter,
    /// Manages the catalog and sees all bookings.
    #[serde(rename = "owner", alias = "admin")]
    Owner,
}

impl Default for Role {
    fn default() -> Self {
        Role::Renter
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Renter => f.write_str("renter"),
            Role::Owner => f.write_str("owner"),
        }
    }
}

/// A signed-in user as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

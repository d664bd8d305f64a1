//! # Commands Module
//!
//! One function per storefront action. The CLI in `cli.rs` parses the
//! arguments, calls these, and prints what they return.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (DTOs, owner gate)
//! ├── auth.rs     ◄─── login, register, logout, whoami
//! ├── catalog.rs  ◄─── cars, car, quote, recommend
//! ├── booking.rs  ◄─── book (full lifecycle), my bookings
//! ├── owner.rs    ◄─── dashboard, car and booking administration
//! └── config.rs   ◄─── effective configuration
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs database
//! async fn list_cars(db: &DbState, ...)
//!
//! // Needs database and an owner session
//! async fn cancel_booking(db: &DbState, session: &SessionState, id: &str)
//! ```

pub mod auth;
pub mod booking;
pub mod catalog;
pub mod config;
pub mod owner;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use drivehub_core::{
    Booking, BookingStatus, FuelType, Role, Transmission, User, Vehicle, VehicleCategory,
};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDto {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub category: VehicleCategory,
    pub daily_rate_cents: i64,
    pub seating_capacity: u32,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub location: String,
    pub description: String,
    pub image: Option<String>,
    pub is_available: bool,
    pub features: Vec<String>,
}

impl From<&Vehicle> for VehicleDto {
    fn from(v: &Vehicle) -> Self {
        VehicleDto {
            id: v.id.clone(),
            brand: v.brand.clone(),
            model: v.model.clone(),
            year: v.year,
            category: v.category,
            daily_rate_cents: v.daily_rate.cents(),
            seating_capacity: v.seating_capacity,
            fuel_type: v.fuel_type,
            transmission: v.transmission,
            location: v.location.clone(),
            description: v.description.clone(),
            image: v.image.clone(),
            is_available: v.is_available,
            features: v.features.clone(),
        }
    }
}

impl VehicleDto {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    pub id: String,
    pub vehicle_id: String,
    pub vehicle_name: String,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub total_price_cents: i64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Booking> for BookingDto {
    fn from(b: &Booking) -> Self {
        BookingDto {
            id: b.id.clone(),
            vehicle_id: b.vehicle_id.clone(),
            vehicle_name: b.vehicle_name().trim().to_string(),
            pickup_date: b.pickup_date,
            return_date: b.return_date,
            total_price_cents: b.total_price.cents(),
            status: b.status,
            created_at: b.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserDto {
    fn from(u: &User) -> Self {
        UserDto {
            id: u.id.clone(),
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role,
        }
    }
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    use crate::state::{DbState, SessionState};
    use drivehub_client::{
        BookingBackend, ClientError, ClientResult, Registration, SessionIdentity, SessionStore,
    };
    use drivehub_core::lifecycle::BookingDraft;
    use drivehub_core::{
        Booking, BookingStatus, FuelType, Money, NewVehicle, Role, Transmission, User,
        VehicleCategory,
    };
    use drivehub_db::{Database, DbConfig};

    pub async fn db() -> DbState {
        DbState::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    pub fn user(role: Role) -> User {
        User {
            id: "u1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role,
        }
    }

    pub fn session(role: Option<Role>) -> SessionState {
        let path = std::env::temp_dir().join(format!(
            "drivehub-storefront-session-{}.json",
            uuid::Uuid::new_v4()
        ));
        let mut state = SessionState::load(SessionStore::new(path)).unwrap();
        if let Some(role) = role {
            state
                .sign_in(SessionIdentity {
                    token: "tok".to_string(),
                    user: user(role),
                })
                .unwrap();
        }
        state
    }

    pub fn new_vehicle(brand: &str, model: &str, category: VehicleCategory, rate: i64) -> NewVehicle {
        NewVehicle {
            brand: brand.to_string(),
            model: model.to_string(),
            year: 2022,
            category,
            daily_rate: Money::from_major(rate),
            seating_capacity: 5,
            fuel_type: FuelType::Petrol,
            transmission: Transmission::Automatic,
            location: "Chicago".to_string(),
            description: format!("{brand} {model}"),
            image: None,
            features: vec!["GPS".to_string()],
        }
    }

    pub async fn seed(db: &DbState, id: &str, brand: &str, model: &str, category: VehicleCategory, rate: i64) {
        let vehicle = new_vehicle(brand, model, category, rate).into_vehicle(
            id.to_string(),
            None,
            Utc::now(),
        );
        db.inner().vehicles().insert(&vehicle).await.unwrap();
    }

    /// Backend that accepts password "secret" and stores created bookings.
    #[derive(Default)]
    pub struct FakeBackend {
        pub created: Mutex<Vec<Booking>>,
        pub paid: Mutex<Vec<String>>,
        pub reject_bookings: Option<String>,
    }

    #[async_trait]
    impl BookingBackend for FakeBackend {
        async fn login(&self, email: &str, password: &str) -> ClientResult<SessionIdentity> {
            if password != "secret" {
                return Err(ClientError::Backend {
                    message: "Invalid credentials".to_string(),
                });
            }
            let mut user = user(Role::Renter);
            user.email = email.to_string();
            Ok(SessionIdentity {
                token: "tok".to_string(),
                user,
            })
        }

        async fn register(&self, registration: &Registration) -> ClientResult<SessionIdentity> {
            Ok(SessionIdentity {
                token: "tok-new".to_string(),
                user: User {
                    id: "u2".to_string(),
                    name: registration.name.clone(),
                    email: registration.email.clone(),
                    role: Role::Renter,
                },
            })
        }

        async fn create_booking(&self, _token: &str, draft: &BookingDraft) -> ClientResult<Booking> {
            if let Some(message) = &self.reject_bookings {
                return Err(ClientError::Backend {
                    message: message.clone(),
                });
            }
            let mut created = self.created.lock().unwrap();
            let booking = Booking {
                id: format!("bk-{}", created.len() + 1),
                vehicle_id: draft.vehicle_id.clone(),
                user_id: None,
                vehicle_brand: draft.vehicle_brand.clone(),
                vehicle_model: draft.vehicle_model.clone(),
                pickup_date: draft.pickup_date,
                return_date: draft.return_date,
                total_price: draft.total_price,
                status: BookingStatus::Pending,
                created_at: Utc::now(),
            };
            created.push(booking.clone());
            Ok(booking)
        }

        async fn list_bookings(&self, _token: &str) -> ClientResult<Vec<Booking>> {
            Ok(self.created.lock().unwrap().clone())
        }

        async fn mark_paid(&self, _token: &str, booking_id: &str) -> ClientResult<()> {
            self.paid.lock().unwrap().push(booking_id.to_string());
            Ok(())
        }

        async fn create_payment_intent(&self, _token: &str, _amount: Money) -> ClientResult<String> {
            Ok("pi_test_secret".to_string())
        }
    }
}

//! # Repository Module
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storefront command                                                     │
//! │       │  db.vehicles().update("car-1", &edit)                          │
//! │       ▼                                                                 │
//! │  VehicleRepository                 BookingRepository                   │
//! │  ├── list / search / get           ├── insert                          │
//! │  ├── insert                        ├── list / list_for_user / get      │
//! │  ├── update                        ├── update_status (guarded)         │
//! │  └── delete / count                └── cancel / mark_paid / count      │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  vehicles table                    bookings table                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`vehicle::VehicleRepository`] - catalog CRUD and search
//! - [`booking::BookingRepository`] - booking ledger and status changes

pub mod booking;
pub mod vehicle;

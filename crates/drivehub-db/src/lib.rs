//! # drivehub-db: Local Store for DriveHub
//!
//! SQLite persistence for the vehicle catalog and the owner's booking
//! ledger, via sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        DriveHub Data Flow                               │
//! │                                                                         │
//! │  Storefront command (owner edit-car, cars, book ...)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   drivehub-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌─────────────────┐  ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories   │  │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│  VehicleRepo    │  │  (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │  BookingRepo    │  │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └─────────────────┘  └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  drivehub.db (platform data dir, or DRIVEHUB_DB_PATH)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use drivehub_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("drivehub.db")).await?;
//! let cars = db.vehicles().search("bmw", true).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::booking::BookingRepository;
pub use repository::vehicle::VehicleRepository;

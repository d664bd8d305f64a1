//! # drivehub-client: The Network and Session Edge
//!
//! Everything the storefront does on behalf of a renter that leaves the
//! machine: talking to the booking backend, confirming payments, and
//! remembering who is signed in.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Session (passed in) ──► BookingLifecycleController ◄── BookingFlow    │
//! │                              │              │           (core, pure)   │
//! │                              ▼              ▼                           │
//! │                     dyn BookingBackend   dyn PaymentGateway            │
//! │                              │              │                           │
//! │                              ▼              ▼                           │
//! │                       HttpBackend      SimulatedGateway                │
//! │                     (reqwest, JSON)    (PaymentMode)                   │
//! │                                                                         │
//! │  ClientConfig (client.toml + DRIVEHUB_* env)  SessionStore (JSON file) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - TOML configuration with environment overrides
//! - [`session`] - Session value and its persisted store
//! - [`backend`] - The `BookingBackend` trait
//! - [`api`] - REST implementation of the backend
//! - [`payment`] - The `PaymentGateway` trait and simulated gateway
//! - [`flow`] - Booking lifecycle controller
//! - [`error`] - Client error types

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod flow;
pub mod payment;
pub mod session;

pub use api::HttpBackend;
pub use backend::{BookingBackend, Registration};
pub use config::{ClientConfig, PaymentMode};
pub use error::{ClientError, ClientResult};
pub use flow::{BookingLifecycleController, PaymentReport};
pub use payment::{PaymentGateway, PaymentOutcome, SimulatedGateway};
pub use session::{Session, SessionIdentity, SessionStore};

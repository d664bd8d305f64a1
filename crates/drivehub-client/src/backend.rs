//! # Booking Backend Seam
//!
//! The REST collaborator the storefront depends on. [`crate::api::HttpBackend`]
//! is the real implementation; tests substitute their own.

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::session::SessionIdentity;
use drivehub_core::lifecycle::BookingDraft;
use drivehub_core::{Booking, Money};

/// Credentials for a new account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[async_trait]
pub trait BookingBackend: Send + Sync {
    /// `POST /api/user/login`
    async fn login(&self, email: &str, password: &str) -> ClientResult<SessionIdentity>;

    /// `POST /api/user/register` (always as a renter)
    async fn register(&self, registration: &Registration) -> ClientResult<SessionIdentity>;

    /// `POST /api/booking`. Returns the booking as the backend stored it.
    async fn create_booking(&self, token: &str, draft: &BookingDraft) -> ClientResult<Booking>;

    /// `GET /api/booking`: the signed-in user's bookings.
    async fn list_bookings(&self, token: &str) -> ClientResult<Vec<Booking>>;

    /// `PUT /api/booking/{id}/pay`
    async fn mark_paid(&self, token: &str, booking_id: &str) -> ClientResult<()>;

    /// `POST /api/payment/create-payment-intent`. Returns the client secret.
    async fn create_payment_intent(&self, token: &str, amount: Money) -> ClientResult<String>;
}

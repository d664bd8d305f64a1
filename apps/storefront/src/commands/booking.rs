//! # Booking Commands
//!
//! Runs the whole booking lifecycle for one car in a single command.
//!
//! ## Booking Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  drivehub book car-1 --pickup 2025-03-01 --return 2025-03-04            │
//! │                                                                         │
//! │  1. Session check ─────────── not signed in? stop, nothing sent         │
//! │  2. Parse dates, load car ─── unavailable car? stop                     │
//! │  3. Validate + price ──────── bad range? stop (flow Rejected)           │
//! │  4. Submit to backend ─────── refused? stop (flow back to Drafting)     │
//! │  5. Record in local ledger                                              │
//! │  6. Payment intent + confirm ─ declined? stop, booking stays confirmed  │
//! │  7. Mark paid (backend, then ledger)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A declined payment leaves a confirmed booking behind. `pay <booking-id>`
//! resumes the lifecycle at the payment step for it.
//!
//! The local ledger is a copy for the owner views. Failures writing to it
//! are logged and never undo a booking the backend accepted.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::commands::BookingDto;
use crate::error::{ApiError, ErrorCode};
use crate::state::{DbState, SessionState};
use drivehub_client::{
    BookingBackend, BookingLifecycleController, ClientError, PaymentGateway, PaymentReport,
    SessionIdentity,
};
use drivehub_core::pricing::rental_days;
use drivehub_core::validation::parse_booking_date;
use drivehub_core::{Booking, BookingStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    pub booking: BookingDto,
    pub days: i64,
    pub payment_reference: String,
    /// False when the backend was not told the booking is paid.
    pub paid_recorded: bool,
}

/// Books `car_id` for the given dates and pays for it.
#[allow(clippy::too_many_arguments)]
pub async fn book(
    db: &DbState,
    session: &SessionState,
    backend: Arc<dyn BookingBackend>,
    gateway: Arc<dyn PaymentGateway>,
    car_id: &str,
    pickup: &str,
    return_date: &str,
    today: NaiveDate,
) -> Result<BookingReceipt, ApiError> {
    debug!(car_id = %car_id, pickup = %pickup, return_date = %return_date, "book command");

    let identity = session.session().require()?;

    let pickup = parse_booking_date("pickup date", pickup)?;
    let return_date = parse_booking_date("return date", return_date)?;

    let vehicle = db.inner().vehicles().get_required(car_id).await?;
    if !vehicle.is_available {
        return Err(ApiError::business(format!(
            "{} is not available for booking",
            vehicle.display_name()
        )));
    }

    let mut controller = BookingLifecycleController::new(backend, gateway);
    let draft = controller.validate(&vehicle, Some(pickup), Some(return_date), today)?;

    let mut created = controller.submit(session.session()).await?;
    if created.user_id.is_none() {
        created.user_id = Some(identity.user.id.clone());
    }
    record(db, &created).await;

    let report = settle(db, &mut controller, session, &created.id).await?;

    let mut booking = report.booking;
    booking.user_id = created.user_id;

    Ok(BookingReceipt {
        booking: BookingDto::from(&booking),
        days: draft.days,
        payment_reference: report.reference,
        paid_recorded: report.paid_recorded,
    })
}

/// Pays for a booking whose payment failed during `book`.
///
/// The booking is looked up in the local ledger first, then in the
/// renter's backend bookings. Only a confirmed booking can be paid.
pub async fn pay(
    db: &DbState,
    session: &SessionState,
    backend: Arc<dyn BookingBackend>,
    gateway: Arc<dyn PaymentGateway>,
    booking_id: &str,
) -> Result<BookingReceipt, ApiError> {
    debug!(booking_id = %booking_id, "pay command");

    let identity = session.session().require()?;
    let booking = find_own_booking(db, backend.as_ref(), identity, booking_id).await?;
    let days = rental_days(booking.return_date.signed_duration_since(booking.pickup_date));

    let mut controller = BookingLifecycleController::resume(backend, gateway, booking)?;
    let report = settle(db, &mut controller, session, booking_id).await?;

    let mut booking = report.booking;
    if booking.user_id.is_none() {
        booking.user_id = Some(identity.user.id.clone());
    }

    Ok(BookingReceipt {
        booking: BookingDto::from(&booking),
        days,
        payment_reference: report.reference,
        paid_recorded: report.paid_recorded,
    })
}

async fn find_own_booking(
    db: &DbState,
    backend: &dyn BookingBackend,
    identity: &SessionIdentity,
    booking_id: &str,
) -> Result<Booking, ApiError> {
    let ledger = db.inner().bookings().list_for_user(&identity.user.id).await?;
    if let Some(booking) = ledger.into_iter().find(|b| b.id == booking_id) {
        return Ok(booking);
    }

    let mut booking = backend
        .list_bookings(&identity.token)
        .await?
        .into_iter()
        .find(|b| b.id == booking_id)
        .ok_or_else(|| ApiError::not_found("Booking", booking_id))?;

    // the backend keeps new bookings pending; creation confirms them
    if booking.status == BookingStatus::Pending {
        booking.transition_to(BookingStatus::Confirmed)?;
    }
    Ok(booking)
}

/// Collects payment, then marks the ledger row paid.
async fn settle(
    db: &DbState,
    controller: &mut BookingLifecycleController,
    session: &SessionState,
    booking_id: &str,
) -> Result<PaymentReport, ApiError> {
    let report = match controller.complete_payment(session.session()).await {
        Ok(report) => report,
        Err(ClientError::Payment { message }) => {
            return Err(ApiError::new(
                ErrorCode::PaymentError,
                format!(
                    "Payment failed: {}. Booking {} was created and is awaiting payment; \
                     run `drivehub pay {}` to retry",
                    message, booking_id, booking_id
                ),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    if let Err(e) = db.inner().bookings().mark_paid(booking_id).await {
        warn!(booking_id = %booking_id, error = %e, "Could not mark the ledger booking paid");
    }
    Ok(report)
}

async fn record(db: &DbState, booking: &Booking) {
    if let Err(e) = db.inner().bookings().insert(booking).await {
        warn!(booking_id = %booking.id, error = %e, "Could not record booking in the local ledger");
    }
}

/// The signed-in renter's bookings, as the backend reports them.
pub async fn my_bookings(
    session: &SessionState,
    backend: &dyn BookingBackend,
) -> Result<Vec<BookingDto>, ApiError> {
    debug!("my_bookings command");

    let identity = session.session().require()?;
    let bookings = backend.list_bookings(&identity.token).await?;

    Ok(bookings.iter().map(BookingDto::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{self, FakeBackend};
    use drivehub_client::{PaymentMode, SimulatedGateway};
    use drivehub_core::{Role, VehicleCategory, VehicleUpdate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
    }

    async fn seeded() -> DbState {
        let db = testing::db().await;
        testing::seed(&db, "car-1", "Toyota", "Corolla", VehicleCategory::Sedan, 60).await;
        db
    }

    fn gateway(mode: PaymentMode) -> Arc<dyn PaymentGateway> {
        Arc::new(SimulatedGateway::new(mode))
    }

    #[tokio::test]
    async fn test_book_and_pay() {
        let db = seeded().await;
        let session = testing::session(Some(Role::Renter));
        let backend = Arc::new(FakeBackend::default());

        let receipt = book(
            &db,
            &session,
            backend.clone(),
            gateway(PaymentMode::Simulated),
            "car-1",
            "2025-03-01",
            "2025-03-04",
            today(),
        )
        .await
        .unwrap();

        assert_eq!(receipt.days, 3);
        assert_eq!(receipt.booking.total_price_cents, 18_000);
        assert_eq!(receipt.booking.status, BookingStatus::Paid);
        assert!(receipt.paid_recorded);
        assert!(receipt.payment_reference.starts_with("sim_"));
        assert_eq!(*backend.paid.lock().unwrap(), vec!["bk-1".to_string()]);

        let ledger = db.inner().bookings().get("bk-1").await.unwrap().unwrap();
        assert_eq!(ledger.status, BookingStatus::Paid);
        assert_eq!(ledger.user_id.as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn test_declined_payment_leaves_booking_confirmed() {
        let db = seeded().await;
        let session = testing::session(Some(Role::Renter));
        let backend = Arc::new(FakeBackend::default());

        let err = book(
            &db,
            &session,
            backend.clone(),
            gateway(PaymentMode::Decline),
            "car-1",
            "2025-03-01",
            "2025-03-04",
            today(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::PaymentError);
        assert!(err.message.contains("bk-1"));
        assert!(backend.paid.lock().unwrap().is_empty());

        let ledger = db.inner().bookings().get("bk-1").await.unwrap().unwrap();
        assert_eq!(ledger.status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_declined_booking_can_be_paid_later() {
        let db = seeded().await;
        let session = testing::session(Some(Role::Renter));
        let backend = Arc::new(FakeBackend::default());

        let err = book(
            &db,
            &session,
            backend.clone(),
            gateway(PaymentMode::Decline),
            "car-1",
            "2025-03-01",
            "2025-03-04",
            today(),
        )
        .await
        .unwrap_err();
        assert!(err.message.contains("drivehub pay bk-1"));

        let receipt = pay(
            &db,
            &session,
            backend.clone(),
            gateway(PaymentMode::Simulated),
            "bk-1",
        )
        .await
        .unwrap();

        assert_eq!(receipt.days, 3);
        assert_eq!(receipt.booking.status, BookingStatus::Paid);
        assert_eq!(receipt.booking.total_price_cents, 18_000);
        assert!(receipt.paid_recorded);
        assert_eq!(*backend.paid.lock().unwrap(), vec!["bk-1".to_string()]);
        assert_eq!(backend.created.lock().unwrap().len(), 1);

        let ledger = db.inner().bookings().get("bk-1").await.unwrap().unwrap();
        assert_eq!(ledger.status, BookingStatus::Paid);

        // paying twice is refused
        let err = pay(
            &db,
            &session,
            backend.clone(),
            gateway(PaymentMode::Simulated),
            "bk-1",
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(err.message, "Booking bk-1 is paid and cannot be paid");
        assert_eq!(backend.paid.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_pay_falls_back_to_backend_bookings() {
        let db = seeded().await;
        let session = testing::session(Some(Role::Renter));
        let backend = Arc::new(FakeBackend::default());

        book(
            &db,
            &session,
            backend.clone(),
            gateway(PaymentMode::Decline),
            "car-1",
            "2025-03-01",
            "2025-03-04",
            today(),
        )
        .await
        .unwrap_err();

        // a store without the ledger row; the backend still lists it as pending
        let other_db = seeded().await;
        let receipt = pay(
            &other_db,
            &session,
            backend.clone(),
            gateway(PaymentMode::Simulated),
            "bk-1",
        )
        .await
        .unwrap();
        assert_eq!(receipt.booking.status, BookingStatus::Paid);
        assert_eq!(receipt.days, 3);
        assert_eq!(*backend.paid.lock().unwrap(), vec!["bk-1".to_string()]);

        let err = pay(
            &other_db,
            &session,
            backend.clone(),
            gateway(PaymentMode::Simulated),
            "bk-404",
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = pay(
            &other_db,
            &testing::session(None),
            backend,
            gateway(PaymentMode::Simulated),
            "bk-1",
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }

    #[tokio::test]
    async fn test_signed_out_sends_nothing() {
        let db = seeded().await;
        let session = testing::session(None);
        let backend = Arc::new(FakeBackend::default());

        let err = book(
            &db,
            &session,
            backend.clone(),
            gateway(PaymentMode::Simulated),
            "car-1",
            "2025-03-01",
            "2025-03-04",
            today(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::Unauthenticated);
        assert!(backend.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_car_refused() {
        let db = seeded().await;
        let update = VehicleUpdate {
            is_available: Some(false),
            ..Default::default()
        };
        db.inner().vehicles().update("car-1", &update).await.unwrap();
        let session = testing::session(Some(Role::Renter));
        let backend = Arc::new(FakeBackend::default());

        let err = book(
            &db,
            &session,
            backend.clone(),
            gateway(PaymentMode::Simulated),
            "car-1",
            "2025-03-01",
            "2025-03-04",
            today(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert!(backend.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bad_range_and_backend_refusal() {
        let db = seeded().await;
        let session = testing::session(Some(Role::Renter));

        let backend = Arc::new(FakeBackend::default());
        let err = book(
            &db,
            &session,
            backend.clone(),
            gateway(PaymentMode::Simulated),
            "car-1",
            "2025-03-04",
            "2025-03-01",
            today(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(backend.created.lock().unwrap().is_empty());

        let backend = Arc::new(FakeBackend {
            reject_bookings: Some("Car is already booked for these dates".to_string()),
            ..Default::default()
        });
        let err = book(
            &db,
            &session,
            backend,
            gateway(PaymentMode::Simulated),
            "car-1",
            "2025-03-01",
            "2025-03-04",
            today(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::BackendError);
        assert_eq!(err.message, "Car is already booked for these dates");
        assert_eq!(db.inner().bookings().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_my_bookings() {
        let db = seeded().await;
        let session = testing::session(Some(Role::Renter));
        let backend = Arc::new(FakeBackend::default());

        book(
            &db,
            &session,
            backend.clone(),
            gateway(PaymentMode::Simulated),
            "car-1",
            "2025-03-01",
            "2025-03-04",
            today(),
        )
        .await
        .unwrap();

        let mine = my_bookings(&session, backend.as_ref()).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].vehicle_name, "Toyota Corolla");

        let signed_out = testing::session(None);
        let err = my_bookings(&signed_out, backend.as_ref()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }
}

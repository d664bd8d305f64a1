//! # Booking Lifecycle Controller
//!
//! Drives one booking attempt end to end, feeding every network outcome
//! into the pure [`BookingFlow`] state machine.
//!
//! ## Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate(vehicle, dates, today)       local only, never hits network   │
//! │       │                                                                 │
//! │  submit(session)                                                        │
//! │       ├── no session ──────────────► NotAuthenticated (no request)     │
//! │       ├── POST /api/booking fails ─► Drafting { last_error }           │
//! │       └── ok ──────────────────────► AwaitingPayment                   │
//! │                                                                         │
//! │  complete_payment(session)                                              │
//! │       ├── POST create-payment-intent                                    │
//! │       ├── gateway.confirm(client_secret)                                │
//! │       │      └── declined ────────► AwaitingPayment { last_payment_error }
//! │       ├── PUT /api/booking/{id}/pay   (failure only logged)             │
//! │       └──────────────────────────────► Confirmed { paid_recorded }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call is made once. A failed step is retried by the user calling
//! the same method again.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::BookingBackend;
use crate::error::{ClientError, ClientResult};
use crate::payment::{PaymentGateway, PaymentOutcome};
use crate::session::Session;
use drivehub_core::lifecycle::{BookingDraft, BookingFlow, FlowState};
use drivehub_core::{Booking, CoreError, Vehicle};

/// Result of a confirmed payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReport {
    pub booking: Booking,
    /// False when the backend could not be told the booking is paid.
    pub paid_recorded: bool,
    pub reference: String,
}

pub struct BookingLifecycleController {
    backend: Arc<dyn BookingBackend>,
    gateway: Arc<dyn PaymentGateway>,
    flow: BookingFlow,
    draft: Option<BookingDraft>,
}

impl BookingLifecycleController {
    pub fn new(backend: Arc<dyn BookingBackend>, gateway: Arc<dyn PaymentGateway>) -> Self {
        BookingLifecycleController {
            backend,
            gateway,
            flow: BookingFlow::new(),
            draft: None,
        }
    }

    /// Controller for a booking created by an earlier command, ready for
    /// [`BookingLifecycleController::complete_payment`].
    ///
    /// Only a confirmed booking can be resumed.
    pub fn resume(
        backend: Arc<dyn BookingBackend>,
        gateway: Arc<dyn PaymentGateway>,
        booking: Booking,
    ) -> ClientResult<Self> {
        Ok(BookingLifecycleController {
            backend,
            gateway,
            flow: BookingFlow::awaiting_payment(booking)?,
            draft: None,
        })
    }

    pub fn state(&self) -> &FlowState {
        self.flow.state()
    }

    pub fn draft(&self) -> Option<&BookingDraft> {
        self.draft.as_ref()
    }

    fn invalid(&self, action: &str) -> ClientError {
        CoreError::InvalidFlowTransition {
            action: action.to_string(),
            state: self.flow.state().name().to_string(),
        }
        .into()
    }

    fn awaiting_booking(&self, action: &str) -> ClientResult<Booking> {
        match self.flow.state() {
            FlowState::AwaitingPayment { booking, .. } => Ok(booking.clone()),
            _ => Err(self.invalid(action)),
        }
    }

    /// Checks dates and prices the rental for `vehicle`.
    pub fn validate(
        &mut self,
        vehicle: &Vehicle,
        pickup: Option<NaiveDate>,
        return_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> ClientResult<BookingDraft> {
        let draft = self.flow.validate(vehicle, pickup, return_date, today)?;
        self.draft = Some(draft.clone());
        Ok(draft)
    }

    /// Back to a clean draft after a rejection.
    pub fn revise(&mut self) -> ClientResult<()> {
        self.flow.revise()?;
        self.draft = None;
        Ok(())
    }

    /// Sends the validated draft to the backend.
    ///
    /// ## Returns
    /// * `Ok(Booking)` - created booking, confirmed, awaiting payment
    /// * `Err(ClientError::NotAuthenticated)` - no session; nothing was sent
    /// * `Err(ClientError::Backend)` - the backend refused; flow is back in
    ///   `Drafting` and the same draft can be resubmitted
    /// * `Err(ClientError::UnexpectedResponse)` - the echoed booking is
    ///   already paid or cancelled; flow is back in `Drafting`
    pub async fn submit(&mut self, session: &Session) -> ClientResult<Booking> {
        let identity = session.require()?;
        let draft = match (&self.draft, self.flow.state()) {
            (Some(draft), FlowState::Drafting { .. }) => draft.clone(),
            _ => return Err(self.invalid("submit")),
        };

        self.flow.begin_submit(draft.clone())?;

        match self.backend.create_booking(&identity.token, &draft).await {
            Ok(created) => {
                if let Err(e) = self.flow.submission_succeeded(created) {
                    warn!(error = %e, "Backend echoed a booking that cannot be paid");
                    return Err(match e {
                        e @ CoreError::NotPayable { .. } => {
                            ClientError::UnexpectedResponse(e.to_string())
                        }
                        other => other.into(),
                    });
                }
                let booking = self.awaiting_booking("submit")?;
                info!(
                    booking_id = %booking.id,
                    vehicle_id = %booking.vehicle_id,
                    total = %booking.total_price,
                    "Booking created"
                );
                Ok(booking)
            }
            Err(e) => {
                self.flow.submission_failed(e.to_string())?;
                Err(e)
            }
        }
    }

    /// Collects payment for the created booking.
    ///
    /// A decline leaves the flow awaiting payment and returns
    /// `ClientError::Payment`. A failed mark-paid call is logged and reported
    /// through `paid_recorded`; it does not fail the payment.
    pub async fn complete_payment(&mut self, session: &Session) -> ClientResult<PaymentReport> {
        let identity = session.require()?;
        let booking = self.awaiting_booking("pay")?;

        let outcome = match self.collect(&identity.token, &booking).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let message = e.to_string();
                self.flow.payment_declined(message.clone())?;
                return Err(ClientError::Payment { message });
            }
        };

        let reference = match outcome {
            PaymentOutcome::Succeeded { reference } => reference,
            PaymentOutcome::Declined { message } => {
                self.flow.payment_declined(message.clone())?;
                return Err(ClientError::Payment { message });
            }
        };

        let paid_recorded = match self.backend.mark_paid(&identity.token, &booking.id).await {
            Ok(()) => true,
            Err(e) => {
                warn!(booking_id = %booking.id, error = %e, "Payment succeeded but marking the booking paid failed");
                false
            }
        };

        self.flow.payment_succeeded(paid_recorded)?;

        let booking = match self.flow.state() {
            FlowState::Confirmed { booking, .. } => booking.clone(),
            _ => return Err(self.invalid("pay")),
        };
        info!(booking_id = %booking.id, reference = %reference, paid_recorded, "Payment confirmed");

        Ok(PaymentReport {
            booking,
            paid_recorded,
            reference,
        })
    }

    async fn collect(&self, token: &str, booking: &Booking) -> ClientResult<PaymentOutcome> {
        let secret = self
            .backend
            .create_payment_intent(token, booking.total_price)
            .await?;
        self.gateway.confirm(&secret, booking.total_price).await
    }
}

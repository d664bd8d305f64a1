//! # Booking Flow
//!
//! The pure state machine behind "validate dates → submit booking → await
//! payment → confirm". It performs no I/O: the controller in
//! `drivehub-client` makes the network calls and reports each outcome here.
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────┐  validate ok   ┌────────────┐  backend ok  ┌──────────┐ │
//! │   │ Drafting │ ─────────────► │ Submitting │ ───────────► │ Awaiting │ │
//! │   │          │ ◄───────────── │            │              │ Payment  │ │
//! │   └────┬─────┘  backend error └────────────┘              └────┬─────┘ │
//! │        │       (last_error)                          declined │ ▲     │
//! │        │ validate failed                              ────────┘ │     │
//! │        ▼                                                        │     │
//! │   ┌──────────┐                                   payment ok     ▼     │
//! │   │ Rejected │ ── revise ──► Drafting              ┌───────────────┐  │
//! │   └──────────┘                                     │   Confirmed   │  │
//! │                                                    └───────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A declined payment keeps the flow in `AwaitingPayment`; the pending
//! booking already exists on the backend and is not rolled back. A later
//! attempt re-enters that state through [`BookingFlow::awaiting_payment`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::quote;
use crate::types::{Booking, BookingStatus, Vehicle};
use crate::validation::validate_date_range;

/// A validated booking request, ready to submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub vehicle_id: String,
    pub vehicle_brand: String,
    pub vehicle_model: String,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub days: i64,
    pub total_price: Money,
}

/// Where a booking attempt currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    /// Collecting dates. Holds the last backend error, if a submit failed.
    Drafting { last_error: Option<String> },

    /// Draft sent to the backend; waiting for its answer.
    Submitting { draft: BookingDraft },

    /// Backend created the booking; payment not yet confirmed.
    AwaitingPayment {
        booking: Booking,
        last_payment_error: Option<String>,
    },

    /// Payment confirmed. `paid_recorded` is false when the follow-up
    /// mark-paid call failed.
    Confirmed { booking: Booking, paid_recorded: bool },

    /// Validation failed. Call [`BookingFlow::revise`] to try again.
    Rejected { reason: String },
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::Drafting { .. } => "drafting",
            FlowState::Submitting { .. } => "submitting",
            FlowState::AwaitingPayment { .. } => "awaiting payment",
            FlowState::Confirmed { .. } => "confirmed",
            FlowState::Rejected { .. } => "rejected",
        }
    }
}

/// One booking attempt for one vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingFlow {
    state: FlowState,
}

impl Default for BookingFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Drafting { last_error: None },
        }
    }

    /// A flow for a booking created earlier, waiting only for payment.
    ///
    /// Fails with [`CoreError::NotPayable`] unless the booking is confirmed.
    pub fn awaiting_payment(booking: Booking) -> CoreResult<Self> {
        if booking.status != BookingStatus::Confirmed {
            return Err(CoreError::NotPayable {
                booking_id: booking.id,
                status: booking.status,
            });
        }
        Ok(Self {
            state: FlowState::AwaitingPayment {
                booking,
                last_payment_error: None,
            },
        })
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// The booking created by the backend, once there is one.
    pub fn booking(&self) -> Option<&Booking> {
        match &self.state {
            FlowState::AwaitingPayment { booking, .. } | FlowState::Confirmed { booking, .. } => {
                Some(booking)
            }
            _ => None,
        }
    }

    fn invalid(&self, action: &str) -> CoreError {
        CoreError::InvalidFlowTransition {
            action: action.to_string(),
            state: self.state.name().to_string(),
        }
    }

    /// Checks the dates and prices the rental.
    ///
    /// On failure the flow moves to `Rejected` and the validation error is
    /// returned. On success the flow stays in `Drafting` and the draft is
    /// returned for [`BookingFlow::begin_submit`].
    pub fn validate(
        &mut self,
        vehicle: &Vehicle,
        pickup: Option<NaiveDate>,
        return_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> CoreResult<BookingDraft> {
        if !matches!(self.state, FlowState::Drafting { .. }) {
            return Err(self.invalid("validate"));
        }

        let (pickup, return_date) = match validate_date_range(pickup, return_date, today) {
            Ok(range) => range,
            Err(e) => {
                self.state = FlowState::Rejected {
                    reason: e.to_string(),
                };
                return Err(e.into());
            }
        };

        let (days, total_price) = match quote(Some(pickup), Some(return_date), vehicle.daily_rate)
            .require()
        {
            Ok(priced) if priced.1.is_positive() => priced,
            _ => {
                self.state = FlowState::Rejected {
                    reason: CoreError::PriceNotComputable.to_string(),
                };
                return Err(CoreError::PriceNotComputable);
            }
        };

        Ok(BookingDraft {
            vehicle_id: vehicle.id.clone(),
            vehicle_brand: vehicle.brand.clone(),
            vehicle_model: vehicle.model.clone(),
            pickup_date: pickup,
            return_date,
            days,
            total_price,
        })
    }

    /// Returns a rejected (or drafting) flow to a clean `Drafting` state.
    pub fn revise(&mut self) -> CoreResult<()> {
        match self.state {
            FlowState::Rejected { .. } | FlowState::Drafting { .. } => {
                self.state = FlowState::Drafting { last_error: None };
                Ok(())
            }
            _ => Err(self.invalid("revise")),
        }
    }

    /// Drafting → Submitting.
    pub fn begin_submit(&mut self, draft: BookingDraft) -> CoreResult<()> {
        if !matches!(self.state, FlowState::Drafting { .. }) {
            return Err(self.invalid("submit"));
        }
        self.state = FlowState::Submitting { draft };
        Ok(())
    }

    /// Submitting → Drafting, keeping the backend's message.
    pub fn submission_failed(&mut self, message: impl Into<String>) -> CoreResult<()> {
        if !matches!(self.state, FlowState::Submitting { .. }) {
            return Err(self.invalid("record a failed submission"));
        }
        self.state = FlowState::Drafting {
            last_error: Some(message.into()),
        };
        Ok(())
    }

    /// Submitting → AwaitingPayment.
    ///
    /// A booking echoed as pending is confirmed on creation. An echo that is
    /// already paid or cancelled sends the flow back to `Drafting` with
    /// [`CoreError::NotPayable`].
    pub fn submission_succeeded(&mut self, mut booking: Booking) -> CoreResult<()> {
        if !matches!(self.state, FlowState::Submitting { .. }) {
            return Err(self.invalid("record a created booking"));
        }
        match booking.status {
            BookingStatus::Pending => booking.transition_to(BookingStatus::Confirmed)?,
            BookingStatus::Confirmed => {}
            status => {
                let err = CoreError::NotPayable {
                    booking_id: booking.id,
                    status,
                };
                self.state = FlowState::Drafting {
                    last_error: Some(err.to_string()),
                };
                return Err(err);
            }
        }
        self.state = FlowState::AwaitingPayment {
            booking,
            last_payment_error: None,
        };
        Ok(())
    }

    /// Stays in AwaitingPayment so the payment can be retried.
    pub fn payment_declined(&mut self, message: impl Into<String>) -> CoreResult<()> {
        match &mut self.state {
            FlowState::AwaitingPayment {
                last_payment_error, ..
            } => {
                *last_payment_error = Some(message.into());
                Ok(())
            }
            _ => Err(self.invalid("record a declined payment")),
        }
    }

    /// AwaitingPayment → Confirmed.
    ///
    /// Payment success is authoritative: the booking is shown as paid even
    /// when `paid_recorded` is false.
    pub fn payment_succeeded(&mut self, paid_recorded: bool) -> CoreResult<()> {
        let mut booking = match &self.state {
            FlowState::AwaitingPayment { booking, .. } => booking.clone(),
            _ => return Err(self.invalid("confirm payment")),
        };

        if booking.status.can_transition_to(BookingStatus::Paid) {
            booking.transition_to(BookingStatus::Paid)?;
        }
        self.state = FlowState::Confirmed {
            booking,
            paid_recorded,
        };
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::{FuelType, NewVehicle, Transmission, VehicleCategory};
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn vehicle() -> Vehicle {
        NewVehicle {
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: 2021,
            category: VehicleCategory::Sedan,
            daily_rate: Money::from_major(50),
            seating_capacity: 5,
            fuel_type: FuelType::Petrol,
            transmission: Transmission::Automatic,
            location: "Chicago".to_string(),
            description: "Compact".to_string(),
            image: None,
            features: vec!["GPS".to_string()],
        }
        .into_vehicle("car-1".to_string(), None, Utc::now())
    }

    fn created(draft: &BookingDraft, status: BookingStatus) -> Booking {
        Booking {
            id: "bk-1".to_string(),
            vehicle_id: draft.vehicle_id.clone(),
            user_id: Some("u1".to_string()),
            vehicle_brand: draft.vehicle_brand.clone(),
            vehicle_model: draft.vehicle_model.clone(),
            pickup_date: draft.pickup_date,
            return_date: draft.return_date,
            total_price: draft.total_price,
            status,
            created_at: Utc::now(),
        }
    }

    fn submitted_flow() -> (BookingFlow, BookingDraft) {
        let mut flow = BookingFlow::new();
        let draft = flow
            .validate(
                &vehicle(),
                Some(date(2025, 1, 1)),
                Some(date(2025, 1, 4)),
                date(2025, 1, 1),
            )
            .unwrap();
        flow.begin_submit(draft.clone()).unwrap();
        (flow, draft)
    }

    #[test]
    fn test_validate_produces_priced_draft() {
        let (flow, draft) = submitted_flow();
        assert_eq!(draft.days, 3);
        assert_eq!(draft.total_price, Money::from_major(150));
        assert_eq!(flow.state().name(), "submitting");
    }

    #[test]
    fn test_validation_failure_rejects() {
        let mut flow = BookingFlow::new();
        let err = flow
            .validate(
                &vehicle(),
                Some(date(2024, 12, 31)),
                Some(date(2025, 1, 2)),
                date(2025, 1, 1),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidDateRange { .. })
        ));
        assert_eq!(
            flow.state(),
            &FlowState::Rejected {
                reason: "Pickup date cannot be in the past".to_string()
            }
        );

        // submitting from Rejected is not allowed until revised
        assert!(flow.begin_submit(BookingDraft {
            vehicle_id: "car-1".to_string(),
            vehicle_brand: String::new(),
            vehicle_model: String::new(),
            pickup_date: date(2025, 1, 2),
            return_date: date(2025, 1, 3),
            days: 1,
            total_price: Money::from_major(50),
        })
        .is_err());

        flow.revise().unwrap();
        assert_eq!(flow.state(), &FlowState::Drafting { last_error: None });
    }

    #[test]
    fn test_backend_failure_returns_to_drafting() {
        let (mut flow, _) = submitted_flow();
        flow.submission_failed("Car is not available").unwrap();
        assert_eq!(
            flow.state(),
            &FlowState::Drafting {
                last_error: Some("Car is not available".to_string())
            }
        );
        assert!(flow.booking().is_none());
    }

    #[test]
    fn test_created_booking_is_confirmed() {
        let (mut flow, draft) = submitted_flow();
        flow.submission_succeeded(created(&draft, BookingStatus::Pending))
            .unwrap();
        let booking = flow.booking().unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.id, "bk-1");
    }

    #[test]
    fn test_settled_echo_is_not_payable() {
        for status in [BookingStatus::Cancelled, BookingStatus::Paid] {
            let (mut flow, draft) = submitted_flow();
            let err = flow.submission_succeeded(created(&draft, status)).unwrap_err();
            assert!(matches!(err, CoreError::NotPayable { .. }));
            assert!(flow.booking().is_none());
            assert!(matches!(
                flow.state(),
                FlowState::Drafting {
                    last_error: Some(_)
                }
            ));
            assert!(flow.payment_succeeded(true).is_err());
        }
    }

    #[test]
    fn test_resume_confirmed_booking() {
        let (_, draft) = submitted_flow();

        let mut flow =
            BookingFlow::awaiting_payment(created(&draft, BookingStatus::Confirmed)).unwrap();
        assert_eq!(flow.state().name(), "awaiting payment");
        flow.payment_succeeded(true).unwrap();
        assert_eq!(flow.booking().unwrap().status, BookingStatus::Paid);

        for status in [
            BookingStatus::Pending,
            BookingStatus::Paid,
            BookingStatus::Cancelled,
        ] {
            let err = BookingFlow::awaiting_payment(created(&draft, status)).unwrap_err();
            assert!(matches!(err, CoreError::NotPayable { status: s, .. } if s == status));
        }
    }

    #[test]
    fn test_declined_payment_can_be_retried() {
        let (mut flow, draft) = submitted_flow();
        flow.submission_succeeded(created(&draft, BookingStatus::Confirmed))
            .unwrap();

        flow.payment_declined("Your card was declined").unwrap();
        assert!(matches!(
            flow.state(),
            FlowState::AwaitingPayment {
                last_payment_error: Some(_),
                ..
            }
        ));

        flow.payment_succeeded(true).unwrap();
        match flow.state() {
            FlowState::Confirmed {
                booking,
                paid_recorded,
            } => {
                assert_eq!(booking.status, BookingStatus::Paid);
                assert!(*paid_recorded);
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn test_unrecorded_payment_still_confirms() {
        let (mut flow, draft) = submitted_flow();
        flow.submission_succeeded(created(&draft, BookingStatus::Confirmed))
            .unwrap();
        flow.payment_succeeded(false).unwrap();
        assert!(matches!(
            flow.state(),
            FlowState::Confirmed {
                paid_recorded: false,
                ..
            }
        ));
    }

    #[test]
    fn test_out_of_order_events() {
        let mut flow = BookingFlow::new();
        let err = flow.payment_succeeded(true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot confirm payment while booking flow is drafting"
        );
        assert!(flow.submission_failed("x").is_err());
        assert!(flow.payment_declined("x").is_err());
    }
}

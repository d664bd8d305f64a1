//! # Payment Gateway Seam
//!
//! The external payment collaborator confirms a payment intent created by
//! the backend. Card entry and widget wiring live outside this crate; the
//! storefront uses [`SimulatedGateway`].

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::config::PaymentMode;
use crate::error::ClientResult;
use drivehub_core::Money;

/// What the gateway reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Succeeded { reference: String },
    Declined { message: String },
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Confirms the intent identified by `client_secret`.
    ///
    /// `Err` means the gateway could not be reached; a refused card is
    /// `Ok(PaymentOutcome::Declined)`.
    async fn confirm(&self, client_secret: &str, amount: Money) -> ClientResult<PaymentOutcome>;
}

/// Answers every confirmation according to its [`PaymentMode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedGateway {
    mode: PaymentMode,
}

impl SimulatedGateway {
    pub fn new(mode: PaymentMode) -> Self {
        SimulatedGateway { mode }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn confirm(&self, client_secret: &str, amount: Money) -> ClientResult<PaymentOutcome> {
        debug!(mode = %self.mode, amount = %amount, "Confirming simulated payment");

        Ok(match self.mode {
            PaymentMode::Simulated => PaymentOutcome::Succeeded {
                reference: format!("sim_{}", Uuid::new_v4().simple()),
            },
            PaymentMode::Decline => PaymentOutcome::Declined {
                message: format!("Card declined for intent {client_secret}"),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_success() {
        let gateway = SimulatedGateway::new(PaymentMode::Simulated);
        let outcome = gateway.confirm("pi_1_secret", Money::from_major(150)).await.unwrap();
        match outcome {
            PaymentOutcome::Succeeded { reference } => assert!(reference.starts_with("sim_")),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_simulated_decline() {
        let gateway = SimulatedGateway::new(PaymentMode::Decline);
        let outcome = gateway.confirm("pi_1_secret", Money::from_major(150)).await.unwrap();
        assert!(matches!(outcome, PaymentOutcome::Declined { .. }));
    }
}

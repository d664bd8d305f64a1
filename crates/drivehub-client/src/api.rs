//! # REST Backend
//!
//! [`HttpBackend`] speaks the booking backend's JSON API over reqwest.
//!
//! ## Response Envelope
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  2xx  {"success": true,  "booking": {...}}  → Ok(payload)               │
//! │  2xx  {"clientSecret": "pi_..."}            → Ok(payload)  (no flag)    │
//! │  any  {"success": false, "message": "..."}  → ClientError::Backend      │
//! │  4xx/5xx with a message                     → ClientError::Backend      │
//! │  4xx/5xx without a readable body            → ClientError::Http         │
//! │  2xx that doesn't match the payload shape   → UnexpectedResponse        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Money crosses the wire as decimal major units and is converted to
//! [`Money`] here and nowhere else.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::backend::{BookingBackend, Registration};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::SessionIdentity;
use drivehub_core::lifecycle::BookingDraft;
use drivehub_core::{Booking, BookingStatus, Money, Role, User};

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    role: Role,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBookingBody<'a> {
    car: &'a str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_price: f64,
}

#[derive(Debug, Serialize)]
struct PaymentIntentBody {
    amount: f64,
}

#[derive(Debug, Deserialize)]
struct AuthPayload {
    token: String,
    user: User,
}

#[derive(Debug, Deserialize)]
struct BookingPayload {
    booking: WireBooking,
}

#[derive(Debug, Deserialize)]
struct BookingListPayload {
    #[serde(default)]
    bookings: Vec<WireBooking>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentIntentPayload {
    client_secret: String,
}

/// A booking as the backend returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBooking {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    car: CarRef,
    #[serde(default)]
    user: Option<UserRef>,
    start_date: String,
    end_date: String,
    total_price: f64,
    #[serde(default)]
    status: BookingStatus,
    #[serde(default)]
    created_at: Option<String>,
}

/// `booking.car` is either an id or the populated vehicle.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CarRef {
    Id(String),
    Populated(WireCar),
}

#[derive(Debug, Deserialize)]
struct WireCar {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    #[serde(default)]
    brand: String,
    #[serde(default)]
    model: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UserRef {
    Id(String),
    Populated {
        #[serde(rename = "_id", alias = "id")]
        id: String,
    },
}

impl WireBooking {
    /// Converts to the domain booking. A bare car id takes its brand and
    /// model from `draft` when there is one.
    fn into_booking(self, draft: Option<&BookingDraft>) -> ClientResult<Booking> {
        let (vehicle_id, vehicle_brand, vehicle_model) = match self.car {
            CarRef::Populated(car) => (car.id, car.brand, car.model),
            CarRef::Id(id) => match draft {
                Some(d) => (id, d.vehicle_brand.clone(), d.vehicle_model.clone()),
                None => (id, String::new(), String::new()),
            },
        };

        let total_price = Money::from_wire_amount(self.total_price).ok_or_else(|| {
            ClientError::UnexpectedResponse(format!("bad totalPrice: {}", self.total_price))
        })?;

        let created_at = self
            .created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        Ok(Booking {
            id: self.id,
            vehicle_id,
            user_id: self.user.map(|u| match u {
                UserRef::Id(id) | UserRef::Populated { id } => id,
            }),
            vehicle_brand,
            vehicle_model,
            pickup_date: parse_wire_date("startDate", &self.start_date)?,
            return_date: parse_wire_date("endDate", &self.end_date)?,
            total_price,
            status: self.status,
            created_at,
        })
    }
}

/// `YYYY-MM-DD` or RFC 3339; only the date is kept.
fn parse_wire_date(field: &str, input: &str) -> ClientResult<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(input).map(|dt| dt.date_naive()))
        .map_err(|_| ClientError::UnexpectedResponse(format!("bad {field}: {input}")))
}

// =============================================================================
// Envelope Handling
// =============================================================================

fn parse_envelope<T: DeserializeOwned>(status: u16, body: &str) -> ClientResult<T> {
    let ok_status = (200..300).contains(&status);

    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) if !ok_status => return Err(ClientError::Http { status }),
        Err(e) => return Err(e.into()),
    };

    let success = value
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(ok_status);

    if !success || !ok_status {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        return Err(match message {
            Some(message) => ClientError::Backend { message },
            None if ok_status => ClientError::Backend {
                message: "Request failed".to_string(),
            },
            None => ClientError::Http { status },
        });
    }

    Ok(serde_json::from_value(value)?)
}

/// Like [`parse_envelope`] but the payload is ignored and an empty 2xx body
/// is accepted.
fn parse_ack(status: u16, body: &str) -> ClientResult<()> {
    if (200..300).contains(&status) && body.trim().is_empty() {
        return Ok(());
    }
    parse_envelope::<IgnoredAny>(status, body).map(|_| ())
}

async fn read_body(response: reqwest::Response) -> ClientResult<(u16, String)> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok((status, body))
}

// =============================================================================
// HTTP Backend
// =============================================================================

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
}

impl HttpBackend {
    /// `timeout` of `None` means requests wait indefinitely.
    pub fn new(mut base: Url, timeout: Option<Duration>) -> ClientResult<Self> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(HttpBackend { client, base })
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::new(config.base_url()?, config.request_timeout())
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base.join(path)?)
    }
}

#[async_trait]
impl BookingBackend for HttpBackend {
    async fn login(&self, email: &str, password: &str) -> ClientResult<SessionIdentity> {
        let url = self.endpoint("api/user/login")?;
        debug!(%url, email = %email, "Logging in");

        let response = self
            .client
            .post(url)
            .json(&LoginBody { email, password })
            .send()
            .await?;
        let (status, body) = read_body(response).await?;
        let auth: AuthPayload = parse_envelope(status, &body)?;

        Ok(SessionIdentity {
            token: auth.token,
            user: auth.user,
        })
    }

    async fn register(&self, registration: &Registration) -> ClientResult<SessionIdentity> {
        let url = self.endpoint("api/user/register")?;
        debug!(%url, email = %registration.email, "Registering");

        let response = self
            .client
            .post(url)
            .json(&RegisterBody {
                name: &registration.name,
                email: &registration.email,
                password: &registration.password,
                role: Role::Renter,
            })
            .send()
            .await?;
        let (status, body) = read_body(response).await?;
        let auth: AuthPayload = parse_envelope(status, &body)?;

        Ok(SessionIdentity {
            token: auth.token,
            user: auth.user,
        })
    }

    async fn create_booking(&self, token: &str, draft: &BookingDraft) -> ClientResult<Booking> {
        let url = self.endpoint("api/booking")?;
        debug!(%url, vehicle_id = %draft.vehicle_id, "Creating booking");

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&CreateBookingBody {
                car: &draft.vehicle_id,
                start_date: draft.pickup_date,
                end_date: draft.return_date,
                total_price: draft.total_price.to_wire_amount(),
            })
            .send()
            .await?;
        let (status, body) = read_body(response).await?;
        let payload: BookingPayload = parse_envelope(status, &body)?;

        payload.booking.into_booking(Some(draft))
    }

    async fn list_bookings(&self, token: &str) -> ClientResult<Vec<Booking>> {
        let url = self.endpoint("api/booking")?;
        debug!(%url, "Listing bookings");

        let response = self.client.get(url).bearer_auth(token).send().await?;
        let (status, body) = read_body(response).await?;
        let payload: BookingListPayload = parse_envelope(status, &body)?;

        payload
            .bookings
            .into_iter()
            .map(|b| b.into_booking(None))
            .collect()
    }

    async fn mark_paid(&self, token: &str, booking_id: &str) -> ClientResult<()> {
        let url = self.endpoint(&format!("api/booking/{booking_id}/pay"))?;
        debug!(%url, "Marking booking paid");

        let response = self.client.put(url).bearer_auth(token).send().await?;
        let (status, body) = read_body(response).await?;
        parse_ack(status, &body)
    }

    async fn create_payment_intent(&self, token: &str, amount: Money) -> ClientResult<String> {
        let url = self.endpoint("api/payment/create-payment-intent")?;
        debug!(%url, amount = %amount, "Creating payment intent");

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&PaymentIntentBody {
                amount: amount.to_wire_amount(),
            })
            .send()
            .await?;
        let (status, body) = read_body(response).await?;
        let payload: PaymentIntentPayload = parse_envelope(status, &body)?;

        Ok(payload.client_secret)
    }
}

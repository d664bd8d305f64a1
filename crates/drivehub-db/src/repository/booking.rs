//! # Booking Repository
//!
//! The owner's local booking ledger.
//!
//! ## Guarded Status Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update_status(id, next)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load current row ──► missing? → DbError::NotFound                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  current.can_transition_to(next)? ── no → DbError::Rule(               │
//! │       │                                     InvalidStatusTransition)    │
//! │       ▼                                                                 │
//! │  UPDATE bookings SET status = next                                      │
//! │   WHERE id = ? AND status = current   ← loses to a concurrent writer   │
//! │       │                                                                 │
//! │       └── 0 rows? → DbError::TransactionFailed                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use drivehub_core::{Booking, BookingStatus, CoreError, Money};

const SELECT_BOOKING: &str = r#"
    SELECT
        id, vehicle_id, user_id, vehicle_brand, vehicle_model,
        pickup_date, return_date, total_price_cents, status, created_at
    FROM bookings
"#;

#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: String,
    vehicle_id: String,
    user_id: Option<String>,
    vehicle_brand: String,
    vehicle_model: String,
    pickup_date: NaiveDate,
    return_date: NaiveDate,
    total_price_cents: i64,
    status: BookingStatus,
    created_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            vehicle_id: row.vehicle_id,
            user_id: row.user_id,
            vehicle_brand: row.vehicle_brand,
            vehicle_model: row.vehicle_model,
            pickup_date: row.pickup_date,
            return_date: row.return_date,
            total_price: Money::from_cents(row.total_price_cents),
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Repository for the local booking ledger.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    /// Records a booking.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - a booking with that id exists
    pub async fn insert(&self, booking: &Booking) -> DbResult<Booking> {
        debug!(id = %booking.id, vehicle_id = %booking.vehicle_id, "Recording booking");

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, vehicle_id, user_id, vehicle_brand, vehicle_model,
                pickup_date, return_date, total_price_cents, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.vehicle_id)
        .bind(&booking.user_id)
        .bind(&booking.vehicle_brand)
        .bind(&booking.vehicle_model)
        .bind(booking.pickup_date)
        .bind(booking.return_date)
        .bind(booking.total_price.cents())
        .bind(booking.status)
        .bind(booking.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &booking.id),
            other => other,
        })?;

        Ok(booking.clone())
    }

    /// All bookings, newest first.
    pub async fn list(&self) -> DbResult<Vec<Booking>> {
        debug!("Listing bookings");

        let sql = format!("{SELECT_BOOKING} ORDER BY created_at DESC, rowid DESC");
        let rows: Vec<BookingRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    /// Bookings created by one renter, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Booking>> {
        debug!(user_id = %user_id, "Listing bookings for user");

        let sql = format!(
            "{SELECT_BOOKING} WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC"
        );
        let rows: Vec<BookingRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<Booking>> {
        let sql = format!("{SELECT_BOOKING} WHERE id = ?1");
        let row: Option<BookingRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Booking::from))
    }

    /// Moves a booking to `next` if the status rules allow it.
    ///
    /// ## Returns
    /// * `Ok(Booking)` - the booking with its new status
    /// * `Err(DbError::NotFound)` - unknown id
    /// * `Err(DbError::Rule(CoreError::InvalidStatusTransition))` - not allowed
    pub async fn update_status(&self, id: &str, next: BookingStatus) -> DbResult<Booking> {
        debug!(id = %id, next = %next, "Updating booking status");

        let mut booking = self
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Booking", id))?;
        let current = booking.status;

        booking.transition_to(next)?;

        let result = sqlx::query("UPDATE bookings SET status = ?3 WHERE id = ?1 AND status = ?2")
            .bind(id)
            .bind(current)
            .bind(next)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::TransactionFailed(format!(
                "booking {id} changed while being updated"
            )));
        }

        info!(id = %id, from = %current, to = %next, "Booking status changed");
        Ok(booking)
    }

    /// Cancels a pending booking.
    pub async fn cancel(&self, id: &str) -> DbResult<Booking> {
        self.update_status(id, BookingStatus::Cancelled).await
    }

    /// Marks a confirmed booking paid. Already-paid bookings are returned
    /// unchanged.
    pub async fn mark_paid(&self, id: &str) -> DbResult<Booking> {
        match self.update_status(id, BookingStatus::Paid).await {
            Err(DbError::Rule(CoreError::InvalidStatusTransition {
                from: BookingStatus::Paid,
                ..
            })) => self
                .get(id)
                .await?
                .ok_or_else(|| DbError::not_found("Booking", id)),
            other => other,
        }
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Owner Commands
//!
//! Catalog administration and the booking overview. Every command here
//! checks the signed-in role first.
//!
//! ## Access
//! ```text
//! signed out ─────► UNAUTHENTICATED
//! renter ─────────► FORBIDDEN
//! owner ──────────► runs against the local catalog and ledger
//! ```

use chrono::{DateTime, Datelike, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::commands::{BookingDto, VehicleDto};
use crate::error::{ApiError, ErrorCode};
use crate::state::{DbState, SessionState};
use drivehub_core::owner::{
    owner_vehicle_view, BookingFilter, DashboardSummary, VehicleFilter, VehicleSort,
};
use drivehub_core::validation::{validate_new_vehicle, validate_vehicle_update};
use drivehub_core::{
    BookingStatus, NewVehicle, User, VehicleCategory, VehicleUpdate, FEATURE_OPTIONS,
};

/// The signed-in owner, or the reason the command is refused.
pub fn require_owner(session: &SessionState) -> Result<&User, ApiError> {
    match session.session().user() {
        None => Err(ApiError::new(ErrorCode::Unauthenticated, "Please log in first")),
        Some(user) if !user.is_owner() => Err(ApiError::forbidden("Owner access required")),
        Some(user) => Ok(user),
    }
}

pub async fn dashboard(db: &DbState, session: &SessionState) -> Result<DashboardSummary, ApiError> {
    debug!("dashboard command");
    require_owner(session)?;

    let vehicles = db.inner().vehicles().list(false).await?;
    let bookings = db.inner().bookings().list().await?;

    Ok(DashboardSummary::compute(&vehicles, &bookings))
}

/// The owner's catalog table: filtered, then sorted if a sort is given.
pub async fn owner_cars(
    db: &DbState,
    session: &SessionState,
    search: Option<&str>,
    category: Option<&str>,
    sort: Option<&str>,
) -> Result<Vec<VehicleDto>, ApiError> {
    debug!(?search, ?category, ?sort, "owner_cars command");
    require_owner(session)?;

    let filter = VehicleFilter {
        search: search.map(str::to_string),
        category: category.map(str::parse::<VehicleCategory>).transpose()?,
    };
    let sort = sort.map(str::parse::<VehicleSort>).transpose()?;

    let vehicles = db.inner().vehicles().list(false).await?;
    Ok(owner_vehicle_view(&vehicles, &filter, sort)
        .into_iter()
        .map(VehicleDto::from)
        .collect())
}

/// The feature checkboxes offered when listing a car.
pub fn feature_options() -> Vec<String> {
    FEATURE_OPTIONS.iter().map(|f| f.to_string()).collect()
}

/// Lists a new car owned by the signed-in owner.
pub async fn add_car(
    db: &DbState,
    session: &SessionState,
    car: NewVehicle,
    now: DateTime<Utc>,
) -> Result<VehicleDto, ApiError> {
    debug!(brand = %car.brand, model = %car.model, "add_car command");
    let owner = require_owner(session)?;

    validate_new_vehicle(&car, now.year())?;

    let vehicle = car.into_vehicle(Uuid::new_v4().to_string(), Some(owner.id.clone()), now);
    let stored = db.inner().vehicles().insert(&vehicle).await?;

    info!(id = %stored.id, owner_id = %owner.id, "Vehicle listed");
    Ok(VehicleDto::from(&stored))
}

pub async fn edit_car(
    db: &DbState,
    session: &SessionState,
    id: &str,
    update: VehicleUpdate,
    current_year: i32,
) -> Result<VehicleDto, ApiError> {
    debug!(id = %id, "edit_car command");
    require_owner(session)?;

    if update.is_empty() {
        return Err(ApiError::validation("Nothing to update"));
    }
    validate_vehicle_update(&update, current_year)?;

    let vehicle = db.inner().vehicles().update(id, &update).await?;
    Ok(VehicleDto::from(&vehicle))
}

pub async fn delete_car(db: &DbState, session: &SessionState, id: &str) -> Result<(), ApiError> {
    debug!(id = %id, "delete_car command");
    require_owner(session)?;

    db.inner().vehicles().delete(id).await?;
    info!(id = %id, "Vehicle removed");
    Ok(())
}

/// All ledger bookings, newest first, filtered by car name and status.
pub async fn owner_bookings(
    db: &DbState,
    session: &SessionState,
    search: Option<&str>,
    status: Option<&str>,
) -> Result<Vec<BookingDto>, ApiError> {
    debug!(?search, ?status, "owner_bookings command");
    require_owner(session)?;

    let filter = BookingFilter {
        search: search.map(str::to_string),
        status: status.map(str::parse::<BookingStatus>).transpose()?,
    };

    let bookings = db.inner().bookings().list().await?;
    Ok(filter
        .apply(&bookings)
        .into_iter()
        .map(BookingDto::from)
        .collect())
}

/// Cancels a pending booking.
pub async fn cancel_booking(
    db: &DbState,
    session: &SessionState,
    id: &str,
) -> Result<BookingDto, ApiError> {
    debug!(id = %id, "cancel_booking command");
    require_owner(session)?;

    let booking = db.inner().bookings().cancel(id).await?;
    Ok(BookingDto::from(&booking))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use drivehub_core::{Booking, Money, Role};

    async fn ledger_booking(db: &DbState, id: &str, brand: &str, status: BookingStatus, total: i64) {
        let booking = Booking {
            id: id.to_string(),
            vehicle_id: "car-1".to_string(),
            user_id: Some("u9".to_string()),
            vehicle_brand: brand.to_string(),
            vehicle_model: "Model".to_string(),
            pickup_date: chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            return_date: chrono::NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            total_price: Money::from_major(total),
            status,
            created_at: Utc::now(),
        };
        db.inner().bookings().insert(&booking).await.unwrap();
    }

    #[tokio::test]
    async fn test_owner_gate() {
        let db = testing::db().await;

        let err = dashboard(&db, &testing::session(None)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);

        let err = dashboard(&db, &testing::session(Some(Role::Renter)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        assert!(dashboard(&db, &testing::session(Some(Role::Owner))).await.is_ok());
    }

    #[tokio::test]
    async fn test_add_edit_delete() {
        let db = testing::db().await;
        let owner = testing::session(Some(Role::Owner));

        let mut car = testing::new_vehicle("Tesla", "Model 3", VehicleCategory::Sedan, 110);
        car.features.push("Autopilot".to_string());
        let added = add_car(&db, &owner, car, Utc::now()).await.unwrap();
        assert!(added.is_available);
        assert!(feature_options().contains(&added.features[0]));
        assert!(!feature_options().contains(&added.features[1]));

        let stored = db.inner().vehicles().get_required(&added.id).await.unwrap();
        assert_eq!(stored.owner_id.as_deref(), Some("u1"));

        let update = VehicleUpdate {
            daily_rate: Some(Money::from_major(95)),
            is_available: Some(false),
            ..Default::default()
        };
        let edited = edit_car(&db, &owner, &added.id, update, 2025).await.unwrap();
        assert_eq!(edited.daily_rate_cents, 9_500);
        assert!(!edited.is_available);

        let err = edit_car(&db, &owner, &added.id, VehicleUpdate::default(), 2025)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        delete_car(&db, &owner, &added.id).await.unwrap();
        let err = delete_car(&db, &owner, &added.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_add_car_validation() {
        let db = testing::db().await;
        let owner = testing::session(Some(Role::Owner));

        let mut car = testing::new_vehicle("Tesla", "Model 3", VehicleCategory::Sedan, 110);
        car.features.clear();
        let err = add_car(&db, &owner, car, Utc::now()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(db.inner().vehicles().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_owner_cars_filter_and_sort() {
        let db = testing::db().await;
        testing::seed(&db, "car-1", "Toyota", "Corolla", VehicleCategory::Sedan, 60).await;
        testing::seed(&db, "car-2", "Honda", "Civic", VehicleCategory::Sedan, 55).await;
        testing::seed(&db, "car-3", "Jeep", "Wrangler", VehicleCategory::Suv, 120).await;
        let owner = testing::session(Some(Role::Owner));

        let rows = owner_cars(&db, &owner, None, Some("sedan"), Some("price-asc"))
            .await
            .unwrap();
        let ids: Vec<_> = rows.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["car-2", "car-1"]);

        let err = owner_cars(&db, &owner, None, None, Some("cheapest"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_bookings_cancel_and_revenue() {
        let db = testing::db().await;
        ledger_booking(&db, "bk-1", "Toyota", BookingStatus::Pending, 100).await;
        ledger_booking(&db, "bk-2", "Jeep", BookingStatus::Confirmed, 200).await;
        ledger_booking(&db, "bk-3", "Toyota", BookingStatus::Paid, 300).await;
        let owner = testing::session(Some(Role::Owner));

        let rows = owner_bookings(&db, &owner, Some("toyota"), None).await.unwrap();
        assert_eq!(rows.len(), 2);

        let rows = owner_bookings(&db, &owner, None, Some("confirmed")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "bk-2");

        let summary = dashboard(&db, &owner).await.unwrap();
        assert_eq!(summary.total_bookings, 3);
        assert_eq!(summary.revenue, Money::from_major(500));

        let cancelled = cancel_booking(&db, &owner, "bk-1").await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let err = cancel_booking(&db, &owner, "bk-2").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }
}

//! # Catalog Commands
//!
//! Public vehicle browsing: search, detail, price quote and
//! recommendations. None of these need a session.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::commands::VehicleDto;
use crate::error::ApiError;
use crate::state::DbState;
use drivehub_core::pricing::quote;
use drivehub_core::recommend::{recommend, LastRental, RecommendationContext};
use drivehub_core::validation::{parse_booking_date, validate_search_query};
use drivehub_core::VehicleCategory;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDto {
    pub vehicle_id: String,
    pub daily_rate_cents: i64,
    /// None when the dates do not form a bookable period.
    pub days: Option<i64>,
    /// Zero when not computable.
    pub total_cents: i64,
    pub computable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationDto {
    pub vehicle: VehicleDto,
    pub reason: String,
}

/// Lists cars, optionally filtered by a search query.
///
/// Unavailable cars are hidden unless `include_unavailable` is set.
pub async fn list_cars(
    db: &DbState,
    search: Option<&str>,
    include_unavailable: bool,
) -> Result<Vec<VehicleDto>, ApiError> {
    debug!(search = ?search, include_unavailable, "list_cars command");

    let repo = db.inner().vehicles();
    let vehicles = match search {
        Some(q) => {
            let q = validate_search_query(q)?;
            repo.search(&q, !include_unavailable).await?
        }
        None => repo.list(!include_unavailable).await?,
    };

    Ok(vehicles.iter().map(VehicleDto::from).collect())
}

pub async fn get_car(db: &DbState, id: &str) -> Result<VehicleDto, ApiError> {
    debug!(id = %id, "get_car command");

    let vehicle = db.inner().vehicles().get_required(id).await?;
    Ok(VehicleDto::from(&vehicle))
}

/// Prices a rental without booking it.
///
/// Dates that parse but do not form a positive period give a
/// non-computable quote rather than an error.
pub async fn quote_car(
    db: &DbState,
    id: &str,
    pickup: &str,
    return_date: &str,
) -> Result<QuoteDto, ApiError> {
    debug!(id = %id, pickup = %pickup, return_date = %return_date, "quote_car command");

    let pickup: NaiveDate = parse_booking_date("pickup date", pickup)?;
    let return_date: NaiveDate = parse_booking_date("return date", return_date)?;
    let vehicle = db.inner().vehicles().get_required(id).await?;

    let q = quote(Some(pickup), Some(return_date), vehicle.daily_rate);

    Ok(QuoteDto {
        vehicle_id: vehicle.id,
        daily_rate_cents: vehicle.daily_rate.cents(),
        days: q.days(),
        total_cents: q.total_or_zero().cents(),
        computable: q.is_computable(),
    })
}

/// Suggests cars from the last rental, destination and weather.
pub async fn recommend_cars(
    db: &DbState,
    last_category: Option<&str>,
    last_car: Option<&str>,
    destination: Option<&str>,
    weather: Option<&str>,
) -> Result<Vec<RecommendationDto>, ApiError> {
    debug!(?last_category, ?destination, ?weather, "recommend_cars command");

    let last_rental = match last_category {
        Some(category) => Some(LastRental {
            category: category.parse::<VehicleCategory>()?,
            vehicle_id: last_car.map(str::to_string),
        }),
        None => None,
    };

    let ctx = RecommendationContext {
        last_rental,
        destination: destination.map(str::to_string),
        weather: weather.map(str::to_string),
    };

    let vehicles = db.inner().vehicles().list(false).await?;

    Ok(recommend(&vehicles, &ctx)
        .into_iter()
        .map(|r| RecommendationDto {
            vehicle: VehicleDto::from(r.vehicle),
            reason: r.reason,
        })
        .collect())
}

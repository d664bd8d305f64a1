//! # Vehicle Repository
//!
//! The catalog: listing, lookup, and the owner's add/edit/delete.
//!
//! ## Row Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  vehicles row                        Vehicle (drivehub-core)            │
//! │  ─────────────────────────           ─────────────────────────          │
//! │  daily_rate_cents INTEGER   ──────►  daily_rate: Money                  │
//! │  seating_capacity INTEGER   ──────►  seating_capacity: u32              │
//! │  category TEXT 'suv'        ──────►  VehicleCategory::Suv               │
//! │  features TEXT '["GPS"]'    ──────►  features: Vec<String>              │
//! │  is_available INTEGER       ──────►  is_available: bool                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! A row that cannot be mapped back surfaces as [`DbError::Corrupt`].

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use drivehub_core::catalog;
use drivehub_core::{FuelType, Money, Transmission, Vehicle, VehicleCategory, VehicleUpdate};

const SELECT_VEHICLE: &str = r#"
    SELECT
        id, owner_id, brand, model, year, category,
        daily_rate_cents, seating_capacity, fuel_type, transmission,
        location, description, image, is_available, features,
        created_at, updated_at
    FROM vehicles
"#;

#[derive(Debug, sqlx::FromRow)]
struct VehicleRow {
    id: String,
    owner_id: Option<String>,
    brand: String,
    model: String,
    year: i64,
    category: VehicleCategory,
    daily_rate_cents: i64,
    seating_capacity: i64,
    fuel_type: FuelType,
    transmission: Transmission,
    location: String,
    description: String,
    image: Option<String>,
    is_available: bool,
    features: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<VehicleRow> for Vehicle {
    type Error = DbError;

    fn try_from(row: VehicleRow) -> Result<Self, Self::Error> {
        let features: Vec<String> = serde_json::from_str(&row.features)
            .map_err(|e| DbError::corrupt("Vehicle", &row.id, format!("features: {e}")))?;
        let year = i32::try_from(row.year)
            .map_err(|_| DbError::corrupt("Vehicle", &row.id, "year out of range"))?;
        let seating_capacity = u32::try_from(row.seating_capacity)
            .map_err(|_| DbError::corrupt("Vehicle", &row.id, "seating_capacity out of range"))?;

        Ok(Vehicle {
            id: row.id,
            owner_id: row.owner_id,
            brand: row.brand,
            model: row.model,
            year,
            category: row.category,
            daily_rate: Money::from_cents(row.daily_rate_cents),
            seating_capacity,
            fuel_type: row.fuel_type,
            transmission: row.transmission,
            location: row.location,
            description: row.description,
            image: row.image,
            is_available: row.is_available,
            features,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn encode_features(vehicle: &Vehicle) -> DbResult<String> {
    serde_json::to_string(&vehicle.features)
        .map_err(|e| DbError::Internal(format!("encoding features: {e}")))
}

/// Repository for the vehicle catalog.
///
/// ```rust,ignore
/// let repo = db.vehicles();
/// let suvs = repo.search("suv", true).await?;
/// let car = repo.get_required("car-1").await?;
/// ```
#[derive(Debug, Clone)]
pub struct VehicleRepository {
    pool: SqlitePool,
}

impl VehicleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        VehicleRepository { pool }
    }

    /// Lists vehicles in listing order (oldest first).
    pub async fn list(&self, available_only: bool) -> DbResult<Vec<Vehicle>> {
        debug!(available_only, "Listing vehicles");

        let sql = if available_only {
            format!("{SELECT_VEHICLE} WHERE is_available = 1 ORDER BY created_at, rowid")
        } else {
            format!("{SELECT_VEHICLE} ORDER BY created_at, rowid")
        };

        let rows: Vec<VehicleRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(Vehicle::try_from).collect()
    }

    /// Public catalog search over brand, model, category, location and
    /// description. An empty query lists everything.
    ///
    /// Matching follows [`drivehub_core::catalog::matches_query`].
    pub async fn search(&self, query: &str, available_only: bool) -> DbResult<Vec<Vehicle>> {
        let query = query.trim();
        debug!(query = %query, available_only, "Searching vehicles");

        let vehicles = self.list(available_only).await?;
        if query.is_empty() {
            return Ok(vehicles);
        }

        let matches: Vec<Vehicle> = vehicles
            .into_iter()
            .filter(|v| catalog::matches_query(v, query))
            .collect();

        debug!(count = matches.len(), "Search returned vehicles");
        Ok(matches)
    }

    /// Gets a vehicle by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Vehicle))` - found
    /// * `Ok(None)` - no such vehicle
    pub async fn get(&self, id: &str) -> DbResult<Option<Vehicle>> {
        let sql = format!("{SELECT_VEHICLE} WHERE id = ?1");
        let row: Option<VehicleRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Vehicle::try_from).transpose()
    }

    /// Like [`get`](Self::get) but a missing vehicle is `NotFound`.
    pub async fn get_required(&self, id: &str) -> DbResult<Vehicle> {
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Vehicle", id))
    }

    /// Inserts a new vehicle (id generated by the caller).
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - id already exists
    pub async fn insert(&self, vehicle: &Vehicle) -> DbResult<Vehicle> {
        debug!(id = %vehicle.id, brand = %vehicle.brand, model = %vehicle.model, "Inserting vehicle");

        let features = encode_features(vehicle)?;

        sqlx::query(
            r#"
            INSERT INTO vehicles (
                id, owner_id, brand, model, year, category,
                daily_rate_cents, seating_capacity, fuel_type, transmission,
                location, description, image, is_available, features,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14, ?15,
                ?16, ?17
            )
            "#,
        )
        .bind(&vehicle.id)
        .bind(&vehicle.owner_id)
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(vehicle.category)
        .bind(vehicle.daily_rate.cents())
        .bind(i64::from(vehicle.seating_capacity))
        .bind(vehicle.fuel_type)
        .bind(vehicle.transmission)
        .bind(&vehicle.location)
        .bind(&vehicle.description)
        .bind(&vehicle.image)
        .bind(vehicle.is_available)
        .bind(features)
        .bind(vehicle.created_at)
        .bind(vehicle.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &vehicle.id),
            other => other,
        })?;

        Ok(vehicle.clone())
    }

    /// Applies an owner edit and returns the stored result.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no vehicle with that id
    pub async fn update(&self, id: &str, update: &VehicleUpdate) -> DbResult<Vehicle> {
        debug!(id = %id, "Updating vehicle");

        let mut vehicle = self.get_required(id).await?;
        update.apply_to(&mut vehicle);
        vehicle.updated_at = Utc::now();

        let features = encode_features(&vehicle)?;

        let result = sqlx::query(
            r#"
            UPDATE vehicles SET
                brand = ?2,
                model = ?3,
                year = ?4,
                category = ?5,
                daily_rate_cents = ?6,
                seating_capacity = ?7,
                fuel_type = ?8,
                transmission = ?9,
                location = ?10,
                description = ?11,
                image = ?12,
                is_available = ?13,
                features = ?14,
                updated_at = ?15
            WHERE id = ?1
            "#,
        )
        .bind(&vehicle.id)
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(vehicle.category)
        .bind(vehicle.daily_rate.cents())
        .bind(i64::from(vehicle.seating_capacity))
        .bind(vehicle.fuel_type)
        .bind(vehicle.transmission)
        .bind(&vehicle.location)
        .bind(&vehicle.description)
        .bind(&vehicle.image)
        .bind(vehicle.is_available)
        .bind(features)
        .bind(vehicle.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Vehicle", id));
        }

        Ok(vehicle)
    }

    /// Removes a vehicle from the catalog.
    ///
    /// Ledger bookings for it are kept; they carry a brand/model snapshot.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting vehicle");

        let result = sqlx::query("DELETE FROM vehicles WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Vehicle", id));
        }

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vehicles")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use drivehub_core::NewVehicle;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn vehicle(id: &str, brand: &str, model: &str, category: VehicleCategory) -> Vehicle {
        NewVehicle {
            brand: brand.to_string(),
            model: model.to_string(),
            year: 2022,
            category,
            daily_rate: Money::from_cents(12_999),
            seating_capacity: 5,
            fuel_type: FuelType::Hybrid,
            transmission: Transmission::SemiAutomatic,
            location: "Los Angeles".to_string(),
            description: "Test listing".to_string(),
            image: Some("/cars/test.png".to_string()),
            features: vec!["GPS".to_string(), "Sunroof".to_string()],
        }
        .into_vehicle(id.to_string(), Some("owner-1".to_string()), Utc::now())
    }

    #[tokio::test]
    async fn test_insert_and_get_roundtrip() {
        let db = db().await;
        let repo = db.vehicles();
        let car = vehicle("car-1", "BMW", "X5", VehicleCategory::Suv);

        repo.insert(&car).await.unwrap();
        let stored = repo.get_required("car-1").await.unwrap();

        assert_eq!(stored.brand, "BMW");
        assert_eq!(stored.category, VehicleCategory::Suv);
        assert_eq!(stored.transmission, Transmission::SemiAutomatic);
        assert_eq!(stored.daily_rate, Money::from_cents(12_999));
        assert_eq!(stored.features, car.features);
        assert!(stored.is_available);
        assert!(repo.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let db = db().await;
        let repo = db.vehicles();
        let car = vehicle("car-1", "BMW", "X5", VehicleCategory::Suv);
        repo.insert(&car).await.unwrap();

        let err = repo.insert(&car).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_and_search() {
        let db = db().await;
        let repo = db.vehicles();
        repo.insert(&vehicle("car-1", "BMW", "X5", VehicleCategory::Suv))
            .await
            .unwrap();
        repo.insert(&vehicle("car-2", "Toyota", "Corolla", VehicleCategory::Sedan))
            .await
            .unwrap();

        let mut hidden = vehicle("car-3", "Mazda", "MX-5", VehicleCategory::Convertible);
        hidden.is_available = false;
        repo.insert(&hidden).await.unwrap();

        assert_eq!(repo.list(false).await.unwrap().len(), 3);
        assert_eq!(repo.list(true).await.unwrap().len(), 2);

        let found = repo.search("sedan", true).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "car-2");

        assert!(repo.search("mazda", true).await.unwrap().is_empty());
        assert_eq!(repo.search("mazda", false).await.unwrap().len(), 1);
        assert_eq!(repo.search("  ", false).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_edit_persists() {
        let db = db().await;
        db.vehicles()
            .insert(&vehicle("car-1", "BMW", "X5", VehicleCategory::Suv))
            .await
            .unwrap();

        let update = VehicleUpdate {
            daily_rate: Some(Money::from_major(275)),
            is_available: Some(false),
            features: Some(vec!["Heated Seats".to_string()]),
            ..Default::default()
        };
        db.vehicles().update("car-1", &update).await.unwrap();

        // fresh repository sees the change
        let stored = db.vehicles().get_required("car-1").await.unwrap();
        assert_eq!(stored.daily_rate, Money::from_major(275));
        assert!(!stored.is_available);
        assert_eq!(stored.features, vec!["Heated Seats".to_string()]);
        assert_eq!(stored.model, "X5");
    }

    #[tokio::test]
    async fn test_edit_and_delete_unknown_id() {
        let db = db().await;
        let repo = db.vehicles();

        let err = repo
            .update("ghost", &VehicleUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let err = repo.delete("ghost").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_persists() {
        let db = db().await;
        db.vehicles()
            .insert(&vehicle("car-1", "BMW", "X5", VehicleCategory::Suv))
            .await
            .unwrap();
        db.vehicles().delete("car-1").await.unwrap();

        assert!(db.vehicles().get("car-1").await.unwrap().is_none());
        assert_eq!(db.vehicles().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_features_reported() {
        let db = db().await;
        db.vehicles()
            .insert(&vehicle("car-1", "BMW", "X5", VehicleCategory::Suv))
            .await
            .unwrap();
        sqlx::query("UPDATE vehicles SET features = 'not json' WHERE id = 'car-1'")
            .execute(db.pool())
            .await
            .unwrap();

        let err = db.vehicles().get("car-1").await.unwrap_err();
        assert!(matches!(err, DbError::Corrupt { .. }));
    }
}

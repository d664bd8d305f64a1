//! # Recommendations
//!
//! Rule-based vehicle suggestions from the renter's last rental, trip
//! destination and weather.
//!
//! ## Rules (applied in order, results accumulate)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. last rental       → first same-category car with a different id    │
//! │  2. destination ~ /mountain/i    → first SUV                           │
//! │  3. destination ~ /beach|sunny/i → first convertible                   │
//! │  4. weather ~ /rain|snow/i       → first SUV                           │
//! │  5. nothing matched   → first available car (else first car)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The same vehicle may be suggested by more than one rule.

use serde::{Deserialize, Serialize};

use crate::types::{Vehicle, VehicleCategory};

/// What the renter rented last time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastRental {
    pub category: VehicleCategory,
    pub vehicle_id: Option<String>,
}

/// Everything the rules look at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationContext {
    pub last_rental: Option<LastRental>,
    pub destination: Option<String>,
    pub weather: Option<String>,
}

/// A suggested vehicle and the reason shown next to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation<'a> {
    pub vehicle: &'a Vehicle,
    pub reason: String,
}

fn mentions_any(text: &Option<String>, words: &[&str]) -> bool {
    text.as_deref()
        .map(str::to_lowercase)
        .map_or(false, |t| words.iter().any(|w| t.contains(w)))
}

fn first_of(vehicles: &[Vehicle], category: VehicleCategory) -> Option<&Vehicle> {
    vehicles.iter().find(|v| v.category == category)
}

/// Runs the rules over `vehicles`.
///
/// Returns an empty list only when the catalog is empty.
pub fn recommend<'a>(vehicles: &'a [Vehicle], ctx: &RecommendationContext) -> Vec<Recommendation<'a>> {
    let mut picks = Vec::new();

    if let Some(last) = &ctx.last_rental {
        let similar = vehicles.iter().find(|v| {
            v.category == last.category && last.vehicle_id.as_deref() != Some(v.id.as_str())
        });
        if let Some(vehicle) = similar {
            picks.push(Recommendation {
                vehicle,
                reason: format!(
                    "You loved the {} last time. Try this similar model!",
                    last.category
                ),
            });
        }
    }

    if mentions_any(&ctx.destination, &["mountain"]) {
        if let Some(vehicle) = first_of(vehicles, VehicleCategory::Suv) {
            picks.push(Recommendation {
                vehicle,
                reason: "Recommended for mountain trips: better traction!".to_string(),
            });
        }
    }

    if mentions_any(&ctx.destination, &["beach", "sunny"]) {
        if let Some(vehicle) = first_of(vehicles, VehicleCategory::Convertible) {
            picks.push(Recommendation {
                vehicle,
                reason: "Perfect for sunny weather: try a convertible!".to_string(),
            });
        }
    }

    if mentions_any(&ctx.weather, &["rain", "snow"]) {
        if let Some(vehicle) = first_of(vehicles, VehicleCategory::Suv) {
            picks.push(Recommendation {
                vehicle,
                reason: "Weather alert: SUV recommended for safety.".to_string(),
            });
        }
    }

    if picks.is_empty() {
        let fallback = vehicles
            .iter()
            .find(|v| v.is_available)
            .or_else(|| vehicles.first());
        if let Some(vehicle) = fallback {
            picks.push(Recommendation {
                vehicle,
                reason: "Popular pick for your next trip!".to_string(),
            });
        }
    }

    picks
}

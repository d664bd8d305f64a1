//! Public catalog search.
//!
//! Renters search across brand, model, category, location and description;
//! the owner panel's narrower brand/model search lives in [`crate::owner`].
//! `VehicleRepository::search` applies [`matches_query`] to stored rows.

use crate::types::Vehicle;

/// True if `query` appears (case-insensitively) in any searchable field.
/// An empty query matches everything.
pub fn matches_query(vehicle: &Vehicle, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    [
        vehicle.brand.as_str(),
        vehicle.model.as_str(),
        vehicle.category.label(),
        vehicle.location.as_str(),
        vehicle.description.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

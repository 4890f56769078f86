//! Pickup points ("relais"): the canonical entity and its normalization
//! from the loosely-shaped records returned by the search endpoint.

mod normalize;
mod raw;

use serde::{Deserialize, Serialize};

use crate::hours::OpeningHour;

pub use normalize::{
    normalize_relay, normalize_relays, normalize_relays_with_distance, rank_by_distance,
    UNKNOWN_RELAY_ID, UNNAMED_RELAY,
};
pub use raw::{RawAddress, RawGeo, RawPlace, RawRelay, RelayShape, Scalar};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    pub street_address: String,
    pub postal_code: String,
    pub address_locality: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub address: PostalAddress,
    pub geo: GeoPoint,
}

/// A pickup point where group orders are collected.
///
/// Every field is always populated; normalization fills gaps with defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relay {
    /// Upstream identifier, coerced to a string.
    pub id: String,
    pub name: String,
    pub place: Place,
    #[serde(default)]
    pub opening_hours: Vec<OpeningHour>,
    /// Distance from the search origin; only set by
    /// [`normalize_relays_with_distance`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

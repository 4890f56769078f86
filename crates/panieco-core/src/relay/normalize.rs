//! Normalization from [`RawRelay`] records to canonical [`Relay`]s.
//!
//! Normalization is total: any missing or malformed field degrades to a
//! default and a batch never fails because of one bad record.

use std::cmp::Ordering;

use crate::geo::distance_km;

use super::raw::{RawRelay, RelayShape, Scalar};
use super::{GeoPoint, Place, PostalAddress, Relay};

/// Display name for records that arrive without one.
pub const UNNAMED_RELAY: &str = "Point relais sans nom";

/// Identifier for records that arrive without one.
pub const UNKNOWN_RELAY_ID: &str = "unknown";

/// Normalizes a single raw record.
#[must_use]
pub fn normalize_relay(raw: &RawRelay) -> Relay {
    let (address, geo, opening_hours) = match raw.shape() {
        RelayShape::Api {
            address,
            geo,
            opening_hours,
        } => (
            PostalAddress {
                street_address: text_or_empty(address.street_address.as_ref()),
                postal_code: text_or_empty(address.postal_code.as_ref()),
                address_locality: text_or_empty(address.address_locality.as_ref()),
            },
            GeoPoint {
                latitude: coordinate(geo.latitude.as_ref()),
                longitude: coordinate(geo.longitude.as_ref()),
            },
            opening_hours.map(<[_]>::to_vec).unwrap_or_default(),
        ),
        RelayShape::Flat(flat) => (
            PostalAddress {
                street_address: text_or_empty(flat.street_address.as_ref()),
                postal_code: text_or_empty(flat.postal_code.as_ref()),
                address_locality: text_or_empty(flat.city.as_ref()),
            },
            GeoPoint {
                latitude: coordinate(flat.latitude.as_ref()),
                longitude: coordinate(flat.longitude.as_ref()),
            },
            flat.raw_opening_hours.clone().unwrap_or_default(),
        ),
    };

    Relay {
        id: non_empty_text(raw.id.as_ref()).unwrap_or_else(|| UNKNOWN_RELAY_ID.to_string()),
        name: non_empty_text(raw.name.as_ref()).unwrap_or_else(|| UNNAMED_RELAY.to_string()),
        place: Place { address, geo },
        opening_hours,
        distance_km: None,
    }
}

/// Normalizes a batch, preserving input order.
#[must_use]
pub fn normalize_relays(raw: &[RawRelay]) -> Vec<Relay> {
    raw.iter().map(normalize_relay).collect()
}

/// Normalizes a batch and annotates each relay with its distance from
/// `(origin_lat, origin_lon)`. Input order is preserved; see
/// [`rank_by_distance`] for sorting.
#[must_use]
pub fn normalize_relays_with_distance(
    raw: &[RawRelay],
    origin_lat: f64,
    origin_lon: f64,
) -> Vec<Relay> {
    raw.iter()
        .map(|r| {
            let mut relay = normalize_relay(r);
            relay.distance_km = Some(distance_km(
                origin_lat,
                origin_lon,
                relay.place.geo.latitude,
                relay.place.geo.longitude,
            ));
            relay
        })
        .collect()
}

/// Stable sort by ascending distance. Relays without a usable distance sort last.
pub fn rank_by_distance(relays: &mut [Relay]) {
    relays.sort_by(|a, b| {
        match (usable_distance(a), usable_distance(b)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

fn usable_distance(relay: &Relay) -> Option<f64> {
    relay.distance_km.filter(|d| !d.is_nan())
}

fn coordinate(value: Option<&Scalar>) -> f64 {
    value.and_then(Scalar::as_f64).unwrap_or(0.0)
}

fn text_or_empty(value: Option<&Scalar>) -> String {
    value.map(Scalar::to_text).unwrap_or_default()
}

fn non_empty_text(value: Option<&Scalar>) -> Option<String> {
    value.map(Scalar::to_text).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;

//! Tolerant decoding of raw pickup-point records.
//!
//! ## Observed shapes
//!
//! ### API shape
//! Nested `place.address` (`streetAddress`, `postalCode`, `addressLocality`)
//! and `place.geo` (`latitude`, `longitude` as JSON numbers), with
//! `openingHours` at the top level.
//!
//! ### Legacy flat shape
//! `latitude`/`longitude` as decimal strings, `street_address`,
//! `postal_code`, `city`, and `raw_opening_hours`.
//!
//! Both shapes carry `id` (number or string) and `name`. Every field is
//! decoded leniently: a value of the wrong JSON type decodes as absent
//! instead of failing the whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::hours::OpeningHour;

/// A JSON scalar that may arrive as either a string or a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    /// Numeric value; strings are parsed after trimming. Non-finite values
    /// count as unparseable.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Scalar::Text(s) => s.trim().parse::<f64>().ok(),
            Scalar::Number(n) => n.as_f64(),
        };
        value.filter(|v| v.is_finite())
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Text(s) => s.clone(),
            Scalar::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeo {
    #[serde(default, deserialize_with = "lenient")]
    pub latitude: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub longitude: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAddress {
    #[serde(default, deserialize_with = "lenient")]
    pub street_address: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub postal_code: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub address_locality: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlace {
    #[serde(default, deserialize_with = "lenient")]
    pub geo: Option<RawGeo>,
    #[serde(default, deserialize_with = "lenient")]
    pub address: Option<RawAddress>,
}

/// A pickup-point record exactly as the search endpoint returned it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRelay {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<Scalar>,

    // Legacy flat shape.
    #[serde(default, deserialize_with = "lenient")]
    pub latitude: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub longitude: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub street_address: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub postal_code: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub city: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_hours")]
    pub raw_opening_hours: Option<Vec<OpeningHour>>,

    // API shape.
    #[serde(default, deserialize_with = "lenient")]
    pub place: Option<RawPlace>,
    #[serde(default, rename = "openingHours", deserialize_with = "lenient_hours")]
    pub opening_hours: Option<Vec<OpeningHour>>,
}

/// Which of the two upstream shapes a record uses, resolved once.
#[derive(Debug, Clone, Copy)]
pub enum RelayShape<'a> {
    /// Nested `place.address` and `place.geo` are both present.
    Api {
        address: &'a RawAddress,
        geo: &'a RawGeo,
        opening_hours: Option<&'a [OpeningHour]>,
    },
    Flat(&'a RawRelay),
}

impl RawRelay {
    /// Decodes any JSON value into a record. Never fails: non-object input
    /// yields an empty record.
    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Self {
        // serde would otherwise accept a JSON array as a positional struct.
        if !value.is_object() {
            return Self::default();
        }
        Self::deserialize(value).unwrap_or_default()
    }

    /// The nested shape is authoritative only when both `place.address` and
    /// `place.geo` are present.
    #[must_use]
    pub fn shape(&self) -> RelayShape<'_> {
        match self.place.as_ref() {
            Some(RawPlace {
                address: Some(address),
                geo: Some(geo),
            }) => RelayShape::Api {
                address,
                geo,
                opening_hours: self.opening_hours.as_deref(),
            },
            _ => RelayShape::Flat(self),
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Keeps the well-formed entries of an opening-hours array and drops the rest.
fn lenient_hours<'de, D>(deserializer: D) -> Result<Option<Vec<OpeningHour>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(entries) = value else {
        return Ok(None);
    };
    Ok(Some(
        entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value::<OpeningHour>(entry).ok())
            .collect(),
    ))
}

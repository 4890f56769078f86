//! Group orders ("Paniecos") as the backend reports them.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::relay::Scalar;

/// Lifecycle of a group order, owned by the backend.
///
/// Unrecognized values are kept verbatim in [`GroupOrderStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GroupOrderStatus {
    Pending,
    Collecting,
    ReadyToPay,
    Paid,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
    Other(String),
}

impl GroupOrderStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            GroupOrderStatus::Pending => "pending",
            GroupOrderStatus::Collecting => "collecting",
            GroupOrderStatus::ReadyToPay => "ready_to_pay",
            GroupOrderStatus::Paid => "paid",
            GroupOrderStatus::Confirmed => "confirmed",
            GroupOrderStatus::Shipped => "shipped",
            GroupOrderStatus::Delivered => "delivered",
            GroupOrderStatus::Cancelled => "cancelled",
            GroupOrderStatus::Other(raw) => raw,
        }
    }

    /// `true` while contributions are still being collected.
    #[must_use]
    pub fn is_collecting(&self) -> bool {
        matches!(
            self,
            GroupOrderStatus::Pending | GroupOrderStatus::Collecting
        )
    }
}

impl From<&str> for GroupOrderStatus {
    fn from(value: &str) -> Self {
        match value {
            "pending" => GroupOrderStatus::Pending,
            "collecting" => GroupOrderStatus::Collecting,
            "ready_to_pay" => GroupOrderStatus::ReadyToPay,
            "paid" => GroupOrderStatus::Paid,
            "confirmed" => GroupOrderStatus::Confirmed,
            "shipped" => GroupOrderStatus::Shipped,
            "delivered" => GroupOrderStatus::Delivered,
            "cancelled" => GroupOrderStatus::Cancelled,
            other => GroupOrderStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for GroupOrderStatus {
    fn from(value: String) -> Self {
        GroupOrderStatus::from(value.as_str())
    }
}

impl From<GroupOrderStatus> for String {
    fn from(value: GroupOrderStatus) -> Self {
        value.as_str().to_string()
    }
}

/// A missing status is an empty [`GroupOrderStatus::Other`].
impl Default for GroupOrderStatus {
    fn default() -> Self {
        GroupOrderStatus::Other(String::new())
    }
}

impl fmt::Display for GroupOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group order as listed for a pickup point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupOrder {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(deserialize_with = "deserialize_text")]
    pub public_id: String,
    #[serde(default, deserialize_with = "deserialize_money")]
    pub total_amount: Decimal,
    #[serde(default, deserialize_with = "deserialize_money")]
    pub free_shipping_min: Decimal,
    #[serde(default)]
    pub status: GroupOrderStatus,
}

/// Decodes a monetary amount sent either as a JSON number or a decimal
/// string. `null` decodes as zero.
///
/// # Errors
///
/// Fails when the value is a non-numeric string or not a scalar at all.
pub fn deserialize_money<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let scalar = Option::<Scalar>::deserialize(deserializer)?;
    match scalar {
        None => Ok(Decimal::ZERO),
        Some(scalar) => parse_money(&scalar.to_text()).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid monetary amount: {}",
                scalar.to_text()
            ))
        }),
    }
}

/// Decodes an identifier sent either as a JSON string or a number.
///
/// # Errors
///
/// Fails when the value is neither.
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(|s| s.to_text())
}

fn parse_money(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

//! Panieco backend request and response bodies.
//!
//! Responses are decoded leniently: list and map fields default to empty
//! when the backend omits them, and monetary amounts accept both JSON
//! numbers and decimal strings.

use std::collections::HashMap;

use panieco_core::group_order::{deserialize_money, deserialize_text};
use panieco_core::{CartItem, GroupOrderStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pickup points
// ---------------------------------------------------------------------------

/// `GET /api/v1/relais/search` response.
///
/// Records stay untyped here; `RawRelay::from_value` decodes each one
/// without ever failing the batch.
#[derive(Debug, Deserialize)]
pub struct RelaySearchResponse {
    #[serde(default, rename = "pointsRelais")]
    pub points_relais: Vec<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Group orders
// ---------------------------------------------------------------------------

/// `GET /api/v1/group-orders/public/{publicId}` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupOrderSummary {
    #[serde(deserialize_with = "deserialize_text")]
    pub public_id: String,
    #[serde(default, deserialize_with = "deserialize_money")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: Option<GroupOrderStatus>,
}

/// `GET /api/v1/group-orders/{publicId}/participant-info` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ParticipantInfo {
    #[serde(default)]
    pub participant_id: Option<i64>,
    /// Payment timestamp. Kept untyped; only its presence matters.
    #[serde(default)]
    pub paid_at: Option<serde_json::Value>,
}

impl ParticipantInfo {
    /// `true` when the backend reports a payment for this participant.
    #[must_use]
    pub fn has_paid(&self) -> bool {
        match &self.paid_at {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::String(s)) => !s.trim().is_empty(),
            Some(serde_json::Value::Bool(b)) => *b,
            Some(_) => true,
        }
    }
}

/// `GET /api/v1/group-orders/pickup-point/{id}` response.
///
/// Entries stay raw so one malformed order does not sink the listing.
#[derive(Debug, Deserialize)]
pub struct GroupOrdersResponse {
    #[serde(default, rename = "groupOrders")]
    pub group_orders: Vec<serde_json::Value>,
}

/// `GET /api/v1/group-orders/count-pickup` response.
#[derive(Debug, Deserialize)]
pub struct GroupOrderCountsResponse {
    #[serde(default)]
    pub counts: HashMap<String, u64>,
}

/// `POST /api/v1/group-orders/init` response.
#[derive(Debug, Deserialize)]
pub struct CreateGroupOrderResponse {
    #[serde(rename = "groupOrder")]
    pub group_order: CreatedGroupOrder,
}

#[derive(Debug, Deserialize)]
pub struct CreatedGroupOrder {
    #[serde(deserialize_with = "deserialize_text")]
    pub public_id: String,
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of the join request.
#[derive(Debug, Serialize)]
pub struct JoinRequest<'a> {
    pub external_client_id: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub items: &'a [CartItem],
}

/// Body of the create request.
#[derive(Debug, Serialize)]
pub struct CreateGroupOrderRequest<'a> {
    pub pickup_point_id: &'a str,
    pub external_client_id: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub items: &'a [CartItem],
}

/// Body of the merchant checkout-session request. The merchant speaks
/// camelCase, unlike the group-order backend.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionRequest<'a> {
    pub external_client_id: &'a str,
    pub group_order_id: &'a str,
    pub items: &'a [CartItem],
}

#[derive(Debug, Deserialize)]
pub struct CheckoutSessionResponse {
    #[serde(default)]
    pub url: Option<String>,
}

/// Non-2xx body shape shared by the backend and the merchant.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

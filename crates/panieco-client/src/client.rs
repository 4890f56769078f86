//! HTTP client for the Panieco group-order backend and the merchant's
//! checkout endpoint.
//!
//! Every request carries the `x-api-key` header. Participant-scoped requests
//! also carry `x-external-client-id`. GETs are retried on transient failure;
//! POST and DELETE are sent exactly once.

use std::collections::HashMap;
use std::time::Duration;

use panieco_core::{
    normalize_relays_with_distance, CartItem, GroupOrder, RawRelay, Relay, WidgetConfig,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ClientError;
use crate::retry::retry_with_backoff;
use crate::types::{
    CheckoutSessionRequest, CheckoutSessionResponse, CreateGroupOrderRequest,
    CreateGroupOrderResponse, ErrorBody, GroupOrderCountsResponse, GroupOrderSummary,
    GroupOrdersResponse, JoinRequest, ParticipantInfo, RelaySearchResponse,
};

const API_KEY_HEADER: &str = "x-api-key";
const EXTERNAL_CLIENT_ID_HEADER: &str = "x-external-client-id";
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Client for the Panieco backend.
///
/// Built once from a [`WidgetConfig`] and shared (behind an `Arc`) by every
/// controller on the page.
pub struct PaniecoClient {
    client: Client,
    api_base: Url,
    merchant_base: Url,
    api_key: String,
    external_client_id: String,
    max_retries: u32,
    retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for PaniecoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaniecoClient")
            .field("api_base", &self.api_base.as_str())
            .field("merchant_base", &self.merchant_base.as_str())
            .field("api_key", &"[redacted]")
            .field("external_client_id", &self.external_client_id)
            .finish_non_exhaustive()
    }
}

impl PaniecoClient {
    /// Builds the client from the widget configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`ClientError::InvalidUrl`] if either base URL does
    /// not parse.
    pub fn new(config: &WidgetConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            api_base: parse_base_url(&config.api_base_url)?,
            merchant_base: parse_base_url(&config.merchant_url)?,
            api_key: config.api_key.clone(),
            external_client_id: config.external_client_id.clone(),
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
        })
    }

    /// The shopper identifier sent with participant-scoped requests.
    #[must_use]
    pub fn external_client_id(&self) -> &str {
        &self.external_client_id
    }

    // -----------------------------------------------------------------------
    // Pickup points
    // -----------------------------------------------------------------------

    /// Searches pickup points by free-text query.
    ///
    /// Each record is decoded leniently; a malformed record becomes an empty
    /// [`RawRelay`] rather than failing the search.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on network failure, a non-2xx status, or a
    /// body that is not a JSON object.
    pub async fn search_relays(&self, query: &str) -> Result<Vec<RawRelay>, ClientError> {
        let mut url = self.api_url(&["api", "v1", "relais", "search"])?;
        url.query_pairs_mut().append_pair("query", query);
        let response: RelaySearchResponse = self
            .get_json(url, &format!("search(query={query})"), false)
            .await?;
        Ok(response
            .points_relais
            .iter()
            .map(RawRelay::from_value)
            .collect())
    }

    /// Searches pickup points and annotates each with its distance from
    /// `(origin_lat, origin_lon)`. Backend order is kept.
    ///
    /// # Errors
    ///
    /// Same as [`PaniecoClient::search_relays`].
    pub async fn search_relays_near(
        &self,
        query: &str,
        origin_lat: f64,
        origin_lon: f64,
    ) -> Result<Vec<Relay>, ClientError> {
        let raw = self.search_relays(query).await?;
        Ok(normalize_relays_with_distance(&raw, origin_lat, origin_lon))
    }

    // -----------------------------------------------------------------------
    // Group orders
    // -----------------------------------------------------------------------

    /// Fetches the public summary of a group order.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on network failure, a non-2xx status, or an
    /// unexpected body.
    pub async fn group_order(&self, public_id: &str) -> Result<GroupOrderSummary, ClientError> {
        let url = self.api_url(&["api", "v1", "group-orders", "public", public_id])?;
        self.get_json(url, &format!("group_order({public_id})"), false)
            .await
    }

    /// Fetches this shopper's participation in a group order.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on network failure, a non-2xx status, or an
    /// unexpected body.
    pub async fn participant_info(&self, public_id: &str) -> Result<ParticipantInfo, ClientError> {
        let url = self.api_url(&["api", "v1", "group-orders", public_id, "participant-info"])?;
        self.get_json(url, &format!("participant_info({public_id})"), true)
            .await
    }

    /// Lists the group orders open at a pickup point.
    ///
    /// Entries that do not decode as a [`GroupOrder`] are skipped with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on network failure, a non-2xx status, or a
    /// body that is not a JSON object.
    pub async fn group_orders_at(
        &self,
        pickup_point_id: &str,
    ) -> Result<Vec<GroupOrder>, ClientError> {
        let url = self.api_url(&["api", "v1", "group-orders", "pickup-point", pickup_point_id])?;
        let response: GroupOrdersResponse = self
            .get_json(url, &format!("group_orders_at({pickup_point_id})"), false)
            .await?;
        Ok(response
            .group_orders
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<GroupOrder>(entry) {
                Ok(order) => Some(order),
                Err(e) => {
                    tracing::warn!(pickup_point_id, error = %e, "skipping malformed group order");
                    None
                }
            })
            .collect())
    }

    /// Counts group orders per pickup point in a single request.
    ///
    /// Pickup points the backend does not mention are absent from the map.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on network failure, a non-2xx status, or an
    /// unexpected body.
    pub async fn count_group_orders(
        &self,
        pickup_point_ids: &[String],
    ) -> Result<HashMap<String, u64>, ClientError> {
        if pickup_point_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut url = self.api_url(&["api", "v1", "group-orders", "count-pickup"])?;
        url.query_pairs_mut()
            .append_pair("pickup_point_ids", &pickup_point_ids.join(","));
        let response: GroupOrderCountsResponse =
            self.get_json(url, "count_group_orders", false).await?;
        Ok(response.counts)
    }

    /// Joins a group order with the given cart. `amount` is the cart total
    /// computed by the caller for this call.
    ///
    /// Returns the created participant record as sent by the backend.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on network failure or a non-2xx status.
    pub async fn join_group_order(
        &self,
        public_id: &str,
        amount: Decimal,
        items: &[CartItem],
    ) -> Result<serde_json::Value, ClientError> {
        let url = self.api_url(&[
            "api",
            "v1",
            "group-orders",
            public_id,
            "participants-with-items",
        ])?;
        let body = JoinRequest {
            external_client_id: &self.external_client_id,
            amount,
            items,
        };
        let text = self.send_once(Method::POST, url.clone(), Some(&body)).await?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
            context: format!("join_group_order({public_id})"),
            source: e,
        })
    }

    /// Removes a participant from a group order.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on network failure or a non-2xx status.
    pub async fn leave_group_order(
        &self,
        public_id: &str,
        participant_id: i64,
    ) -> Result<(), ClientError> {
        let participant = participant_id.to_string();
        let url = self.api_url(&[
            "api",
            "v1",
            "group-orders",
            public_id,
            "participants",
            &participant,
        ])?;
        self.send_once::<()>(Method::DELETE, url, None).await?;
        Ok(())
    }

    /// Opens a new group order at a pickup point with this shopper as its
    /// first participant. Returns the new order's public id.
    ///
    /// The cart is not validated here; callers reject invalid carts and
    /// compute `amount` first.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on network failure, a non-2xx status, or a
    /// body without `groupOrder.public_id`.
    pub async fn create_group_order(
        &self,
        pickup_point_id: &str,
        amount: Decimal,
        items: &[CartItem],
    ) -> Result<String, ClientError> {
        let url = self.api_url(&["api", "v1", "group-orders", "init"])?;
        let body = CreateGroupOrderRequest {
            pickup_point_id,
            external_client_id: &self.external_client_id,
            amount,
            items,
        };
        let text = self.send_once(Method::POST, url, Some(&body)).await?;
        let response: CreateGroupOrderResponse =
            serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
                context: format!("create_group_order({pickup_point_id})"),
                source: e,
            })?;
        Ok(response.group_order.public_id)
    }

    // -----------------------------------------------------------------------
    // Merchant checkout
    // -----------------------------------------------------------------------

    /// Asks the merchant for a payment-session URL covering the cart.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Conflict`] on HTTP 409 (already paid).
    /// - [`ClientError::Upstream`] on any other non-2xx status.
    /// - [`ClientError::MissingCheckoutUrl`] when the body carries no `url`.
    /// - [`ClientError::InvalidUrl`] when the returned `url` does not parse.
    pub async fn start_checkout(
        &self,
        public_id: &str,
        items: &[CartItem],
    ) -> Result<Url, ClientError> {
        let url = join_segments(&self.merchant_base, &["panieco", "checkout-session"])?;
        let body = CheckoutSessionRequest {
            external_client_id: &self.external_client_id,
            group_order_id: public_id,
            items,
        };
        tracing::debug!(%url, public_id, "POST checkout session");
        let response = self
            .authorize(self.client.post(url.clone()), true)
            .json(&body)
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            let message = error_message(response).await;
            return Err(ClientError::Conflict {
                url: url.to_string(),
                message,
            });
        }
        let text = read_success(response, &url).await?;
        let session: CheckoutSessionResponse =
            serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
                context: format!("start_checkout({public_id})"),
                source: e,
            })?;
        let raw = session
            .url
            .filter(|u| !u.trim().is_empty())
            .ok_or(ClientError::MissingCheckoutUrl)?;
        Url::parse(&raw).map_err(|e| ClientError::InvalidUrl {
            url: raw,
            reason: e.to_string(),
        })
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    fn api_url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        join_segments(&self.api_base, segments)
    }

    fn authorize(&self, request: RequestBuilder, with_client_id: bool) -> RequestBuilder {
        let request = request.header(API_KEY_HEADER, &self.api_key);
        if with_client_id {
            request.header(EXTERNAL_CLIENT_ID_HEADER, &self.external_client_id)
        } else {
            request
        }
    }

    /// GETs `url` and decodes the JSON body, retrying transient failures.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
        with_client_id: bool,
    ) -> Result<T, ClientError> {
        retry_with_backoff(self.max_retries, self.retry_backoff_base_ms, || {
            let url = url.clone();
            async move {
                tracing::debug!(%url, "GET");
                let response = self
                    .authorize(self.client.get(url.clone()), with_client_id)
                    .send()
                    .await?;
                let text = read_success(response, &url).await?;
                serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
                    context: context.to_owned(),
                    source: e,
                })
            }
        })
        .await
    }

    /// Sends a mutating request exactly once and returns the raw body.
    async fn send_once<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<String, ClientError> {
        tracing::debug!(%url, %method, "sending");
        let mut request = self.authorize(self.client.request(method, url.clone()), false);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        read_success(response, &url).await
    }
}

/// Normalises a configured base URL to end with exactly one slash.
fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    let url = Url::parse(&normalised).map_err(|e| ClientError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidUrl {
            url: raw.to_owned(),
            reason: "URL cannot carry a path".to_owned(),
        });
    }
    Ok(url)
}

/// Appends percent-encoded path segments to `base`.
fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, ClientError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ClientError::InvalidUrl {
            url: base.to_string(),
            reason: "URL cannot carry a path".to_owned(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Returns the body of a 2xx response, or [`ClientError::Upstream`] with the
/// backend's error text.
async fn read_success(response: Response, url: &Url) -> Result<String, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.text().await?);
    }
    let message = error_message(response).await;
    Err(ClientError::Upstream {
        status: status.as_u16(),
        url: url.to_string(),
        message,
    })
}

async fn error_message(response: Response) -> Option<String> {
    let text = response.text().await.ok()?;
    let body: ErrorBody = serde_json::from_str(&text).ok()?;
    body.error
        .or(body.message)
        .filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

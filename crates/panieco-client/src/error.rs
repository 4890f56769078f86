use thiserror::Error;

/// Errors returned by the Panieco HTTP client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}: {}", message.as_deref().unwrap_or("no error message"))]
    Upstream {
        status: u16,
        url: String,
        /// The backend's `{"error": "..."}` text, when it sent one.
        message: Option<String>,
    },

    /// HTTP 409 from the checkout endpoint: the participant already paid.
    #[error("conflict from {url}: {}", message.as_deref().unwrap_or("already paid"))]
    Conflict { url: String, message: Option<String> },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The checkout endpoint answered 2xx without a payment URL.
    #[error("checkout session response did not include a payment URL")]
    MissingCheckoutUrl,
}

impl ClientError {
    /// Error text supplied by the backend, if any.
    #[must_use]
    pub fn upstream_message(&self) -> Option<&str> {
        match self {
            ClientError::Upstream { message, .. } | ClientError::Conflict { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// `true` when the request never produced an HTTP response.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Http(e) if e.status().is_none())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = "panieco/0.1 (group-order-widget)";
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_BACKOFF_BASE_MS: u64 = 500;

/// Immutable widget configuration injected into the client at construction.
///
/// Nothing in the workspace reads these values from global state; every
/// component that needs the API key or base URLs receives a `WidgetConfig`
/// (or a client built from one).
#[derive(Clone)]
pub struct WidgetConfig {
    pub env: Environment,
    /// Group-order backend, e.g. `"https://api.panieco.fr"`.
    pub api_base_url: String,
    /// Sent on every request as `x-api-key`.
    pub api_key: String,
    /// Merchant storefront that hosts the `/panieco/checkout-session` endpoint.
    pub merchant_url: String,
    /// Identifier of the shopper at the merchant.
    pub external_client_id: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Extra attempts for idempotent reads. Mutations are never retried.
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl WidgetConfig {
    /// Builds a configuration with the given endpoints and credentials and
    /// defaults for everything else.
    #[must_use]
    pub fn new(
        api_base_url: impl Into<String>,
        api_key: impl Into<String>,
        merchant_url: impl Into<String>,
        external_client_id: impl Into<String>,
    ) -> Self {
        Self {
            env: Environment::Development,
            api_base_url: api_base_url.into(),
            api_key: api_key.into(),
            merchant_url: merchant_url.into(),
            external_client_id: external_client_id.into(),
            log_level: "info".to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_base_ms: DEFAULT_RETRY_BACKOFF_BASE_MS,
        }
    }

    /// Returns a copy with read retries disabled.
    #[must_use]
    pub fn without_retries(mut self) -> Self {
        self.max_retries = 0;
        self
    }
}

impl std::fmt::Debug for WidgetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetConfig")
            .field("env", &self.env)
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &"[redacted]")
            .field("merchant_url", &self.merchant_url)
            .field("external_client_id", &self.external_client_id)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}

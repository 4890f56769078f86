use thiserror::Error;

use crate::app_config::{
    Environment, WidgetConfig, DEFAULT_MAX_RETRIES, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_RETRY_BACKOFF_BASE_MS, DEFAULT_USER_AGENT,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load widget configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_widget_config() -> Result<WidgetConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_widget_config_from_env()
}

/// Load widget configuration from environment variables already in the process.
///
/// Unlike [`load_widget_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_widget_config_from_env() -> Result<WidgetConfig, ConfigError> {
    build_widget_config(|key| std::env::var(key))
}

/// Build widget configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_widget_config<F>(lookup: F) -> Result<WidgetConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        let value = lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))?;
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "value is empty".to_string(),
            });
        }
        Ok(value)
    };

    let require_url = |var: &str| -> Result<String, ConfigError> {
        let raw = require(var)?;
        if !(raw.starts_with("http://") || raw.starts_with("https://")) {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("\"{raw}\" is not an http(s) URL"),
            });
        }
        Ok(raw.trim_end_matches('/').to_string())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: u32| -> Result<u32, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw.trim().parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Ok(default),
        }
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Ok(default),
        }
    };

    let api_base_url = require_url("PANIECO_API_BASE_URL")?;
    let api_key = require("PANIECO_API_KEY")?;
    let merchant_url = require_url("PANIECO_MERCHANT_URL")?;
    let external_client_id = require("PANIECO_EXTERNAL_CLIENT_ID")?;

    let env = parse_environment(&or_default("PANIECO_ENV", "development"));
    let log_level = or_default("PANIECO_LOG_LEVEL", "info");
    let user_agent = or_default("PANIECO_USER_AGENT", DEFAULT_USER_AGENT);

    let request_timeout_secs =
        parse_u64("PANIECO_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
    let max_retries = parse_u32("PANIECO_MAX_RETRIES", DEFAULT_MAX_RETRIES)?;
    let retry_backoff_base_ms =
        parse_u64("PANIECO_RETRY_BACKOFF_BASE_MS", DEFAULT_RETRY_BACKOFF_BASE_MS)?;

    Ok(WidgetConfig {
        env,
        api_base_url,
        api_key,
        merchant_url,
        external_client_id,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

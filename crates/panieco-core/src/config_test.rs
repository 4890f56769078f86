use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid values.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("PANIECO_API_BASE_URL", "https://api.panieco.test/");
    m.insert("PANIECO_API_KEY", "merchant-key");
    m.insert("PANIECO_MERCHANT_URL", "https://shop.example.fr");
    m.insert("PANIECO_EXTERNAL_CLIENT_ID", "client-42");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(parse_environment("development"), Environment::Development);
    assert_eq!(parse_environment("test"), Environment::Test);
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn only_production_is_production() {
    assert!(Environment::Production.is_production());
    assert!(!Environment::Development.is_production());
    assert!(!Environment::Test.is_production());
    assert!(!parse_environment("staging").is_production());
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_widget_config_fails_without_api_base_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_widget_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "PANIECO_API_BASE_URL"),
        "expected MissingEnvVar(PANIECO_API_BASE_URL), got: {result:?}"
    );
}

#[test]
fn build_widget_config_fails_without_external_client_id() {
    let mut map = full_env();
    map.remove("PANIECO_EXTERNAL_CLIENT_ID");
    let result = build_widget_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "PANIECO_EXTERNAL_CLIENT_ID"),
        "expected MissingEnvVar(PANIECO_EXTERNAL_CLIENT_ID), got: {result:?}"
    );
}

#[test]
fn build_widget_config_rejects_empty_api_key() {
    let mut map = full_env();
    map.insert("PANIECO_API_KEY", "   ");
    let result = build_widget_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PANIECO_API_KEY"),
        "expected InvalidEnvVar(PANIECO_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_widget_config_rejects_non_http_merchant_url() {
    let mut map = full_env();
    map.insert("PANIECO_MERCHANT_URL", "shop.example.fr");
    let result = build_widget_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PANIECO_MERCHANT_URL"),
        "expected InvalidEnvVar(PANIECO_MERCHANT_URL), got: {result:?}"
    );
}

#[test]
fn build_widget_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_widget_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.api_base_url, "https://api.panieco.test");
    assert_eq!(cfg.api_key, "merchant-key");
    assert_eq!(cfg.merchant_url, "https://shop.example.fr");
    assert_eq!(cfg.external_client_id, "client-42");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "panieco/0.1 (group-order-widget)");
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_ms, 500);
}

#[test]
fn build_widget_config_numeric_overrides() {
    let mut map = full_env();
    map.insert("PANIECO_REQUEST_TIMEOUT_SECS", "5");
    map.insert("PANIECO_MAX_RETRIES", "0");
    map.insert("PANIECO_RETRY_BACKOFF_BASE_MS", "50");
    let cfg = build_widget_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 5);
    assert_eq!(cfg.max_retries, 0);
    assert_eq!(cfg.retry_backoff_base_ms, 50);
}

#[test]
fn build_widget_config_invalid_max_retries() {
    let mut map = full_env();
    map.insert("PANIECO_MAX_RETRIES", "lots");
    let result = build_widget_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PANIECO_MAX_RETRIES"),
        "expected InvalidEnvVar(PANIECO_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_api_key() {
    let cfg = build_widget_config(lookup_from_map(&full_env())).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("merchant-key"));
    assert!(rendered.contains("[redacted]"));
}

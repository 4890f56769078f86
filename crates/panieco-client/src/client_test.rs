use super::*;

fn test_config(base_url: &str) -> WidgetConfig {
    WidgetConfig::new(
        base_url,
        "test-key",
        "https://shop.example.com",
        "client-42",
    )
}

#[test]
fn api_url_strips_trailing_slash() {
    let client = PaniecoClient::new(&test_config("https://api.example.com/")).unwrap();
    let url = client
        .api_url(&["api", "v1", "group-orders", "public", "PAN-1"])
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.example.com/api/v1/group-orders/public/PAN-1"
    );
}

#[test]
fn api_url_keeps_base_path_prefix() {
    let client = PaniecoClient::new(&test_config("https://example.com/panieco")).unwrap();
    let url = client.api_url(&["api", "v1", "group-orders", "init"]).unwrap();
    assert_eq!(
        url.as_str(),
        "https://example.com/panieco/api/v1/group-orders/init"
    );
}

#[test]
fn api_url_encodes_public_id() {
    let client = PaniecoClient::new(&test_config("https://api.example.com")).unwrap();
    let url = client
        .api_url(&["api", "v1", "group-orders", "public", "a/b c"])
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.example.com/api/v1/group-orders/public/a%2Fb%20c"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = PaniecoClient::new(&test_config("not a url"));
    assert!(matches!(result, Err(ClientError::InvalidUrl { .. })));
}

#[test]
fn debug_redacts_api_key() {
    let client = PaniecoClient::new(&test_config("https://api.example.com")).unwrap();
    let rendered = format!("{client:?}");
    assert!(!rendered.contains("test-key"), "{rendered}");
    assert!(rendered.contains("[redacted]"));
    assert_eq!(client.external_client_id(), "client-42");
}

use std::time::Duration;

use subimport::subscription::fetch::fetch_body;
use subimport::utils::base64::base64_encode;
use subimport::{
    import_uri, parse_subscription_body, ImportSource, Protocol, SubscriptionError,
};

const SUB_URL: &str = "https://provider.example.com/sub?token=abc";

fn mixed_body() -> String {
    [
        format!("ss://{}@hk1.example.com:8388#HK%2001", base64_encode("aes-256-gcm:secret")),
        "vmess://not!really!base64".to_string(),
        "trojan://pw@eu1.example.com:443?security=tls&sni=eu1.example.com#EU%2001".to_string(),
        "vless://b831381d-6324-4d53-ad4f-8cda48b30811@us1.example.com:443#US%2001".to_string(),
    ]
    .join("\n")
}

#[test]
fn test_plain_and_base64_bodies_produce_the_same_result() {
    let plain = parse_subscription_body(&mixed_body(), SUB_URL).unwrap();
    let encoded = parse_subscription_body(&base64_encode(&mixed_body()), SUB_URL).unwrap();
    assert_eq!(plain, encoded);

    assert_eq!(plain.configs.len(), 3);
    assert_eq!(plain.errors.len(), 1);
    assert!(plain.is_partial_success());

    let protocols: Vec<Protocol> = plain.configs.iter().map(|c| c.record.protocol).collect();
    assert_eq!(
        protocols,
        vec![Protocol::Shadowsocks, Protocol::Trojan, Protocol::Vless]
    );
    let names: Vec<&str> = plain.configs.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["HK 01", "EU 01", "US 01"]);

    assert_eq!(plain.errors[0].line_number, 2);
    assert!(plain.errors[0].message.contains("base64"));
}

#[test]
fn test_every_entry_carries_subscription_metadata() {
    let result = parse_subscription_body(&mixed_body(), SUB_URL).unwrap();
    for entry in &result.configs {
        assert_eq!(entry.source, ImportSource::SubscriptionUrl);
        assert_eq!(entry.subscription_url.as_deref(), Some(SUB_URL));
        assert_eq!(entry.id.len(), 32);
    }
}

#[test]
fn test_reimport_is_idempotent() {
    let first = parse_subscription_body(&mixed_body(), SUB_URL).unwrap();
    let second = parse_subscription_body(&mixed_body(), SUB_URL).unwrap();
    for (a, b) in first.configs.iter().zip(second.configs.iter()) {
        assert_eq!(a.id, b.id);
    }
}

#[test]
fn test_manual_import_matches_subscription_identity() {
    let uri = "trojan://pw@eu1.example.com:443?security=tls&sni=eu1.example.com#EU%2001";
    let manual = import_uri(uri, ImportSource::QrCode).unwrap();
    assert_eq!(manual.source, ImportSource::QrCode);
    assert_eq!(manual.subscription_url, None);

    let from_sub = parse_subscription_body(&mixed_body(), SUB_URL).unwrap();
    let matching = from_sub
        .configs
        .iter()
        .find(|c| c.record.protocol == Protocol::Trojan)
        .unwrap();
    assert_eq!(manual.id, matching.id);
}

#[test]
fn test_all_invalid_subscription_is_failure_but_fetch_level_ok() {
    let body = base64_encode("garbage one\ngarbage two\ngarbage three\n");
    let result = parse_subscription_body(&body, SUB_URL).unwrap();
    assert_eq!(result.configs.len(), 0);
    assert_eq!(result.errors.len(), 3);
    assert!(result.is_failure());
    assert!(!result.is_partial_success());
}

#[test]
fn test_decode_failure_is_fatal_and_descriptive() {
    let err = parse_subscription_body("{\"proxies\": []}", SUB_URL).unwrap_err();
    match err {
        SubscriptionError::Decode(message) => {
            assert!(message.contains("not valid base64"));
        }
        other => panic!("expected Decode, got {:?}", other),
    }

    let err = parse_subscription_body("\n   \n", SUB_URL).unwrap_err();
    match err {
        SubscriptionError::Decode(message) => assert!(message.contains("empty response body")),
        other => panic!("expected Decode, got {:?}", other),
    }
}

#[test]
fn test_result_serializes_for_collaborators() {
    let result = parse_subscription_body(&mixed_body(), SUB_URL).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"line_number\":2"));
    assert!(json.contains("\"source\":\"subscriptionUrl\""));
}

#[tokio::test]
async fn test_fetch_rejects_malformed_url_without_network() {
    let err = fetch_body("::definitely not a url::", Duration::from_millis(10))
        .await
        .unwrap_err();
    assert!(matches!(err, SubscriptionError::InvalidUrl { .. }));

    let err = fetch_body("file:///etc/hosts", Duration::from_millis(10))
        .await
        .unwrap_err();
    assert!(matches!(err, SubscriptionError::InvalidUrl { .. }));
}

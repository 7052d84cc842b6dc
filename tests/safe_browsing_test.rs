// Safe Browsing client against a mock lookup endpoint

use httpmock::prelude::*;
use phish_scanner::{
    app_config::SafeBrowsingConfig, BlacklistLookup, BlacklistVerdict, SafeBrowsingClient,
};
use serde_json::json;
use std::time::Duration;

const LOOKUP_PATH: &str = "/v4/threatMatches:find";

fn client_for(server: &MockServer, timeout_ms: u64) -> SafeBrowsingClient {
    SafeBrowsingClient::new(SafeBrowsingConfig {
        api_key: Some("test-key".to_string()),
        api_url: server.url(LOOKUP_PATH),
        timeout_ms,
        ..SafeBrowsingConfig::default()
    })
}

#[tokio::test]
async fn test_listed_url_is_match() {
    let server = MockServer::start_async().await;
    let lookup = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(LOOKUP_PATH)
                .query_param("key", "test-key")
                .json_body_partial(
                    r#"{"threatInfo": {"threatEntries": [{"url": "http://malware.testing.google.test/"}]}}"#,
                );
            then.status(200).json_body(json!({
                "matches": [{
                    "threatType": "MALWARE",
                    "platformType": "ANY_PLATFORM",
                    "threat": {"url": "http://malware.testing.google.test/"}
                }]
            }));
        })
        .await;

    let client = client_for(&server, 2000);
    let verdict = client.lookup("http://malware.testing.google.test/").await;

    lookup.assert_async().await;
    match verdict {
        BlacklistVerdict::Match(payload) => {
            assert_eq!(payload["matches"][0]["threatType"], "MALWARE");
        },
        other => panic!("expected a match, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_response_is_no_match() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(LOOKUP_PATH);
            then.status(200).json_body(json!({}));
        })
        .await;

    let client = client_for(&server, 2000);
    assert_eq!(
        client.lookup("https://example.com").await,
        BlacklistVerdict::NoMatch
    );
}

#[tokio::test]
async fn test_error_status_is_unknown() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(LOOKUP_PATH);
            then.status(403).body("API key not valid");
        })
        .await;

    let client = client_for(&server, 2000);
    let verdict = client.lookup("https://example.com").await;

    assert!(!verdict.is_match());
    match verdict {
        BlacklistVerdict::Unknown(reason) => assert!(reason.contains("403")),
        other => panic!("expected Unknown, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_service_is_unknown() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(LOOKUP_PATH);
            then.status(200)
                .delay(Duration::from_millis(1500))
                .json_body(json!({"matches": [{"threatType": "MALWARE"}]}));
        })
        .await;

    let client = client_for(&server, 100);
    let verdict = client.lookup("https://example.com").await;

    assert!(matches!(verdict, BlacklistVerdict::Unknown(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_unknown() {
    let client = SafeBrowsingClient::new(SafeBrowsingConfig {
        api_key: Some("test-key".to_string()),
        // Port 9 (discard) is not expected to accept HTTP
        api_url: "http://127.0.0.1:9/v4/threatMatches:find".to_string(),
        timeout_ms: 500,
        ..SafeBrowsingConfig::default()
    });

    assert!(matches!(
        client.lookup("https://example.com").await,
        BlacklistVerdict::Unknown(_)
    ));
}

#[tokio::test]
async fn test_missing_key_never_calls_service() {
    let server = MockServer::start_async().await;
    let lookup = server
        .mock_async(|when, then| {
            when.method(POST).path(LOOKUP_PATH);
            then.status(200).json_body(json!({}));
        })
        .await;

    let client = SafeBrowsingClient::new(SafeBrowsingConfig {
        api_key: None,
        api_url: server.url(LOOKUP_PATH),
        ..SafeBrowsingConfig::default()
    });

    assert_eq!(
        client.lookup("https://example.com").await,
        BlacklistVerdict::Unknown("API key not configured".to_string())
    );
    assert_eq!(lookup.hits_async().await, 0);
}

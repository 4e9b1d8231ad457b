//! Integration tests for the OAuth token exchanges

use chrono::{Duration, Utc};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use cloudbak_core::ports::IRemoteStore;

use crate::common;

#[tokio::test]
async fn check_code_exchange_maps_the_token_response() {
    let (server, store) = common::setup_disk_mock().await;
    common::mount_token_endpoint(
        &server,
        serde_json::json!({
            "access_token": "access-new",
            "refresh_token": "refresh-new",
            "token_type": "Bearer",
            "expires_in": 3600
        }),
    )
    .await;

    let before = Utc::now();
    let tokens = store.get_token("check-code-1").await.unwrap();

    assert_eq!(tokens.access_token, "access-new");
    assert_eq!(tokens.refresh_token, "refresh-new");
    assert!(tokens.expires_at >= before + Duration::seconds(3590));
    assert!(tokens.expires_at <= Utc::now() + Duration::seconds(3610));
}

#[tokio::test]
async fn rejected_check_code_propagates() {
    let (server, store) = common::setup_disk_mock().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Code has expired"
        })))
        .mount(&server)
        .await;

    assert!(store.get_token("stale-code").await.is_err());
}

#[tokio::test]
async fn refresh_exchange_returns_a_fresh_pair() {
    let (server, store) = common::setup_disk_mock().await;
    common::mount_token_endpoint(
        &server,
        serde_json::json!({
            "access_token": "access-refreshed",
            "refresh_token": "refresh-refreshed",
            "token_type": "Bearer",
            "expires_in": 7200
        }),
    )
    .await;

    let tokens = store.refresh_token("refresh-old").await.unwrap();
    assert_eq!(tokens.access_token, "access-refreshed");
    assert_eq!(tokens.refresh_token, "refresh-refreshed");
}

#[tokio::test]
async fn refresh_without_new_refresh_token_keeps_the_old_one() {
    let (server, store) = common::setup_disk_mock().await;
    common::mount_token_endpoint(
        &server,
        serde_json::json!({
            "access_token": "access-refreshed",
            "token_type": "Bearer",
            "expires_in": 7200
        }),
    )
    .await;

    let tokens = store.refresh_token("refresh-old").await.unwrap();
    assert_eq!(tokens.refresh_token, "refresh-old");
}

#[tokio::test]
async fn unreachable_token_endpoint_is_an_error() {
    let (server, store) = common::setup_disk_mock().await;
    // No mock mounted: wiremock answers 404, which the exchange rejects.
    drop(server);

    assert!(store.refresh_token("refresh-old").await.is_err());
}

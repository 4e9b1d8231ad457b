//! Shared test helpers for the disk adapter integration tests
//!
//! Provides wiremock-based mock server setup. Each helper mounts the
//! necessary mock endpoints and returns a configured DiskStore pointing at
//! the mock server.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cloudbak_core::config::{RemoteConfig, TransportConfig};
use cloudbak_disk::DiskStore;

/// Transport tuned for tests: a couple of retries, no backoff pause.
pub fn fast_transport() -> TransportConfig {
    TransportConfig {
        retries: 2,
        backoff_secs: 0,
        ..TransportConfig::default()
    }
}

/// Starts a mock server and returns it with a DiskStore pointing at it.
pub async fn setup_disk_mock() -> (MockServer, DiskStore) {
    let server = MockServer::start().await;

    let remote = RemoteConfig {
        client_id: "client-test".to_string(),
        client_secret: "secret-test".to_string(),
        api_url: server.uri(),
        token_url: format!("{}/oauth/token", server.uri()),
        ..RemoteConfig::default()
    };

    let store = DiskStore::new(&remote, &fast_transport()).expect("build DiskStore");
    (server, store)
}

/// Mounts a listing endpoint returning the given items.
pub async fn mount_listing(server: &MockServer, items: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/resources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_embedded": { "items": items }
        })))
        .mount(server)
        .await;
}

/// Mounts a token endpoint returning the given token response body.
pub async fn mount_token_endpoint(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

//! Integration tests for directory listing
//!
//! Verifies file filtering, newest-first ordering, boundary validation of
//! wire items, and the bounded retry policy.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use cloudbak_core::domain::RemotePath;
use cloudbak_core::ports::IRemoteStore;

use crate::common;

fn backups_path() -> RemotePath {
    RemotePath::new("app:/backups").unwrap()
}

#[tokio::test]
async fn listing_filters_directories_and_sorts_newest_first() {
    let (server, store) = common::setup_disk_mock().await;
    common::mount_listing(
        &server,
        serde_json::json!([
            {"name": "older_slug1", "type": "file", "size": 1024, "modified": "2020-01-30T20:59:59+00:00"},
            {"name": "subfolder", "type": "dir", "modified": "2020-01-30T23:59:59+00:00"},
            {"name": "newer_slug2", "type": "file", "size": 2048, "modified": "2020-01-30T21:59:59+00:00"},
        ]),
    )
    .await;

    let objects = store.list("token-1", &backups_path()).await.unwrap();

    let names: Vec<&str> = objects.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["newer_slug2", "older_slug1"]);
    assert!(objects.iter().all(|o| o.is_file()));
}

#[tokio::test]
async fn listing_passes_path_and_token() {
    let (server, store) = common::setup_disk_mock().await;
    Mock::given(method("GET"))
        .and(path("/resources"))
        .and(query_param("path", "app:/backups"))
        .and(wiremock::matchers::header("Authorization", "OAuth token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_embedded": { "items": [] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let objects = store.list("token-1", &backups_path()).await.unwrap();
    assert!(objects.is_empty());
}

#[tokio::test]
async fn listing_without_embedded_section_is_empty() {
    let (server, store) = common::setup_disk_mock().await;
    Mock::given(method("GET"))
        .and(path("/resources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "backups", "type": "dir"
        })))
        .mount(&server)
        .await;

    let objects = store.list("token-1", &backups_path()).await.unwrap();
    assert!(objects.is_empty());
}

#[tokio::test]
async fn listing_item_missing_fields_fails_the_listing() {
    let (server, store) = common::setup_disk_mock().await;
    common::mount_listing(
        &server,
        serde_json::json!([
            {"name": "fine_slug1", "type": "file", "size": 1, "modified": "2020-01-30T20:59:59+00:00"},
            {"type": "file", "size": 2, "modified": "2020-01-30T21:59:59+00:00"},
        ]),
    )
    .await;

    assert!(store.list("token-1", &backups_path()).await.is_err());
}

#[tokio::test]
async fn unauthorized_listing_is_an_error_without_retry() {
    let (server, store) = common::setup_disk_mock().await;
    Mock::given(method("GET"))
        .and(path("/resources"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    assert!(store.list("token-1", &backups_path()).await.is_err());
}

#[tokio::test]
async fn server_errors_exhaust_the_retry_budget() {
    let (server, store) = common::setup_disk_mock().await;
    // retries = 2 means three attempts in total.
    Mock::given(method("GET"))
        .and(path("/resources"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    assert!(store.list("token-1", &backups_path()).await.is_err());
}

#[tokio::test]
async fn transient_server_error_is_retried_to_success() {
    let (server, store) = common::setup_disk_mock().await;
    Mock::given(method("GET"))
        .and(path("/resources"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    common::mount_listing(
        &server,
        serde_json::json!([
            {"name": "only_slug1", "type": "file", "size": 1, "modified": "2020-01-30T20:59:59+00:00"},
        ]),
    )
    .await;

    let objects = store.list("token-1", &backups_path()).await.unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].name, "only_slug1");
}

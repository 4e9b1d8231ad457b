//! Integration tests for upload and removal
//!
//! The upload flow is two-step: request an upload href, then PUT the file
//! body to it. Removal is a single permanent DELETE.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use cloudbak_core::ports::IRemoteStore;

use crate::common;

#[tokio::test]
async fn upload_streams_the_file_to_the_href() {
    let (server, store) = common::setup_disk_mock().await;

    Mock::given(method("GET"))
        .and(path("/resources/upload"))
        .and(query_param("path", "app:/backups/daily_abc"))
        .and(query_param("overwrite", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "href": format!("{}/upload-target", server.uri()),
            "method": "PUT",
            "templated": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/upload-target"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("daily.tar");
    std::fs::write(&source, b"archive bytes").unwrap();

    store
        .upload("token-1", &source, "app:/backups/daily_abc", true)
        .await
        .unwrap();

    let put = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.method.as_str() == "PUT")
        .expect("PUT request recorded");
    assert_eq!(put.body, b"archive bytes");
}

#[tokio::test]
async fn upload_link_refusal_propagates() {
    let (server, store) = common::setup_disk_mock().await;
    Mock::given(method("GET"))
        .and(path("/resources/upload"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("daily.tar");
    std::fs::write(&source, b"archive bytes").unwrap();

    let result = store
        .upload("token-1", &source, "app:/backups/daily_abc", false)
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn upload_of_missing_local_file_fails_before_the_put() {
    let (server, store) = common::setup_disk_mock().await;
    Mock::given(method("GET"))
        .and(path("/resources/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "href": format!("{}/upload-target", server.uri()),
        })))
        .mount(&server)
        .await;

    let result = store
        .upload(
            "token-1",
            std::path::Path::new("/nonexistent/daily.tar"),
            "app:/backups/daily_abc",
            true,
        )
        .await;

    assert!(result.is_err());
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.method.as_str() != "PUT"));
}

#[tokio::test]
async fn remove_is_a_permanent_delete() {
    let (server, store) = common::setup_disk_mock().await;
    Mock::given(method("DELETE"))
        .and(path("/resources"))
        .and(query_param("path", "app:/backups/old_abc"))
        .and(query_param("permanently", "true"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    store
        .remove("token-1", "app:/backups/old_abc")
        .await
        .unwrap();
}

#[tokio::test]
async fn remove_of_missing_object_is_an_error() {
    let (server, store) = common::setup_disk_mock().await;
    Mock::given(method("DELETE"))
        .and(path("/resources"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(store.remove("token-1", "app:/backups/gone").await.is_err());
}

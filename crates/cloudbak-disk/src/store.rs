//! DiskStore - IRemoteStore implementation for the cloud disk REST API
//!
//! Delegates HTTP plumbing to [`DiskClient`] and token exchanges to
//! [`DiskAuth`]. Listing items are validated at this boundary: an item the
//! service returns without a name, type or modification time is a listing
//! error, not a half-filled record.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::debug;

use cloudbak_core::config::{RemoteConfig, TransportConfig};
use cloudbak_core::domain::{RemoteKind, RemoteObject, RemotePath, TokenState};
use cloudbak_core::ports::IRemoteStore;

use crate::auth::DiskAuth;
use crate::client::DiskClient;

/// Page size for directory listings; backup directories stay far below it.
const LISTING_LIMIT: u32 = 10_000;

// ============================================================================
// Wire types
// ============================================================================

/// Response for `GET /resources`
#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(rename = "_embedded")]
    embedded: Option<ListingEmbedded>,
}

#[derive(Debug, Deserialize)]
struct ListingEmbedded {
    items: Vec<ListingItem>,
}

/// A raw listing item; every field optional until validated.
#[derive(Debug, Deserialize)]
struct ListingItem {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    size: Option<u64>,
    modified: Option<DateTime<Utc>>,
}

/// Response for `GET /resources/upload`
#[derive(Debug, Deserialize)]
struct UploadLink {
    href: String,
}

/// Validates a wire item into a domain record, failing fast on holes.
fn object_from_item(item: ListingItem) -> Result<RemoteObject> {
    let name = item.name.context("Listing item without a name")?;
    let kind = match item
        .kind
        .with_context(|| format!("Listing item '{name}' without a type"))?
        .as_str()
    {
        "file" => RemoteKind::File,
        _ => RemoteKind::Dir,
    };
    let modified = item
        .modified
        .with_context(|| format!("Listing item '{name}' without a modification time"))?;

    // Directories legitimately come without a size; files must have one.
    let size = match kind {
        RemoteKind::File => {
            item.size
                .with_context(|| format!("Listing item '{name}' without a size"))?
        }
        RemoteKind::Dir => item.size.unwrap_or(0),
    };

    Ok(RemoteObject {
        name,
        size,
        modified,
        kind,
    })
}

// ============================================================================
// DiskStore
// ============================================================================

/// Remote storage transport backed by the cloud disk REST API.
pub struct DiskStore {
    client: DiskClient,
    auth: DiskAuth,
}

impl DiskStore {
    /// Creates a DiskStore from the account and transport configuration.
    pub fn new(remote: &RemoteConfig, transport: &TransportConfig) -> Result<Self> {
        Ok(Self {
            client: DiskClient::new(remote.api_url.clone(), transport)?,
            auth: DiskAuth::new(remote)?,
        })
    }
}

#[async_trait::async_trait]
impl IRemoteStore for DiskStore {
    /// Lists the plain files directly under `path`, newest first.
    async fn list(
        &self,
        access_token: &str,
        path: &RemotePath,
    ) -> Result<Vec<RemoteObject>> {
        debug!(path = %path, "Listing remote directory");

        let limit = LISTING_LIMIT.to_string();
        let response = self
            .client
            .execute_with_retry("list", || {
                self.client
                    .request(Method::GET, "/resources", access_token)
                    .query(&[("path", path.as_str()), ("limit", limit.as_str())])
            })
            .await?
            .error_for_status()
            .context("Listing request returned error status")?;

        let listing: ListingResponse = response
            .json()
            .await
            .context("Failed to parse listing response")?;

        let items = listing.embedded.map(|e| e.items).unwrap_or_default();
        debug!(count = items.len(), "Remote items received");

        let mut files = items
            .into_iter()
            .map(object_from_item)
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .filter(RemoteObject::is_file)
            .collect::<Vec<_>>();

        files.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(files)
    }

    /// Uploads a local file: asks the API for an upload href, then streams
    /// the file body to it with a PUT.
    async fn upload(
        &self,
        access_token: &str,
        local_path: &Path,
        remote_path: &str,
        overwrite: bool,
    ) -> Result<()> {
        debug!(
            source = %local_path.display(),
            destination = remote_path,
            "Requesting upload link"
        );

        let link: UploadLink = self
            .client
            .execute_with_retry("upload-link", || {
                self.client
                    .request(Method::GET, "/resources/upload", access_token)
                    .query(&[
                        ("path", remote_path),
                        ("overwrite", if overwrite { "true" } else { "false" }),
                    ])
            })
            .await?
            .error_for_status()
            .context("Upload link request returned error status")?
            .json()
            .await
            .context("Failed to parse upload link response")?;

        debug!(href = %link.href, "Streaming file to upload link");

        let file = tokio::fs::File::open(local_path)
            .await
            .with_context(|| format!("Cannot open {}", local_path.display()))?;
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));

        self.client
            .http_client()
            .put(&link.href)
            .body(body)
            .send()
            .await
            .context("Upload PUT failed")?
            .error_for_status()
            .context("Upload PUT returned error status")?;

        Ok(())
    }

    /// Permanently removes the object at `remote_path`.
    async fn remove(&self, access_token: &str, remote_path: &str) -> Result<()> {
        debug!(target = remote_path, "Removing remote object");

        self.client
            .execute_with_retry("remove", || {
                self.client
                    .request(Method::DELETE, "/resources", access_token)
                    .query(&[("path", remote_path), ("permanently", "true")])
            })
            .await?
            .error_for_status()
            .context("Remove request returned error status")?;

        Ok(())
    }

    async fn get_token(&self, check_code: &str) -> Result<TokenState> {
        self.auth.exchange_code(check_code).await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenState> {
        self.auth.refresh(refresh_token).await
    }
}

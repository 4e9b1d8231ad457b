//! Remote storage transport port (driven/secondary port)
//!
//! Interface for the remote object-storage service holding the uploaded
//! backups. The primary implementation targets a cloud disk REST API, but
//! the trait is service-agnostic.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are
//!   adapter-specific and don't need domain-level classification.
//! - Every operation takes the access token explicitly; token lifecycle is
//!   owned by the [`TokenManager`](crate::usecases::tokens::TokenManager),
//!   not the transport.
//! - Retry counts, backoff and timeouts are adapter configuration;
//!   implementations exhaust their own retry budget before reporting an
//!   error.

use std::path::Path;

use crate::domain::{RemoteObject, RemotePath, TokenState};

/// Port trait for remote object-storage operations
#[async_trait::async_trait]
pub trait IRemoteStore: Send + Sync {
    /// Lists the objects directly under `path`.
    ///
    /// Returns plain files only, sorted by modification time descending.
    /// Implementations must reject listing items that lack required fields
    /// rather than fabricating partial records.
    async fn list(&self, access_token: &str, path: &RemotePath)
        -> anyhow::Result<Vec<RemoteObject>>;

    /// Uploads a local file to `remote_path`, optionally overwriting an
    /// existing object. Overwriting an already-present backup is the
    /// at-least-once recovery path, not an error.
    async fn upload(
        &self,
        access_token: &str,
        local_path: &Path,
        remote_path: &str,
        overwrite: bool,
    ) -> anyhow::Result<()>;

    /// Permanently removes the object at `remote_path`.
    async fn remove(&self, access_token: &str, remote_path: &str) -> anyhow::Result<()>;

    /// Exchanges a one-time check code for an access/refresh token pair.
    async fn get_token(&self, check_code: &str) -> anyhow::Result<TokenState>;

    /// Exchanges a refresh token for a new access/refresh token pair.
    async fn refresh_token(&self, refresh_token: &str) -> anyhow::Result<TokenState>;
}

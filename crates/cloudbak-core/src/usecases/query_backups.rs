//! Read-only reconciled view of local and remote backups
//!
//! The display path: failures talking to the remote service degrade to an
//! empty remote view (logged), because a listing hiccup should not blank
//! the whole page. The upload cycle uses its own strict listing instead.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::domain::{reconcile, BackupEntry, LocalBackup, RemoteObject, RemotePath, Slug};
use crate::ports::{IBackupSource, IRemoteStore};
use crate::usecases::tokens::TokenManager;

/// Use case producing the reconciled backup list for display.
pub struct QueryBackupsUseCase {
    backups: Arc<dyn IBackupSource>,
    remote: Arc<dyn IRemoteStore>,
    tokens: Arc<TokenManager>,
    remote_path: RemotePath,
}

impl QueryBackupsUseCase {
    /// Creates a new QueryBackupsUseCase with the required dependencies.
    pub fn new(
        backups: Arc<dyn IBackupSource>,
        remote: Arc<dyn IRemoteStore>,
        tokens: Arc<TokenManager>,
        remote_path: RemotePath,
    ) -> Self {
        Self {
            backups,
            remote,
            tokens,
            remote_path,
        }
    }

    /// Returns the reconciled entries, newest first.
    ///
    /// A missing token or a failed listing yields an empty remote view
    /// rather than an error; an unreadable backup directory propagates.
    pub async fn list(&self) -> Result<Vec<BackupEntry>> {
        let local = self
            .backups
            .scan()
            .await
            .context("Failed to scan local backups")?;

        let remote = self.list_remote_lenient().await;
        Ok(reconcile(&local, &remote))
    }

    /// Looks up one local backup by slug (used when serving an archive for
    /// download).
    pub async fn find_local(&self, slug: &Slug) -> Result<Option<LocalBackup>> {
        let mut local = self
            .backups
            .scan()
            .await
            .context("Failed to scan local backups")?;
        Ok(local.remove(slug))
    }

    /// Lists the remote directory, treating "no token yet" and transport
    /// failures as "nothing remote".
    async fn list_remote_lenient(&self) -> Vec<RemoteObject> {
        if !self.tokens.ensure_token().await {
            debug!("No token; remote view is empty");
            return Vec::new();
        }

        let Some(access_token) = self.tokens.access_token().await else {
            return Vec::new();
        };

        match self.remote.list(&access_token, &self.remote_path).await {
            Ok(objects) => objects,
            Err(e) => {
                warn!(
                    path = %self.remote_path,
                    error = %format!("{e:#}"),
                    "Remote listing failed; showing local view only"
                );
                Vec::new()
            }
        }
    }
}

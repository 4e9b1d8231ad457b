//! One upload/retention cycle
//!
//! Refreshes the token, scans the local directory, lists the remote one
//! (strictly - planning against an unknown remote state risks deleting the
//! wrong files), uploads what is missing and then prunes past the retention
//! ceiling. Local archives are never mutated or deleted, whatever happens
//! remotely.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::domain::{
    plan_deletions, plan_uploads, remote_name_for, RemoteName, RemotePath,
};
use crate::ports::{IBackupSource, IRemoteStore};
use crate::usecases::tokens::TokenManager;

/// What one cycle achieved, kept for the status surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleOutcome {
    /// Backups uploaded this cycle
    pub uploaded: usize,
    /// Remote objects deleted this cycle
    pub deleted: usize,
    /// Uploads that failed or were skipped after a failure
    pub upload_failures: usize,
    /// Deletions that failed or were skipped after a failure
    pub delete_failures: usize,
    /// When the cycle finished
    pub finished_at: Option<DateTime<Utc>>,
}

/// Use case running one reconcile-upload-prune cycle.
///
/// Cycles are request-driven and never overlap by deployment (the trigger
/// frequency keeps them apart); re-running with unchanged state is a no-op
/// because an already-present upload is an overwrite and the retention
/// arithmetic settles below the ceiling.
pub struct UploadCycleUseCase {
    backups: Arc<dyn IBackupSource>,
    remote: Arc<dyn IRemoteStore>,
    tokens: Arc<TokenManager>,
    remote_path: RemotePath,
    max_files: usize,
    refresh_lead: chrono::Duration,
}

impl UploadCycleUseCase {
    /// Creates a new UploadCycleUseCase.
    ///
    /// # Arguments
    /// * `backups` - Local backup discovery
    /// * `remote` - Remote storage transport
    /// * `tokens` - Token lifecycle manager
    /// * `remote_path` - Remote directory holding the backups
    /// * `max_files` - Retention ceiling for the remote directory
    /// * `refresh_lead` - How far ahead of expiry the token is refreshed
    pub fn new(
        backups: Arc<dyn IBackupSource>,
        remote: Arc<dyn IRemoteStore>,
        tokens: Arc<TokenManager>,
        remote_path: RemotePath,
        max_files: usize,
        refresh_lead: chrono::Duration,
    ) -> Self {
        Self {
            backups,
            remote,
            tokens,
            remote_path,
            max_files,
            refresh_lead,
        }
    }

    /// Runs one cycle to completion.
    ///
    /// Fails before touching anything remote when no token exists, the
    /// refresh fails, the local scan fails or the listing fails. After
    /// that, a failing upload aborts the remaining uploads only, and a
    /// failing deletion aborts the remaining deletions only; deletions are
    /// always computed from the uploads that actually succeeded, so a
    /// partial cycle can never delete more than the ceiling requires.
    pub async fn run(&self) -> Result<CycleOutcome> {
        if !self.tokens.ensure_token().await {
            bail!("No access token available; authorize first");
        }

        self.tokens
            .refresh_if_needed(self.refresh_lead)
            .await
            .context("Cannot start upload cycle with a stale token")?;

        let access_token = self
            .tokens
            .access_token()
            .await
            .context("Token disappeared during refresh")?;

        let local = self
            .backups
            .scan()
            .await
            .context("Failed to scan local backups")?;

        let remote_objects = self
            .remote
            .list(&access_token, &self.remote_path)
            .await
            .context("Remote listing failed; refusing to plan against unknown state")?;

        let remote_names: Vec<RemoteName> = remote_objects
            .iter()
            .map(|o| RemoteName::new(o.name.clone()))
            .collect::<Result<_, _>>()?;

        let upload = plan_uploads(&local, &remote_names);
        info!(count = upload.len(), "Backups to upload");

        let mut uploaded = 0;
        let mut upload_failures = 0;
        for slug in &upload {
            let backup = &local[slug];
            let destination = self.remote_path.join(&remote_name_for(backup));

            info!(
                source = %backup.path.display(),
                destination = %destination,
                "Uploading backup"
            );
            match self
                .remote
                .upload(&access_token, &backup.path, &destination, true)
                .await
            {
                Ok(()) => {
                    info!(destination = %destination, "Backup uploaded");
                    uploaded += 1;
                }
                Err(e) => {
                    error!(
                        source = %backup.path.display(),
                        error = %format!("{e:#}"),
                        "Upload failed; skipping remaining uploads"
                    );
                    upload_failures = upload.len() - uploaded;
                    break;
                }
            }
        }

        // Prune from the pre-cycle listing plus what actually landed.
        let delete = plan_deletions(&remote_names, uploaded, self.max_files);
        info!(count = delete.len(), "Remote backups to delete");

        let mut deleted = 0;
        let mut delete_failures = 0;
        for name in &delete {
            let target = self.remote_path.join(name);

            info!(target = %target, "Removing remote backup");
            match self.remote.remove(&access_token, &target).await {
                Ok(()) => {
                    info!(target = %target, "Remote backup removed");
                    deleted += 1;
                }
                Err(e) => {
                    error!(
                        target = %target,
                        error = %format!("{e:#}"),
                        "Removal failed; skipping remaining deletions"
                    );
                    delete_failures = delete.len() - deleted;
                    break;
                }
            }
        }

        Ok(CycleOutcome {
            uploaded,
            deleted,
            upload_failures,
            delete_failures,
            finished_at: Some(Utc::now()),
        })
    }
}

//! Shared application state
//!
//! Wires the adapters into the core use cases once at startup and carries
//! the outcome of the most recent upload cycle for the status endpoint.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;

use cloudbak_archive::ArchiveScanner;
use cloudbak_core::config::Config;
use cloudbak_core::domain::RemotePath;
use cloudbak_core::ports::{IBackupSource, IRemoteStore, ITokenStore};
use cloudbak_core::usecases::{
    CycleOutcome, QueryBackupsUseCase, TokenManager, UploadCycleUseCase,
};
use cloudbak_disk::{DiskStore, FileTokenStore};

/// Application state shared by the HTTP handlers and the scheduler.
pub struct AppState {
    pub query: QueryBackupsUseCase,
    pub cycle: UploadCycleUseCase,
    pub tokens: Arc<TokenManager>,
    /// Outcome of the most recent upload cycle, if any ran.
    pub last_cycle: Mutex<Option<CycleOutcome>>,
}

impl AppState {
    /// Builds the full object graph from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let remote_path = RemotePath::new(config.remote.base_path.clone())
            .context("Invalid remote.base_path in configuration")?;

        let store: Arc<dyn IRemoteStore> =
            Arc::new(DiskStore::new(&config.remote, &config.transport)?);
        let token_store: Arc<dyn ITokenStore> =
            Arc::new(FileTokenStore::new(&config.token_file));
        let source: Arc<dyn IBackupSource> = Arc::new(ArchiveScanner::new(&config.backup_dir));

        let tokens = Arc::new(TokenManager::new(
            token_store,
            store.clone(),
            config.remote.auth_url.clone(),
            config.remote.client_id.clone(),
        ));

        let query = QueryBackupsUseCase::new(
            source.clone(),
            store.clone(),
            tokens.clone(),
            remote_path.clone(),
        );
        let cycle = UploadCycleUseCase::new(
            source,
            store,
            tokens.clone(),
            remote_path,
            config.remote.max_files,
            chrono::Duration::days(config.server.refresh_lead_days),
        );

        Ok(Self {
            query,
            cycle,
            tokens,
            last_cycle: Mutex::new(None),
        })
    }

    /// Runs one upload cycle and remembers its outcome.
    pub async fn run_cycle(&self) -> Result<CycleOutcome> {
        let outcome = self.cycle.run().await?;
        *self.last_cycle.lock().await = Some(outcome.clone());
        Ok(outcome)
    }
}

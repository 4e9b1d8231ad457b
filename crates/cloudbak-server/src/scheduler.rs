//! Scheduled upload trigger
//!
//! The core exposes the upload cycle as a plain entry point and never owns
//! a timer; this is the periodic trigger that invokes it. Overlap between
//! cycles is excluded by schedule frequency, matching the single-cycle
//! execution model.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::state::AppState;

pub struct UploadScheduler {
    scheduler: Mutex<JobScheduler>,
    state: Arc<AppState>,
}

impl UploadScheduler {
    pub async fn new(state: Arc<AppState>) -> anyhow::Result<Self> {
        let scheduler = JobScheduler::new().await?;
        Ok(Self {
            scheduler: Mutex::new(scheduler),
            state,
        })
    }

    /// Registers the upload cycle under the given cron expression.
    pub async fn schedule(&self, cron_expression: &str) -> anyhow::Result<()> {
        let state = self.state.clone();

        let job = Job::new_async(cron_expression, move |_uuid, _lock| {
            let state = state.clone();
            Box::pin(async move {
                tracing::info!("Starting scheduled upload cycle");
                match state.run_cycle().await {
                    Ok(outcome) => tracing::info!(
                        uploaded = outcome.uploaded,
                        deleted = outcome.deleted,
                        upload_failures = outcome.upload_failures,
                        delete_failures = outcome.delete_failures,
                        "Scheduled upload cycle finished"
                    ),
                    Err(e) => {
                        tracing::error!(error = %format!("{e:#}"), "Scheduled upload cycle failed")
                    }
                }
            })
        })?;

        self.scheduler.lock().await.add(job).await?;
        tracing::info!(cron = %cron_expression, "Upload cycle scheduled");
        Ok(())
    }

    pub async fn start(&self) -> anyhow::Result<()> {
        self.scheduler.lock().await.start().await?;
        Ok(())
    }

    pub async fn shutdown(&self) -> anyhow::Result<()> {
        self.scheduler.lock().await.shutdown().await?;
        Ok(())
    }
}

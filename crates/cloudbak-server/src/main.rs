mod error;
mod routes;
mod scheduler;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use cloudbak_core::config::Config;
use crate::scheduler::UploadScheduler;
use crate::state::AppState;
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var("CLOUDBAK_OPTIONS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| Config::default_path());
    let config = Config::load_or_default(&config_path);

    // Initialize logging; RUST_LOG overrides the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.clone().into()),
        )
        .init();

    tracing::info!(config_path = %config_path.display(), "Loaded configuration");
    for problem in config.validate() {
        tracing::warn!(%problem, "Configuration problem");
    }

    // Build application state
    let app_state = Arc::new(AppState::from_config(&config)?);

    // Warm the token cache; absence just means the user has not authorized yet.
    if !app_state.tokens.ensure_token().await {
        tracing::warn!("No access token yet; visit /api/auth/url to authorize");
    }

    let cancel = CancellationToken::new();

    // Initialize the cron trigger for the upload cycle
    let upload_scheduler = match UploadScheduler::new(app_state.clone()).await {
        Ok(s) => {
            if let Err(e) = s.schedule(&config.schedule).await {
                tracing::warn!("Failed to schedule upload cycle: {e:#}");
            }
            if let Err(e) = s.start().await {
                tracing::warn!("Failed to start scheduler: {e:#}");
            }
            Some(s)
        }
        Err(e) => {
            tracing::warn!("Failed to create scheduler: {e:#}");
            None
        }
    };

    // Build router
    let app = routes::router(app_state.clone());

    // Start HTTP server
    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    // Graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await?;

    // Cleanup
    tracing::info!("Shutting down...");
    cancel.cancel();
    if let Some(s) = upload_scheduler {
        if let Err(e) = s.shutdown().await {
            tracing::warn!("Scheduler shutdown failed: {e:#}");
        }
    }

    Ok(())
}

async fn shutdown_signal(cancel: CancellationToken) {
    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Received shutdown signal");
        }
        _ = cancel.cancelled() => {}
    }
}

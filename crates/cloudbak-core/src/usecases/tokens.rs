//! Token lifecycle management
//!
//! Tracks the access/refresh token pair with its expiry: lazy loading from
//! the durable store, the one-time check-code exchange, and refreshing
//! ahead of expiration. The manager is the only writer of both the cached
//! triple and the persisted record.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::TokenState;
use crate::ports::{IRemoteStore, ITokenStore};

/// Manages the OAuth token pair for the remote storage service.
///
/// Token absence is a normal, expected state (first run, revoked access)
/// and is reported through boolean queries, never through errors. Exchange
/// and refresh failures are real faults and propagate to the caller.
pub struct TokenManager {
    store: Arc<dyn ITokenStore>,
    remote: Arc<dyn IRemoteStore>,
    auth_url: String,
    client_id: String,
    cached: Mutex<Option<TokenState>>,
}

impl TokenManager {
    /// Creates a new manager with nothing cached yet.
    ///
    /// # Arguments
    /// * `store` - Durable persistence for the token record
    /// * `remote` - Transport used for the code and refresh exchanges
    /// * `auth_url` - Authorization endpoint the user visits for a check code
    /// * `client_id` - Registered application id, appended to the URL
    pub fn new(
        store: Arc<dyn ITokenStore>,
        remote: Arc<dyn IRemoteStore>,
        auth_url: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            remote,
            auth_url: auth_url.into(),
            client_id: client_id.into(),
            cached: Mutex::new(None),
        }
    }

    /// URL where the user obtains a check code to paste back.
    #[must_use]
    pub fn authorize_url(&self) -> String {
        format!(
            "{}?response_type=code&client_id={}",
            self.auth_url, self.client_id
        )
    }

    /// Returns whether a usable token now exists, loading the persisted
    /// record on first need. Never raises; a store failure is logged and
    /// treated as absence.
    pub async fn ensure_token(&self) -> bool {
        let mut cached = self.cached.lock().await;
        if cached.is_some() {
            return true;
        }

        match self.store.load().await {
            Ok(Some(tokens)) => {
                debug!(expires_at = %tokens.expires_at, "Loaded persisted token");
                *cached = Some(tokens);
                true
            }
            Ok(None) => {
                debug!("No persisted token");
                false
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "Failed to read token store");
                false
            }
        }
    }

    /// The cached access token, if any.
    pub async fn access_token(&self) -> Option<String> {
        self.cached
            .lock()
            .await
            .as_ref()
            .map(|t| t.access_token.clone())
    }

    /// A snapshot of the cached token state, if any.
    pub async fn token_state(&self) -> Option<TokenState> {
        self.cached.lock().await.clone()
    }

    /// Exchanges a one-time check code for a token pair and persists it.
    ///
    /// This is a user-initiated action: any transport or protocol error
    /// propagates so the caller can show it instead of hiding it.
    pub async fn create_token(&self, check_code: &str) -> Result<()> {
        let tokens = self
            .remote
            .get_token(check_code)
            .await
            .context("Check code exchange failed")?;

        self.store
            .save(&tokens)
            .await
            .context("Failed to persist new token")?;

        info!(expires_at = %tokens.expires_at, "Token created");
        *self.cached.lock().await = Some(tokens);
        Ok(())
    }

    /// Refreshes the token pair when it expires within `lead`, persisting
    /// the new pair before returning.
    ///
    /// Called at the start of any operation that depends on a live token.
    /// Refresh failures propagate: an upload cycle must not proceed with a
    /// stale token. With no token cached or persisted this is a no-op; the
    /// caller's `ensure_token` check decides whether to proceed at all.
    pub async fn refresh_if_needed(&self, lead: chrono::Duration) -> Result<()> {
        if !self.ensure_token().await {
            return Ok(());
        }

        let mut cached = self.cached.lock().await;
        let Some(current) = cached.as_ref() else {
            return Ok(());
        };

        if !current.expires_within(lead) {
            debug!(expires_at = %current.expires_at, "Token refresh not needed");
            return Ok(());
        }

        info!(expires_at = %current.expires_at, "Refreshing token");
        let refreshed = self
            .remote
            .refresh_token(&current.refresh_token)
            .await
            .context("Token refresh failed")?;

        self.store
            .save(&refreshed)
            .await
            .context("Failed to persist refreshed token")?;

        info!(expires_at = %refreshed.expires_at, "Token refreshed");
        *cached = Some(refreshed);
        Ok(())
    }
}

//! Token store port (driven/secondary port)
//!
//! Durable persistence for the OAuth token record. Absence is a valid
//! state: on first run, or after access is revoked, there simply is no
//! record yet.

use crate::domain::TokenState;

/// Port trait for persisting the token record
///
/// Implementations must replace the stored record atomically so a crash
/// mid-write can never leave a partial token behind.
#[async_trait::async_trait]
pub trait ITokenStore: Send + Sync {
    /// Loads the persisted record. `Ok(None)` when none exists.
    async fn load(&self) -> anyhow::Result<Option<TokenState>>;

    /// Persists the record, replacing any previous one.
    async fn save(&self, tokens: &TokenState) -> anyhow::Result<()>;

    /// Removes the persisted record, if any.
    async fn clear(&self) -> anyhow::Result<()>;
}

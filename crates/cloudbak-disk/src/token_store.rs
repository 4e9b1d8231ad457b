//! File-backed token persistence
//!
//! Stores the token record as one JSON file, replaced atomically on every
//! save: the new record is written to a temporary file in the same
//! directory and renamed over the old one, so a crash mid-write can never
//! leave a partial token behind. A missing file is the normal
//! "not yet authorized" state, not an error.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use cloudbak_core::domain::TokenState;
use cloudbak_core::ports::ITokenStore;

/// Persists the token record to a single JSON file.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store writing to the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn write_atomically(path: &Path, json: String) -> Result<()> {
        let dir = path
            .parent()
            .context("Token file path has no parent directory")?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .context("Failed to create temporary token file")?;
        tmp.write_all(json.as_bytes())
            .context("Failed to write token record")?;
        tmp.flush().context("Failed to flush token record")?;
        tmp.persist(path)
            .context("Failed to replace token file")?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ITokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<TokenState>> {
        match tokio::fs::read(&self.path).await {
            Ok(raw) => {
                let tokens: TokenState = serde_json::from_slice(&raw)
                    .with_context(|| format!("Corrupt token file {}", self.path.display()))?;
                debug!(path = %self.path.display(), "Loaded token record");
                Ok(Some(tokens))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No token record yet");
                Ok(None)
            }
            Err(e) => {
                Err(e).with_context(|| format!("Cannot read token file {}", self.path.display()))
            }
        }
    }

    async fn save(&self, tokens: &TokenState) -> Result<()> {
        let json =
            serde_json::to_string_pretty(tokens).context("Failed to serialize token record")?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::write_atomically(&path, json))
            .await
            .context("Token write task failed")??;

        info!(path = %self.path.display(), "Token record saved");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                info!(path = %self.path.display(), "Token record removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Cannot remove token file {}", self.path.display()))
            }
        }
    }
}

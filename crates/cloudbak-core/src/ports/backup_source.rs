//! Local backup source port (driven/secondary port)
//!
//! Interface for discovering the backup archives present on the local
//! filesystem. The primary implementation scans a directory of tape
//! archives with embedded metadata; tests substitute in-memory fakes.

use std::collections::BTreeMap;

use crate::domain::{LocalBackup, Slug};

/// Port trait for local backup discovery
///
/// ## Implementation Notes
///
/// - A scan covers the archives directly inside the configured directory,
///   non-recursively.
/// - Individual unreadable or malformed archives must not fail the scan;
///   implementations skip them and log a diagnostic. Only an unreadable
///   directory is an error.
/// - Local archives are read-only to this system; implementations must
///   never mutate or delete them.
#[async_trait::async_trait]
pub trait IBackupSource: Send + Sync {
    /// Scans the backup directory and returns one record per valid archive,
    /// keyed by slug.
    async fn scan(&self) -> anyhow::Result<BTreeMap<Slug, LocalBackup>>;
}

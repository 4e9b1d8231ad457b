//! Backup directory scanner
//!
//! Walks the backup directory (non-recursively), opens each `.tar` archive
//! and extracts the `./backup.json` metadata entry. Broken archives never
//! fail the scan: they are skipped with a logged diagnostic so one corrupt
//! file can't hide every other backup.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use cloudbak_core::domain::{mib_from_bytes, DomainError, LocalBackup, Slug};
use cloudbak_core::ports::IBackupSource;

/// Archive entry holding the backup metadata.
const METADATA_ENTRY: &str = "backup.json";

/// Why a single archive was skipped during a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The archive file could not be read or is not a valid tape archive.
    #[error("cannot read archive: {0}")]
    Archive(#[from] std::io::Error),

    /// The archive has no `./backup.json` entry.
    #[error("archive has no {METADATA_ENTRY} entry")]
    MissingMetadata,

    /// The metadata entry is not valid JSON or lacks a required field.
    #[error("malformed backup metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    /// The metadata slug failed validation.
    #[error("invalid backup metadata: {0}")]
    InvalidField(#[from] DomainError),
}

/// The embedded metadata document. Serde rejects missing fields, which is
/// exactly the required "skip this archive" behavior.
#[derive(Debug, Deserialize)]
struct ArchiveMetadata {
    slug: String,
    name: String,
    date: String,
}

/// Scans a directory of backup archives.
///
/// Archives are read-only to this subsystem: the scanner never writes,
/// renames or deletes anything under the backup directory.
pub struct ArchiveScanner {
    backup_dir: PathBuf,
}

impl ArchiveScanner {
    /// Creates a scanner for the given directory.
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
        }
    }
}

#[async_trait::async_trait]
impl IBackupSource for ArchiveScanner {
    async fn scan(&self) -> anyhow::Result<BTreeMap<Slug, LocalBackup>> {
        let dir = self.backup_dir.clone();
        tokio::task::spawn_blocking(move || read_backups(&dir))
            .await
            .context("Backup scan task failed")?
    }
}

/// Reads every `.tar` archive directly inside `dir`.
fn read_backups(dir: &Path) -> anyhow::Result<BTreeMap<Slug, LocalBackup>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Cannot read backup directory {}", dir.display()))?;

    let mut backups = BTreeMap::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Cannot list {}", dir.display()))?;
        let path = entry.path();

        if !path.is_file() || path.extension().map_or(true, |ext| ext != "tar") {
            continue;
        }

        match read_backup(&path) {
            Ok(backup) => {
                debug!(slug = %backup.slug, path = %path.display(), "Found backup");
                backups.insert(backup.slug.clone(), backup);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unable to read backup, skipping");
            }
        }
    }

    debug!(count = backups.len(), dir = %dir.display(), "Scan finished");
    Ok(backups)
}

/// Builds one backup record from an archive file.
fn read_backup(path: &Path) -> Result<LocalBackup, ScanError> {
    let metadata = extract_metadata(path)?;
    let slug = Slug::new(metadata.slug)?;

    let file_meta = std::fs::metadata(path)?;
    let created = parse_backup_date(&metadata.date).unwrap_or_else(|| {
        warn!(
            path = %path.display(),
            date = %metadata.date,
            "Cannot parse backup date, using file timestamp"
        );
        file_timestamp(&file_meta)
    });

    Ok(LocalBackup {
        slug,
        name: metadata.name,
        created,
        path: path.to_path_buf(),
        size_mb: mib_from_bytes(file_meta.len()),
    })
}

/// Pulls `./backup.json` out of an uncompressed tape archive.
fn extract_metadata(path: &Path) -> Result<ArchiveMetadata, ScanError> {
    let file = File::open(path)?;
    let mut archive = tar::Archive::new(file);

    for entry in archive.entries()? {
        let mut entry = entry?;
        let entry_path = entry.path()?.into_owned();
        let normalized = entry_path.strip_prefix(".").unwrap_or(&entry_path);
        if normalized != Path::new(METADATA_ENTRY) {
            continue;
        }

        let mut raw = String::new();
        entry.read_to_string(&mut raw)?;
        let metadata: ArchiveMetadata = serde_json::from_str(&raw)?;
        return Ok(metadata);
    }

    Err(ScanError::MissingMetadata)
}

/// Parses the metadata date, an ISO-8601 timestamp with a colon inside the
/// timezone offset (e.g. `2020-01-30T21:59:59.613846+00:00`).
fn parse_backup_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Creation time of the archive file, falling back to the modification
/// time on filesystems that don't track creation.
fn file_timestamp(meta: &std::fs::Metadata) -> DateTime<Utc> {
    meta.created()
        .or_else(|_| meta.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}

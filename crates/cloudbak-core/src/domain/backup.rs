//! Backup records and token state
//!
//! The three views of a backup (local archive, remote object, reconciled
//! display entry) plus the OAuth token triple. These are plain records in
//! the style of port-level DTOs: adapters construct them at the boundary,
//! the domain treats them as immutable.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::newtypes::Slug;

/// Bytes per mebibyte, the unit backup sizes are displayed in.
const BYTES_PER_MIB: f64 = 1_048_576.0;

/// Converts a byte count to mebibytes rounded to two decimal places.
#[must_use]
pub fn mib_from_bytes(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_MIB * 100.0).round() / 100.0
}

// ============================================================================
// LocalBackup
// ============================================================================

/// A backup archive found in the local backup directory.
///
/// One record per valid archive; immutable once read. The record set is
/// owned by the scan that produced it and discarded afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalBackup {
    /// Unique identifier from the embedded metadata
    pub slug: Slug,
    /// Display name from the embedded metadata
    pub name: String,
    /// Creation time from the metadata, or the file timestamp as fallback
    pub created: DateTime<Utc>,
    /// Location of the archive file
    pub path: PathBuf,
    /// Archive size in mebibytes, rounded to two decimals
    pub size_mb: f64,
}

// ============================================================================
// RemoteObject
// ============================================================================

/// Whether a listed remote object is a plain file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteKind {
    File,
    Dir,
}

/// An object listed in the remote backup directory.
///
/// Produced by the listing call, read-only, discarded after each listing.
/// Adapters must validate the wire payload before constructing one; a
/// listing item missing any of these fields is a listing error, not a
/// record with holes.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteObject {
    /// Object name within the remote directory
    pub name: String,
    /// Object size in bytes
    pub size: u64,
    /// Last modification time reported by the service
    pub modified: DateTime<Utc>,
    /// File or directory
    pub kind: RemoteKind,
}

impl RemoteObject {
    /// Returns true if this object is a plain file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == RemoteKind::File
    }
}

// ============================================================================
// BackupEntry
// ============================================================================

/// A reconciled backup record for display.
///
/// Derived, never persisted; rebuilt on every reconciliation request.
/// A local backup and a remote object are the same logical backup iff the
/// object's name equals the name derived from the local record.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupEntry {
    /// Slug of the local backup; `None` for remote-only entries
    pub slug: Option<Slug>,
    /// Display name (local name, or the remote object name)
    pub name: String,
    /// Effective date: local creation time, or remote modification time
    pub date: DateTime<Utc>,
    /// Size in mebibytes
    pub size_mb: f64,
    /// Present in the local backup directory
    pub in_local: bool,
    /// Present in the remote directory
    pub in_remote: bool,
}

impl BackupEntry {
    /// Date formatted for display, e.g. `2020-01-30 21:59:59 UTC`.
    #[must_use]
    pub fn formatted_date(&self) -> String {
        self.date.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }

    /// Size formatted for display, e.g. `123.00`.
    #[must_use]
    pub fn formatted_size(&self) -> String {
        format!("{:.2}", self.size_mb)
    }
}

// ============================================================================
// TokenState
// ============================================================================

/// OAuth tokens for the remote storage service.
///
/// Persisted by the token store as a single JSON record; mutated only by
/// the token manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenState {
    /// Bearer token for API requests
    pub access_token: String,
    /// Token for obtaining new access tokens without user interaction
    pub refresh_token: String,
    /// When the access token expires
    pub expires_at: DateTime<Utc>,
}

impl TokenState {
    /// Returns true if the access token has expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Returns true if the access token will expire within the given duration
    #[must_use]
    pub fn expires_within(&self, duration: chrono::Duration) -> bool {
        Utc::now() + duration >= self.expires_at
    }
}

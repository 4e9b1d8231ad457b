//! Remote name mapping
//!
//! Derives the name a local backup is stored under remotely, following the
//! pattern `name_slug` with spaces replaced by hyphens and colons by
//! underscores. This is the join key between the local and the remote view;
//! it must stay stable across runs or retention counting breaks.

use super::backup::LocalBackup;
use super::newtypes::RemoteName;

/// Derives the expected remote object name for a local backup.
///
/// Given a backup named `nightly 03:00` with slug `abc123`, produces
/// `nightly-03_00_abc123`. Pure and deterministic: equal inputs always
/// produce equal outputs.
#[must_use]
pub fn remote_name_for(backup: &LocalBackup) -> RemoteName {
    let raw = format!("{}_{}", backup.name, backup.slug.as_str());
    RemoteName::new_unchecked(raw.replace(' ', "-").replace(':', "_"))
}

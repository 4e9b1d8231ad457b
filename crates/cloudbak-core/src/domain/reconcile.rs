//! Reconciliation of the local and remote backup views
//!
//! Merges the scan result and the remote listing into one ordered sequence
//! of display entries. This is a read-only view: retention planning
//! (deciding what to upload and delete) reasons purely about names and
//! counts and lives in [`retention`](super::retention).

use std::collections::{BTreeMap, HashSet};

use super::backup::{mib_from_bytes, BackupEntry, LocalBackup, RemoteObject};
use super::namer::remote_name_for;
use super::newtypes::Slug;

/// Merges local backups and remote objects into display entries.
///
/// Every local backup and every remote object appears in exactly one entry;
/// no entry represents more than one physical file:
///
/// 1. Each local backup becomes an entry with `in_local`; it claims the
///    remote object whose name matches its derived remote name, if any.
/// 2. Each unclaimed remote object becomes a remote-only entry carrying its
///    own name, size and modification time.
/// 3. The combined sequence is sorted by effective date, newest first. The
///    sort is stable, so ties keep input order (local-derived entries before
///    unclaimed remote ones).
#[must_use]
pub fn reconcile(
    local: &BTreeMap<Slug, LocalBackup>,
    remote: &[RemoteObject],
) -> Vec<BackupEntry> {
    let remote_names: HashSet<&str> = remote.iter().map(|o| o.name.as_str()).collect();
    let mut claimed: HashSet<String> = HashSet::new();

    let mut entries = Vec::with_capacity(local.len() + remote.len());

    for backup in local.values() {
        let expected = remote_name_for(backup);
        let in_remote = remote_names.contains(expected.as_str());
        if in_remote {
            claimed.insert(expected.as_str().to_string());
        }
        entries.push(BackupEntry {
            slug: Some(backup.slug.clone()),
            name: backup.name.clone(),
            date: backup.created,
            size_mb: backup.size_mb,
            in_local: true,
            in_remote,
        });
    }

    for object in remote {
        if claimed.contains(object.name.as_str()) {
            continue;
        }
        entries.push(BackupEntry {
            slug: None,
            name: object.name.clone(),
            date: object.modified,
            size_mb: mib_from_bytes(object.size),
            in_local: false,
            in_remote: true,
        });
    }

    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries
}

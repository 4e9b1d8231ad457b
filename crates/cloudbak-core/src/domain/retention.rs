//! Retention and upload planning
//!
//! Decides which local backups need uploading and which remote objects have
//! to go once the retention ceiling is exceeded. Works purely on names and
//! counts; executing the plan is the upload cycle's job.

use std::collections::{BTreeMap, HashSet};

use super::backup::LocalBackup;
use super::namer::remote_name_for;
use super::newtypes::{RemoteName, Slug};

/// The slugs to upload and the remote names to delete for one cycle.
///
/// Computed fresh per invocation; never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetentionPlan {
    /// Local backups not yet present remotely, oldest first
    pub upload: Vec<Slug>,
    /// Remote objects past the retention ceiling
    pub delete: Vec<RemoteName>,
}

impl RetentionPlan {
    /// Returns true when there is nothing to upload and nothing to delete.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upload.is_empty() && self.delete.is_empty()
    }
}

/// Local backups whose derived remote name is absent from the listing.
///
/// Returned oldest first, the order they are uploaded in.
#[must_use]
pub fn plan_uploads(
    local: &BTreeMap<Slug, LocalBackup>,
    remote_names: &[RemoteName],
) -> Vec<Slug> {
    let names: HashSet<&str> = remote_names.iter().map(RemoteName::as_str).collect();

    let mut pending: Vec<&LocalBackup> = local
        .values()
        .filter(|backup| !names.contains(remote_name_for(backup).as_str()))
        .collect();
    pending.sort_by_key(|backup| backup.created);

    pending.into_iter().map(|b| b.slug.clone()).collect()
}

/// Remote objects to delete so the projected count fits the ceiling.
///
/// `remote_names` must be sorted newest first, as returned by the listing;
/// the oldest objects (the tail of the list) are selected. The delete count
/// is `projected - max_files` where `projected = remote count + new upload
/// count`, clamped so that at most every current remote object is deleted.
#[must_use]
pub fn plan_deletions(
    remote_names: &[RemoteName],
    new_upload_count: usize,
    max_files: usize,
) -> Vec<RemoteName> {
    let remote_count = remote_names.len();
    let projected = remote_count + new_upload_count;
    if projected <= max_files {
        return Vec::new();
    }

    let count = (projected - max_files).min(remote_count);
    remote_names[remote_count - count..].to_vec()
}

/// Computes the full plan for one cycle from the current local backups and
/// the current remote listing (names newest first).
#[must_use]
pub fn plan_retention(
    local: &BTreeMap<Slug, LocalBackup>,
    remote_names: &[RemoteName],
    max_files: usize,
) -> RetentionPlan {
    let upload = plan_uploads(local, remote_names);
    let delete = plan_deletions(remote_names, upload.len(), max_files);
    RetentionPlan { upload, delete }
}

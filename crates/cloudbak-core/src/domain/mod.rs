//! Domain entities and business logic
//!
//! This module contains the core domain types for cloudbak:
//! - Newtypes for type-safe identifiers and validated domain values
//! - Backup records (local, remote, reconciled) and token state
//! - The remote name mapping that joins the local and remote views
//! - Reconciliation of the two views for display
//! - Retention planning (what to upload, what to delete)
//! - Domain-specific error types

pub mod backup;
pub mod errors;
pub mod namer;
pub mod newtypes;
pub mod reconcile;
pub mod retention;

// Re-export commonly used types
pub use backup::{mib_from_bytes, BackupEntry, LocalBackup, RemoteKind, RemoteObject, TokenState};
pub use errors::DomainError;
pub use namer::remote_name_for;
pub use newtypes::{RemoteName, RemotePath, Slug};
pub use reconcile::reconcile;
pub use retention::{plan_deletions, plan_retention, plan_uploads, RetentionPlan};

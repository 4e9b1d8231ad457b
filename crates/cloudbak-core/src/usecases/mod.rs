//! Use cases orchestrating the domain through port interfaces
//!
//! - [`TokenManager`] - OAuth token lifecycle (load, create, refresh)
//! - [`QueryBackupsUseCase`] - read-only reconciled view for display
//! - [`UploadCycleUseCase`] - one upload/retention cycle

pub mod query_backups;
pub mod tokens;
pub mod upload_cycle;

pub use query_backups::QueryBackupsUseCase;
pub use tokens::TokenManager;
pub use upload_cycle::{CycleOutcome, UploadCycleUseCase};

#[cfg(test)]
pub(crate) mod support;

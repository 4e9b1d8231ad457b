//! Local backup archive scanning for cloudbak
//!
//! Implements the [`IBackupSource`](cloudbak_core::ports::IBackupSource)
//! port by reading uncompressed tape archives with embedded JSON metadata
//! from the local backup directory.

pub mod scanner;

pub use scanner::{ArchiveScanner, ScanError};

//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IBackupSource`] - Scanning the local backup directory
//! - [`IRemoteStore`] - Remote object-storage transport (listing, upload,
//!   delete, token exchange)
//! - [`ITokenStore`] - Durable persistence for the OAuth token record

pub mod backup_source;
pub mod remote_store;
pub mod token_store;

pub use backup_source::IBackupSource;
pub use remote_store::IRemoteStore;
pub use token_store::ITokenStore;

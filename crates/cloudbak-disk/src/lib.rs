//! Cloud disk REST adapter for cloudbak
//!
//! Implements the remote storage transport and the durable token store:
//! - [`DiskClient`] - HTTP plumbing (auth header, timeouts, bounded retry)
//! - [`DiskStore`] - [`IRemoteStore`](cloudbak_core::ports::IRemoteStore)
//!   implementation (listing, upload, delete, token exchange)
//! - [`DiskAuth`] - OAuth2 check-code and refresh exchanges
//! - [`FileTokenStore`] - [`ITokenStore`](cloudbak_core::ports::ITokenStore)
//!   implementation with atomic file replacement

pub mod auth;
pub mod client;
pub mod store;
pub mod token_store;

pub use auth::DiskAuth;
pub use client::DiskClient;
pub use store::DiskStore;
pub use token_store::FileTokenStore;

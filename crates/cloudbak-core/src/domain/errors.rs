//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! mostly validation failures raised when a newtype is constructed
//! from untrusted input.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid backup slug
    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    /// Invalid remote object name
    #[error("Invalid remote name: {0}")]
    InvalidRemoteName(String),

    /// Invalid remote directory path
    #[error("Invalid remote path: {0}")]
    InvalidRemotePath(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

//! Domain newtypes with validation
//!
//! Strongly-typed wrappers for the string values the system joins on.
//! Each newtype ensures data validity at construction time; once a value
//! exists it can be trusted everywhere downstream.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// Slug
// ============================================================================

/// The unique identifier embedded in a local backup's metadata.
///
/// Distinct from the backup's display name; stable for the lifetime of the
/// archive and used as the map key for a scan result.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Create a validated slug. Must be non-empty and contain no `/` or
    /// whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::InvalidSlug("slug is empty".to_string()));
        }
        if value.contains('/') || value.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidSlug(value));
        }
        Ok(Self(value))
    }

    /// Get the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Slug {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ============================================================================
// RemoteName
// ============================================================================

/// The name of an object in the remote backup directory.
///
/// For objects that correspond to a local backup this is the value produced
/// by [`remote_name_for`](super::namer::remote_name_for); for foreign objects
/// it is whatever the listing returned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteName(String);

impl RemoteName {
    /// Create a validated remote name. Must be non-empty.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::InvalidRemoteName(
                "remote name is empty".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Construct without validation. Only for values the domain itself
    /// derives from already-validated parts.
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self(value)
    }

    /// Get the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RemoteName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RemoteName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ============================================================================
// RemotePath
// ============================================================================

/// The remote directory that holds the uploaded backups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemotePath(String);

impl RemotePath {
    /// Create a validated remote path. Must be non-empty and must not end
    /// with `/` (object paths are joined onto it with a separator).
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::InvalidRemotePath(
                "remote path is empty".to_string(),
            ));
        }
        if value.ends_with('/') {
            return Err(DomainError::InvalidRemotePath(value));
        }
        Ok(Self(value))
    }

    /// Get the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full remote path of an object inside this directory.
    #[must_use]
    pub fn join(&self, name: &RemoteName) -> String {
        format!("{}/{}", self.0, name.as_str())
    }
}

impl Display for RemotePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RemotePath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

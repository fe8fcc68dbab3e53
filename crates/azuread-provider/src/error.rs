//! Provider error types
//!
//! Every remote failure is wrapped with the operation and the identifiers it
//! concerned, so the caller can tell which call in a sequence failed.

use azuread_directory::DirectoryError;
use std::fmt;
use thiserror::Error;

use crate::ids::IdError;

/// Result type alias using `ProviderError`.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Owner mutation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerOperation {
    Add,
    Remove,
}

impl fmt::Display for OwnerOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerOperation::Add => f.write_str("adding"),
            OwnerOperation::Remove => f.write_str("removing"),
        }
    }
}

/// Error that can occur while managing group resources.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Resource configuration failed validation.
    #[error("invalid configuration: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A composite identifier is malformed.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),

    /// The remote object does not exist.
    #[error("{resource} {id:?} not found")]
    NotFound { resource: &'static str, id: String },

    /// An attribute that cannot change in place was changed.
    #[error("attribute '{attribute}' cannot be changed after creation; the resource must be replaced")]
    ImmutableAttribute { attribute: &'static str },

    /// Adding or removing an owner failed.
    #[error("error {operation} owner {owner_id:?} of group {group_id:?}: {source}")]
    OwnerOperation {
        operation: OwnerOperation,
        group_id: String,
        owner_id: String,
        #[source]
        source: DirectoryError,
    },

    /// Any other directory call failed.
    #[error("error {operation} {id:?}: {source}")]
    Directory {
        operation: &'static str,
        id: String,
        #[source]
        source: DirectoryError,
    },

    /// The group was created but a later step failed.
    #[error("group {group_id:?} was created but could not be completed: {source}")]
    CreateIncomplete {
        group_id: String,
        #[source]
        source: Box<ProviderError>,
    },
}

impl ProviderError {
    /// Wraps a directory failure with the operation and object it concerned.
    pub fn directory(operation: &'static str, id: impl Into<String>, source: DirectoryError) -> Self {
        ProviderError::Directory {
            operation,
            id: id.into(),
            source,
        }
    }

    /// Check if this error means the remote object is absent.
    pub fn is_not_found(&self) -> bool {
        match self {
            ProviderError::NotFound { .. } => true,
            ProviderError::Directory { source, .. } | ProviderError::OwnerOperation { source, .. } => {
                source.is_not_found()
            }
            ProviderError::CreateIncomplete { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is caused by bad input rather than the remote system.
    pub fn is_validation(&self) -> bool {
        match self {
            ProviderError::Validation(_)
            | ProviderError::InvalidId(_)
            | ProviderError::ImmutableAttribute { .. } => true,
            ProviderError::CreateIncomplete { source, .. } => source.is_validation(),
            _ => false,
        }
    }

    /// The underlying directory error, if any.
    pub fn directory_error(&self) -> Option<&DirectoryError> {
        match self {
            ProviderError::Directory { source, .. } | ProviderError::OwnerOperation { source, .. } => {
                Some(source)
            }
            ProviderError::CreateIncomplete { source, .. } => source.directory_error(),
            _ => None,
        }
    }
}

//! Error types for the directory client.

use thiserror::Error;

/// Result type alias using `DirectoryError`.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// OData error code Graph uses when the addressed object does not exist.
pub const RESOURCE_NOT_FOUND_CODE: &str = "Request_ResourceNotFound";

/// Errors that can occur when talking to the directory service.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The addressed group or principal does not exist.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Microsoft Graph API error.
    #[error("Graph API error ({status}): {code} - {message}")]
    GraphApi {
        status: u16,
        code: String,
        message: String,
        inner_error: Option<String>,
    },

    /// The caller is not allowed to perform the operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The service answered with a payload we could not interpret.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl DirectoryError {
    /// Returns true when the remote entity is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::GraphApi { status, code, .. } => *status == 404 || code == RESOURCE_NOT_FOUND_CODE,
            _ => false,
        }
    }

    /// Returns true when the failure is likely to go away on its own.
    ///
    /// Nothing in this crate retries; the classification is for callers that do.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::GraphApi { status, .. } => *status == 429 || *status >= 500,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

//! CLI error types and exit codes

use azuread_directory::DirectoryError;
use azuread_provider::error::ProviderError;
use thiserror::Error;

use crate::config::ConfigError;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General error
/// - 2: Authentication or authorization failure
/// - 3: Network error
/// - 4: Validation error or missing object
/// - 5: Server error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Directory error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("{message}")]
    Provider {
        message: String,
        #[source]
        source: ProviderError,
    },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::PermissionDenied(_) => 2,
            CliError::Network(_) => 3,
            CliError::Validation(_) | CliError::NotFound(_) => 4,
            CliError::Api { status, .. } => status_exit_code(*status),
            CliError::Provider { source, .. } => provider_exit_code(source),
            CliError::Config(_) | CliError::Io(_) => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    /// Get a suggested action for this error
    fn suggestion(&self) -> Option<String> {
        match self {
            CliError::Config(message) if message.contains(crate::config::ACCESS_TOKEN_VAR) => Some(
                format!(
                    "Export a Microsoft Graph bearer token in {}.",
                    crate::config::ACCESS_TOKEN_VAR
                ),
            ),
            CliError::PermissionDenied(_) => Some(
                "The token needs Group.ReadWrite.All (or ownership of the group).".to_string(),
            ),
            CliError::Provider {
                source: ProviderError::CreateIncomplete { group_id, .. },
                ..
            } => Some(format!(
                "Group {group_id} exists. Re-run 'azuread group update {group_id} ...' to finish, or delete it."
            )),
            CliError::Provider { source, .. } if is_transient(source) => {
                Some("The directory reported a transient failure. Try again shortly.".to_string())
            }
            _ => None,
        }
    }
}

fn status_exit_code(status: u16) -> i32 {
    if status >= 500 || status == 429 {
        5
    } else if status == 401 || status == 403 {
        2
    } else {
        4
    }
}

fn directory_exit_code(error: &DirectoryError) -> i32 {
    match error {
        DirectoryError::NotFound(_) => 4,
        DirectoryError::PermissionDenied(_) => 2,
        DirectoryError::GraphApi { status, .. } => status_exit_code(*status),
        DirectoryError::Http(_) => 3,
        DirectoryError::Config(_) => 1,
        DirectoryError::Json(_) | DirectoryError::Url(_) | DirectoryError::UnexpectedResponse(_) => 5,
    }
}

fn provider_exit_code(error: &ProviderError) -> i32 {
    if error.is_validation() || error.is_not_found() {
        return 4;
    }
    error.directory_error().map_or(1, directory_exit_code)
}

fn is_transient(error: &ProviderError) -> bool {
    error.directory_error().is_some_and(DirectoryError::is_transient)
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider {
            message: e.to_string(),
            source: e,
        }
    }
}

impl From<DirectoryError> for CliError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::Config(message) => CliError::Config(message),
            DirectoryError::NotFound(message) => CliError::NotFound(message),
            DirectoryError::PermissionDenied(message) => CliError::PermissionDenied(message),
            DirectoryError::GraphApi {
                status,
                code,
                message,
                ..
            } => CliError::Api {
                status,
                message: format!("{code} - {message}"),
            },
            DirectoryError::Http(e) => CliError::Network(e.to_string()),
            other => CliError::Api {
                status: 0,
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Validation(format!("JSON error: {}", e))
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(e: serde_yaml::Error) -> Self {
        CliError::Validation(format!("YAML error: {}", e))
    }
}

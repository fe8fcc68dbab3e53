//! Microsoft Graph directory client for Azure AD groups.
//!
//! This crate exposes the [`DirectoryClient`] seam used to manage groups and
//! their owners, together with two implementations:
//!
//! - [`GraphDirectory`] talks to the Microsoft Graph REST API.
//! - [`InMemoryDirectory`] keeps everything in process, for offline planning and tests.
//!
//! Token acquisition is not handled here: callers pass an already issued
//! bearer token. Requests are never retried; throttling and transient
//! failures come back as [`DirectoryError`]s that report
//! [`is_transient`](DirectoryError::is_transient).
//!
//! # Example
//!
//! ```no_run
//! use azuread_directory::{DirectoryClient, DirectorySettings, GraphDirectory};
//! use secrecy::SecretString;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = DirectorySettings::default();
//! let directory = GraphDirectory::new(&settings, SecretString::from("eyJ0...".to_string()))?;
//!
//! let group_id = directory.create_group("Platform Admins").await?;
//! directory
//!     .add_owner(&group_id, "6f1c0b9e-2f4e-4a53-9a8c-3e1f0d7c5b21")
//!     .await?;
//! let owners = directory.owner_ids(&group_id).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod directory;
mod error;
mod graph_client;
mod groups;
mod memory;

// Re-exports
pub use config::{
    CloudEnvironment, DirectorySettings, DEFAULT_API_VERSION, DEFAULT_PAGE_SIZE,
    DEFAULT_TIMEOUT_SECS, MAX_PAGE_SIZE,
};
pub use directory::{
    DirectoryClient, DirectoryObject, Group, NewGroup, OwnerStream, SERVICE_PRINCIPAL_ODATA_TYPE,
    USER_ODATA_TYPE,
};
pub use error::{DirectoryError, DirectoryResult, RESOURCE_NOT_FOUND_CODE};
pub use graph_client::{GraphClient, ODataError, ODataErrorBody, ODataResponse};
pub use groups::GraphDirectory;
pub use memory::{DirectoryCall, InMemoryDirectory, InjectedFault};

// Re-export async_trait for DirectoryClient implementors
pub use async_trait::async_trait;

//! # Azure AD Group Provider
//!
//! Declarative management of Azure AD groups and their owners.
//!
//! Resources take a typed configuration, validate it at the boundary, and
//! drive a [`DirectoryClient`](azuread_directory::DirectoryClient) passed in
//! by the caller. There is no global client.
//!
//! ## Owner reconciliation
//!
//! Updating a group's owners diffs the declared owners against the live
//! ones and applies the difference one call at a time, adding before
//! removing so the group is never left without an owner. The first failure
//! stops the run; a later run re-diffs against whatever state resulted.
//!
//! ## Example
//!
//! ```no_run
//! use azuread_directory::InMemoryDirectory;
//! use azuread_provider::prelude::*;
//!
//! # async fn example() -> ProviderResult<()> {
//! let directory = InMemoryDirectory::new();
//! directory.add_user("6f1c0b9e-2f4e-4a53-9a8c-3e1f0d7c5b21").await;
//!
//! let groups = GroupResource::new(&directory);
//! let config = GroupConfig::new("Platform Admins")
//!     .with_owners(["6f1c0b9e-2f4e-4a53-9a8c-3e1f0d7c5b21"]);
//! let state = groups.create(&config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`config`] - Typed resource configuration and validation
//! - [`reconcile`] - Owner diff and the reconciler that applies it
//! - [`resources`] - Group and group-owner resources
//! - [`ids`] - Composite `{group}/{owner}` identifiers
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod ids;
pub mod reconcile;
pub mod resources;

/// Prelude module for convenient imports.
///
/// ```
/// use azuread_provider::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{GroupConfig, GroupOwnerConfig, GroupSpec};
    pub use crate::error::{OwnerOperation, ProviderError, ProviderResult};
    pub use crate::ids::{parse_guid_pair, GroupOwnerId, IdError};
    pub use crate::reconcile::{OwnerDiff, OwnerReconciler, ReconcileReport};
    pub use crate::resources::{
        GroupOwnerResource, GroupOwnerState, GroupPlan, GroupResource, GroupState,
    };
}

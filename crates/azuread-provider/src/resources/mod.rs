//! Declarative resources backed by the directory.
//!
//! Each resource borrows a [`DirectoryClient`](azuread_directory::DirectoryClient)
//! for the duration of a call; nothing is cached between calls.

mod group;
mod group_owner;

pub use group::{plan, GroupPlan, GroupResource, GroupState};
pub use group_owner::{GroupOwnerResource, GroupOwnerState};

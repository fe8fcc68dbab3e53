//! Group owner resource
//!
//! A single owner edge, addressed as `{groupObjectId}/{ownerObjectId}`.

use azuread_directory::DirectoryClient;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::GroupOwnerConfig;
use crate::error::{OwnerOperation, ProviderError, ProviderResult};
use crate::ids::GroupOwnerId;

const RESOURCE: &str = "group owner";

/// Observed state of an owner edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOwnerState {
    pub id: GroupOwnerId,
    pub group_object_id: String,
    pub owner_object_id: String,
}

impl From<GroupOwnerId> for GroupOwnerState {
    fn from(id: GroupOwnerId) -> Self {
        Self {
            group_object_id: id.group_id().to_string(),
            owner_object_id: id.owner_id().to_string(),
            id,
        }
    }
}

/// Create, read and delete single owner edges.
pub struct GroupOwnerResource<'a, D: DirectoryClient + ?Sized> {
    directory: &'a D,
}

impl<'a, D: DirectoryClient + ?Sized> GroupOwnerResource<'a, D> {
    pub fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    /// Adds the owner to the group, then reads the edge back.
    #[instrument(skip(self, config))]
    pub async fn create(&self, config: &GroupOwnerConfig) -> ProviderResult<GroupOwnerState> {
        let config = config.validate()?;
        let id = GroupOwnerId::new(&config.group_object_id, &config.owner_object_id);

        self.directory
            .add_owner(id.group_id(), id.owner_id())
            .await
            .map_err(|source| owner_error(OwnerOperation::Add, &id, source))?;

        info!(%id, "Added group owner");
        self.read(&id.to_string()).await
    }

    /// Reads the edge, failing with `NotFound` when the owner is not listed.
    #[instrument(skip(self))]
    pub async fn read(&self, id: &str) -> ProviderResult<GroupOwnerState> {
        let id = GroupOwnerId::parse(id)?;

        if self.is_listed(&id).await? {
            Ok(id.into())
        } else {
            Err(ProviderError::NotFound {
                resource: RESOURCE,
                id: id.to_string(),
            })
        }
    }

    /// Stops listing as soon as the owner is seen.
    async fn is_listed(&self, id: &GroupOwnerId) -> ProviderResult<bool> {
        let mut owners = self.directory.list_owners(id.group_id());

        while let Some(owner) = owners
            .try_next()
            .await
            .map_err(|e| ProviderError::directory("listing owners of group", id.group_id(), e))?
        {
            if owner
                .principal_id()
                .is_some_and(|found| found.eq_ignore_ascii_case(id.owner_id()))
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Removes the owner. Removing an owner that is already gone succeeds.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> ProviderResult<()> {
        let id = GroupOwnerId::parse(id)?;

        match self.directory.remove_owner(id.group_id(), id.owner_id()).await {
            Ok(()) => {
                info!(%id, "Removed group owner");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!(%id, "Group owner already removed");
                Ok(())
            }
            Err(source) => Err(owner_error(OwnerOperation::Remove, &id, source)),
        }
    }

    /// Reads an existing edge, requiring both halves of the ID to be GUIDs.
    pub async fn import(&self, id: &str) -> ProviderResult<GroupOwnerState> {
        let id = GroupOwnerId::parse_guids(id)?;
        self.read(&id.to_string()).await
    }
}

fn owner_error(
    operation: OwnerOperation,
    id: &GroupOwnerId,
    source: azuread_directory::DirectoryError,
) -> ProviderError {
    ProviderError::OwnerOperation {
        operation,
        group_id: id.group_id().to_string(),
        owner_id: id.owner_id().to_string(),
        source,
    }
}

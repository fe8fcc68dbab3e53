//! Group resource

use azuread_directory::DirectoryClient;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, instrument, warn};

use crate::config::{GroupConfig, GroupSpec};
use crate::error::{ProviderError, ProviderResult};
use crate::reconcile::{OwnerDiff, OwnerReconciler};

const RESOURCE: &str = "group";

/// Observed state of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupState {
    pub id: String,
    pub name: String,
    /// Users and service principals owning the group, in listing order.
    pub owners: Vec<String>,
}

/// What applying a configuration to an existing group would do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupPlan {
    /// Nothing to change.
    NoOp,
    /// Owners change in place.
    Update { owners: OwnerDiff },
    /// The name changed; the group must be deleted and recreated.
    Replace { from: String, to: String },
}

impl fmt::Display for GroupPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupPlan::NoOp => f.write_str("no changes"),
            GroupPlan::Update { owners } => {
                write!(f, "update owners")?;
                for id in &owners.to_add {
                    write!(f, "\n  + {id}")?;
                }
                for id in &owners.to_remove {
                    write!(f, "\n  - {id}")?;
                }
                Ok(())
            }
            GroupPlan::Replace { from, to } => write!(f, "replace (name {from:?} -> {to:?})"),
        }
    }
}

/// Plans the change from `prior` to `spec` without touching the directory.
pub fn plan(prior: &GroupState, spec: &GroupSpec) -> GroupPlan {
    if prior.name != spec.name {
        return GroupPlan::Replace {
            from: prior.name.clone(),
            to: spec.name.clone(),
        };
    }

    match &spec.owners {
        Some(desired) => {
            let owners = OwnerDiff::between(desired, &prior.owners);
            if owners.is_empty() {
                GroupPlan::NoOp
            } else {
                GroupPlan::Update { owners }
            }
        }
        None => GroupPlan::NoOp,
    }
}

/// Create, read, update and delete groups.
pub struct GroupResource<'a, D: DirectoryClient + ?Sized> {
    directory: &'a D,
}

impl<'a, D: DirectoryClient + ?Sized> GroupResource<'a, D> {
    pub fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    fn reconciler(&self) -> OwnerReconciler<'a, D> {
        OwnerReconciler::new(self.directory)
    }

    /// Creates the group, then adds its owners one at a time.
    ///
    /// When anything after the group itself fails, the error carries the new
    /// group's ID so it can be tracked and cleaned up.
    #[instrument(skip(self, config), fields(name = %config.name))]
    pub async fn create(&self, config: &GroupConfig) -> ProviderResult<GroupState> {
        let spec = config.validate()?;

        let group_id = self
            .directory
            .create_group(&spec.name)
            .await
            .map_err(|e| ProviderError::directory("creating group", spec.name.as_str(), e))?;
        info!(%group_id, "Created group");

        let completed = self.finish_create(&group_id, &spec).await;
        completed.map_err(|source| ProviderError::CreateIncomplete {
            group_id,
            source: Box::new(source),
        })
    }

    async fn finish_create(&self, group_id: &str, spec: &GroupSpec) -> ProviderResult<GroupState> {
        if let Some(owners) = &spec.owners {
            let additions = OwnerDiff {
                to_add: owners.clone(),
                to_remove: Vec::new(),
            };
            self.reconciler().apply(group_id, &additions).await?;
        }

        self.read(group_id)
            .await?
            .ok_or_else(|| ProviderError::NotFound {
                resource: RESOURCE,
                id: group_id.to_string(),
            })
    }

    /// Reads the group. A group that no longer exists yields `None`.
    #[instrument(skip(self))]
    pub async fn read(&self, group_id: &str) -> ProviderResult<Option<GroupState>> {
        let group = match self.directory.get_group(group_id).await {
            Ok(group) => group,
            Err(e) if e.is_not_found() => {
                warn!(%group_id, "Group no longer exists");
                return Ok(None);
            }
            Err(e) => return Err(ProviderError::directory("reading group", group_id, e)),
        };

        let owners = match self.reconciler().current_owners(group_id).await {
            Ok(owners) => owners,
            Err(e) if e.is_not_found() => {
                warn!(%group_id, "Group disappeared while listing owners");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        Ok(Some(GroupState {
            id: group.id,
            name: group.display_name,
            owners,
        }))
    }

    /// Plans the change from `prior` to `config`.
    pub fn plan(&self, prior: &GroupState, config: &GroupConfig) -> ProviderResult<GroupPlan> {
        Ok(plan(prior, &config.validate()?))
    }

    /// Applies `config` to an existing group.
    ///
    /// Owners are reconciled against the live owner list, not `prior`. When
    /// `config` does not declare owners they are left alone.
    #[instrument(skip(self, prior, config))]
    pub async fn update(
        &self,
        group_id: &str,
        prior: &GroupState,
        config: &GroupConfig,
    ) -> ProviderResult<GroupState> {
        let spec = config.validate()?;
        if spec.name != prior.name {
            return Err(ProviderError::ImmutableAttribute { attribute: "name" });
        }

        if let Some(owners) = &spec.owners {
            self.reconciler().reconcile(group_id, owners).await?;
        } else {
            debug!("Owners not managed, skipping reconciliation");
        }

        self.import(group_id).await
    }

    /// Deletes the group. Deleting a group that is already gone succeeds.
    #[instrument(skip(self))]
    pub async fn delete(&self, group_id: &str) -> ProviderResult<()> {
        match self.directory.delete_group(group_id).await {
            Ok(()) => {
                info!(%group_id, "Deleted group");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!(%group_id, "Group already deleted");
                Ok(())
            }
            Err(e) => Err(ProviderError::directory("deleting group", group_id, e)),
        }
    }

    /// Reads an existing group, failing when it does not exist.
    pub async fn import(&self, group_id: &str) -> ProviderResult<GroupState> {
        self.read(group_id)
            .await?
            .ok_or_else(|| ProviderError::NotFound {
                resource: RESOURCE,
                id: group_id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(name: &str, owners: &[&str]) -> GroupState {
        GroupState {
            id: "g1".to_string(),
            name: name.to_string(),
            owners: owners.iter().map(|o| o.to_string()).collect(),
        }
    }

    fn spec(name: &str, owners: Option<&[&str]>) -> GroupSpec {
        GroupSpec {
            name: name.to_string(),
            owners: owners.map(|o| o.iter().map(|s| s.to_string()).collect()),
        }
    }

    #[test]
    fn test_plan_name_change_replaces() {
        let plan = plan(&state("Old", &["u1"]), &spec("New", Some(&["u2"])));
        assert_eq!(
            plan,
            GroupPlan::Replace {
                from: "Old".to_string(),
                to: "New".to_string()
            }
        );
    }

    #[test]
    fn test_plan_owner_change_updates() {
        let plan = plan(&state("G", &["u1", "u2"]), &spec("G", Some(&["u2", "u3"])));
        let GroupPlan::Update { owners } = plan else {
            panic!("expected update");
        };
        assert_eq!(owners.to_add, vec!["u3"]);
        assert_eq!(owners.to_remove, vec!["u1"]);
    }

    #[test]
    fn test_plan_unmanaged_owners_is_noop() {
        assert_eq!(plan(&state("G", &["u1"]), &spec("G", None)), GroupPlan::NoOp);
        assert_eq!(
            plan(&state("G", &["u1", "u2"]), &spec("G", Some(&["u2", "u1"]))),
            GroupPlan::NoOp
        );
    }

    #[test]
    fn test_plan_display() {
        let plan = plan(&state("G", &["u1"]), &spec("G", Some(&["u2"])));
        assert_eq!(plan.to_string(), "update owners\n  + u2\n  - u1");
        assert_eq!(GroupPlan::NoOp.to_string(), "no changes");
    }
}

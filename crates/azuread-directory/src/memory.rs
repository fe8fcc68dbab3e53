//! In-process directory used for offline planning and tests.

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;
use tracing::debug;

use crate::directory::{DirectoryClient, DirectoryObject, Group, NewGroup, OwnerStream};
use crate::{DirectoryError, DirectoryResult};

/// A call received by [`InMemoryDirectory`], recorded whether or not it succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryCall {
    CreateGroup { display_name: String },
    GetGroup { group_id: String },
    DeleteGroup { group_id: String },
    ListOwners { group_id: String },
    AddOwner { group_id: String, owner_id: String },
    RemoveOwner { group_id: String, owner_id: String },
}

impl DirectoryCall {
    /// True for add/remove owner calls.
    #[must_use]
    pub fn is_owner_mutation(&self) -> bool {
        matches!(self, Self::AddOwner { .. } | Self::RemoveOwner { .. })
    }
}

/// Failure to inject into a specific owner mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFault {
    /// Answer with `DirectoryError::NotFound`.
    NotFound,
    /// Answer with a `503 Service Unavailable`.
    Unavailable,
}

impl InjectedFault {
    fn into_error(self, subject: &str) -> DirectoryError {
        match self {
            Self::NotFound => DirectoryError::NotFound(subject.to_string()),
            Self::Unavailable => DirectoryError::GraphApi {
                status: 503,
                code: "serviceUnavailable".to_string(),
                message: format!("service unavailable while processing {subject}"),
                inner_error: None,
            },
        }
    }
}

#[derive(Debug)]
struct StoredGroup {
    group: Group,
    owners: Vec<DirectoryObject>,
}

#[derive(Debug)]
struct State {
    groups: BTreeMap<String, StoredGroup>,
    principals: HashMap<String, DirectoryObject>,
    calls: Vec<DirectoryCall>,
    add_faults: HashMap<String, InjectedFault>,
    remove_faults: HashMap<String, InjectedFault>,
    protect_last_owner: bool,
}

/// A directory that lives entirely in memory.
///
/// Behaves like Graph where it matters to owner reconciliation: owners must
/// be known principals, removing an absent owner is `NotFound`, and by default
/// removing a group's last owner is rejected with `400 Bad Request`.
#[derive(Debug)]
pub struct InMemoryDirectory {
    state: Mutex<State>,
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDirectory {
    /// Creates an empty directory that protects the last owner of each group.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                groups: BTreeMap::new(),
                principals: HashMap::new(),
                calls: Vec::new(),
                add_faults: HashMap::new(),
                remove_faults: HashMap::new(),
                protect_last_owner: true,
            }),
        }
    }

    /// Registers a user principal.
    pub async fn add_user(&self, id: &str) {
        self.add_principal(DirectoryObject::user(id)).await;
    }

    /// Registers a service principal.
    pub async fn add_service_principal(&self, id: &str) {
        self.add_principal(DirectoryObject::service_principal(id)).await;
    }

    /// Registers any directory object as a potential owner.
    pub async fn add_principal(&self, object: DirectoryObject) {
        let mut state = self.state.lock().await;
        state.principals.insert(object.id().to_string(), object);
    }

    /// Seeds a group with owners. Owners not yet registered become users.
    pub async fn insert_group(&self, id: &str, display_name: &str, owners: &[&str]) {
        let mut state = self.state.lock().await;
        let owners = owners
            .iter()
            .map(|owner| {
                state
                    .principals
                    .entry((*owner).to_string())
                    .or_insert_with(|| DirectoryObject::user(*owner))
                    .clone()
            })
            .collect();
        state.groups.insert(
            id.to_string(),
            StoredGroup {
                group: Group {
                    id: id.to_string(),
                    display_name: display_name.to_string(),
                    description: None,
                    mail_nickname: None,
                    security_enabled: true,
                    mail_enabled: false,
                },
                owners,
            },
        );
    }

    /// Appends an arbitrary object to a group's owner list, bypassing checks.
    pub async fn push_raw_owner(&self, group_id: &str, object: DirectoryObject) {
        let mut state = self.state.lock().await;
        if let Some(stored) = state.groups.get_mut(group_id) {
            stored.owners.push(object);
        }
    }

    /// Makes every `add_owner` for `owner_id` fail.
    pub async fn fail_add_owner(&self, owner_id: &str, fault: InjectedFault) {
        let mut state = self.state.lock().await;
        state.add_faults.insert(owner_id.to_string(), fault);
    }

    /// Makes every `remove_owner` for `owner_id` fail.
    pub async fn fail_remove_owner(&self, owner_id: &str, fault: InjectedFault) {
        let mut state = self.state.lock().await;
        state.remove_faults.insert(owner_id.to_string(), fault);
    }

    /// Controls whether removing a group's last owner is rejected.
    pub async fn set_protect_last_owner(&self, protect: bool) {
        let mut state = self.state.lock().await;
        state.protect_last_owner = protect;
    }

    /// Current owner IDs of a group, or `None` if the group does not exist.
    pub async fn owners_of(&self, group_id: &str) -> Option<Vec<String>> {
        let state = self.state.lock().await;
        state
            .groups
            .get(group_id)
            .map(|stored| stored.owners.iter().map(|o| o.id().to_string()).collect())
    }

    /// True when the group exists.
    pub async fn contains_group(&self, group_id: &str) -> bool {
        self.state.lock().await.groups.contains_key(group_id)
    }

    /// Every call received so far, in order.
    pub async fn calls(&self) -> Vec<DirectoryCall> {
        self.state.lock().await.calls.clone()
    }

    /// Only the add/remove owner calls received so far, in order.
    pub async fn owner_mutations(&self) -> Vec<DirectoryCall> {
        self.calls()
            .await
            .into_iter()
            .filter(DirectoryCall::is_owner_mutation)
            .collect()
    }

    /// Forgets the recorded calls.
    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }
}

fn group_not_found(group_id: &str) -> DirectoryError {
    DirectoryError::NotFound(format!("group {group_id}"))
}

#[async_trait]
impl DirectoryClient for InMemoryDirectory {
    async fn create_group(&self, display_name: &str) -> DirectoryResult<String> {
        let mut state = self.state.lock().await;
        state.calls.push(DirectoryCall::CreateGroup {
            display_name: display_name.to_string(),
        });

        let request = NewGroup::security(display_name);
        let id = uuid::Uuid::new_v4().to_string();
        state.groups.insert(
            id.clone(),
            StoredGroup {
                group: Group {
                    id: id.clone(),
                    display_name: request.display_name,
                    description: None,
                    mail_nickname: Some(request.mail_nickname),
                    security_enabled: request.security_enabled,
                    mail_enabled: request.mail_enabled,
                },
                owners: Vec::new(),
            },
        );
        debug!(group_id = %id, "Created in-memory group");
        Ok(id)
    }

    async fn get_group(&self, group_id: &str) -> DirectoryResult<Group> {
        let mut state = self.state.lock().await;
        state.calls.push(DirectoryCall::GetGroup {
            group_id: group_id.to_string(),
        });
        state
            .groups
            .get(group_id)
            .map(|stored| stored.group.clone())
            .ok_or_else(|| group_not_found(group_id))
    }

    async fn delete_group(&self, group_id: &str) -> DirectoryResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(DirectoryCall::DeleteGroup {
            group_id: group_id.to_string(),
        });
        state
            .groups
            .remove(group_id)
            .map(|_| ())
            .ok_or_else(|| group_not_found(group_id))
    }

    fn list_owners<'a>(&'a self, group_id: &'a str) -> OwnerStream<'a> {
        let snapshot = async move {
            let mut state = self.state.lock().await;
            state.calls.push(DirectoryCall::ListOwners {
                group_id: group_id.to_string(),
            });
            state
                .groups
                .get(group_id)
                .map(|stored| stored.owners.clone())
                .ok_or_else(|| group_not_found(group_id))
        };

        stream::once(snapshot)
            .map_ok(|owners| stream::iter(owners.into_iter().map(Ok::<_, DirectoryError>)))
            .try_flatten()
            .boxed()
    }

    async fn add_owner(&self, group_id: &str, owner_id: &str) -> DirectoryResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(DirectoryCall::AddOwner {
            group_id: group_id.to_string(),
            owner_id: owner_id.to_string(),
        });

        if let Some(fault) = state.add_faults.get(owner_id) {
            return Err(fault.into_error(&format!("owner {owner_id}")));
        }

        let principal = state
            .principals
            .get(owner_id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(format!("principal {owner_id}")))?;
        let stored = state
            .groups
            .get_mut(group_id)
            .ok_or_else(|| group_not_found(group_id))?;

        if stored.owners.iter().any(|o| o.id() == owner_id) {
            return Err(DirectoryError::GraphApi {
                status: 400,
                code: "Request_BadRequest".to_string(),
                message: "One or more added object references already exist".to_string(),
                inner_error: None,
            });
        }

        stored.owners.push(principal);
        Ok(())
    }

    async fn remove_owner(&self, group_id: &str, owner_id: &str) -> DirectoryResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(DirectoryCall::RemoveOwner {
            group_id: group_id.to_string(),
            owner_id: owner_id.to_string(),
        });

        if let Some(fault) = state.remove_faults.get(owner_id) {
            return Err(fault.into_error(&format!("owner {owner_id}")));
        }

        let protect_last_owner = state.protect_last_owner;
        let stored = state
            .groups
            .get_mut(group_id)
            .ok_or_else(|| group_not_found(group_id))?;

        let Some(position) = stored.owners.iter().position(|o| o.id() == owner_id) else {
            return Err(DirectoryError::NotFound(format!(
                "owner {owner_id} of group {group_id}"
            )));
        };

        if protect_last_owner && stored.owners.len() == 1 {
            return Err(DirectoryError::GraphApi {
                status: 400,
                code: "Request_BadRequest".to_string(),
                message: "The group must have at least one owner, hence this owner cannot be removed."
                    .to_string(),
                inner_error: None,
            });
        }

        stored.owners.remove(position);
        Ok(())
    }
}

//! The directory client seam and the objects it deals in.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::{DirectoryError, DirectoryResult};

/// `@odata.type` of a user object.
pub const USER_ODATA_TYPE: &str = "#microsoft.graph.user";

/// `@odata.type` of a service principal object.
pub const SERVICE_PRINCIPAL_ODATA_TYPE: &str = "#microsoft.graph.servicePrincipal";

/// Lazy, finite sequence of owners. Every call to
/// [`DirectoryClient::list_owners`] starts a fresh enumeration.
pub type OwnerStream<'a> = BoxStream<'a, DirectoryResult<DirectoryObject>>;

/// A group as returned by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Object ID assigned by the directory.
    pub id: String,
    /// Display name.
    pub display_name: String,
    /// Description.
    pub description: Option<String>,
    /// Mail nickname.
    pub mail_nickname: Option<String>,
    /// Whether this is a security group.
    pub security_enabled: bool,
    /// Whether the group has a mailbox.
    pub mail_enabled: bool,
}

impl Group {
    /// Parses a group from the Graph API JSON response.
    pub fn from_json(value: &serde_json::Value) -> DirectoryResult<Self> {
        Ok(Self {
            id: value
                .get("id")
                .and_then(|v| v.as_str())
                .ok_or_else(|| DirectoryError::UnexpectedResponse("group without id".into()))?
                .to_string(),
            display_name: value
                .get("displayName")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            description: value
                .get("description")
                .and_then(|v| v.as_str())
                .map(String::from),
            mail_nickname: value
                .get("mailNickname")
                .and_then(|v| v.as_str())
                .map(String::from),
            security_enabled: value
                .get("securityEnabled")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            mail_enabled: value
                .get("mailEnabled")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        })
    }
}

/// Body of a group creation request.
///
/// The API only creates non-mail-enabled security groups, so those two flags
/// are fixed and the mail nickname is a fresh GUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    pub display_name: String,
    pub mail_enabled: bool,
    pub mail_nickname: String,
    pub security_enabled: bool,
}

impl NewGroup {
    /// Builds the creation request for a security group.
    #[must_use]
    pub fn security(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            mail_enabled: false,
            mail_nickname: uuid::Uuid::new_v4().to_string(),
            security_enabled: true,
        }
    }
}

/// A directory object found in a group's owner list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DirectoryObject {
    /// A user account.
    User {
        id: String,
        display_name: Option<String>,
        user_principal_name: Option<String>,
    },
    /// An application's service principal.
    ServicePrincipal {
        id: String,
        display_name: Option<String>,
        app_id: Option<String>,
    },
    /// Anything else (devices, groups, contacts...).
    Other { id: String, odata_type: Option<String> },
}

impl DirectoryObject {
    /// Shorthand for a bare user object.
    #[must_use]
    pub fn user(id: impl Into<String>) -> Self {
        Self::User {
            id: id.into(),
            display_name: None,
            user_principal_name: None,
        }
    }

    /// Shorthand for a bare service principal object.
    #[must_use]
    pub fn service_principal(id: impl Into<String>) -> Self {
        Self::ServicePrincipal {
            id: id.into(),
            display_name: None,
            app_id: None,
        }
    }

    /// Parses an owner entry from the Graph API JSON response.
    pub fn from_json(value: &serde_json::Value) -> DirectoryResult<Self> {
        let id = value
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                DirectoryError::UnexpectedResponse("directory object without id".into())
            })?
            .to_string();
        let text = |key: &str| value.get(key).and_then(|v| v.as_str()).map(String::from);
        let odata_type = text("@odata.type");

        Ok(match odata_type.as_deref() {
            Some(USER_ODATA_TYPE) => Self::User {
                id,
                display_name: text("displayName"),
                user_principal_name: text("userPrincipalName"),
            },
            Some(SERVICE_PRINCIPAL_ODATA_TYPE) => Self::ServicePrincipal {
                id,
                display_name: text("displayName"),
                app_id: text("appId"),
            },
            _ => Self::Other { id, odata_type },
        })
    }

    /// Object ID regardless of kind.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::User { id, .. } | Self::ServicePrincipal { id, .. } | Self::Other { id, .. } => {
                id
            }
        }
    }

    /// Object ID when this is a user or service principal.
    #[must_use]
    pub fn principal_id(&self) -> Option<&str> {
        match self {
            Self::User { id, .. } | Self::ServicePrincipal { id, .. } => Some(id),
            Self::Other { .. } => None,
        }
    }
}

/// Operations the provider needs from the directory service.
///
/// Implementations issue exactly one remote call per method; callers are
/// expected to await each call before issuing the next one.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Creates a security group and returns its object ID.
    async fn create_group(&self, display_name: &str) -> DirectoryResult<String>;

    /// Fetches a group. Absent groups yield `DirectoryError::NotFound`.
    async fn get_group(&self, group_id: &str) -> DirectoryResult<Group>;

    /// Deletes a group. Absent groups yield `DirectoryError::NotFound`.
    async fn delete_group(&self, group_id: &str) -> DirectoryResult<()>;

    /// Enumerates the owners of a group, lazily, page by page.
    fn list_owners<'a>(&'a self, group_id: &'a str) -> OwnerStream<'a>;

    /// Adds a principal to the group's owners.
    async fn add_owner(&self, group_id: &str, owner_id: &str) -> DirectoryResult<()>;

    /// Removes a principal from the group's owners. Absent owners yield
    /// `DirectoryError::NotFound`.
    async fn remove_owner(&self, group_id: &str, owner_id: &str) -> DirectoryResult<()>;

    /// Drains `list_owners` and keeps the IDs of users and service principals,
    /// in listing order.
    async fn owner_ids(&self, group_id: &str) -> DirectoryResult<Vec<String>> {
        self.list_owners(group_id)
            .try_filter_map(|object| async move { Ok(object.principal_id().map(String::from)) })
            .try_collect()
            .await
    }
}
